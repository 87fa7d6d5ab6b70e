//! Per-cycle aggregation: detail rows for every class plus the headline.

pub const RECOGNIZED_THRESHOLD: f32 = 0.75;
pub const POSSIBLE_THRESHOLD: f32 = 0.5;
pub const NOT_RECOGNIZED_TEXT: &str = "Not recognized";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    pub label: String,
    pub probability: f32,
}

impl ClassPrediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// One entry per known class, in the class order fixed at load time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionSet(pub Vec<ClassPrediction>);

impl PredictionSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassPrediction> {
        self.0.iter()
    }
}

impl From<Vec<ClassPrediction>> for PredictionSet {
    fn from(predictions: Vec<ClassPrediction>) -> Self {
        Self(predictions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Recognized,
    Possible,
    Unrecognized,
}

impl Tier {
    /// Both thresholds are exclusive lower bounds.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > RECOGNIZED_THRESHOLD {
            Tier::Recognized
        } else if confidence > POSSIBLE_THRESHOLD {
            Tier::Possible
        } else {
            Tier::Unrecognized
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Tier::Recognized => Color::rgb(0x28, 0xa7, 0x45),
            Tier::Possible => Color::rgb(0xff, 0xc1, 0x07),
            Tier::Unrecognized => Color::rgb(0xdc, 0x35, 0x45),
        }
    }

    pub fn headline_text(&self, label: &str) -> String {
        match self {
            Tier::Recognized => label.to_string(),
            Tier::Possible => format!("{} (possible)", label),
            Tier::Unrecognized => NOT_RECOGNIZED_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral grey used before the first cycle.
    pub const fn neutral() -> Self {
        Self::rgb(0x6c, 0x75, 0x7d)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineState {
    pub label: String,
    pub confidence: f32,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineView {
    pub text: String,
    pub color: Color,
    pub fill_percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub label: String,
    pub percent_text: String,
    pub fill_percent: u8,
}

impl DetailView {
    pub fn placeholder(index: usize) -> Self {
        Self {
            label: format!("Class {}", index + 1),
            percent_text: "0%".to_string(),
            fill_percent: 0,
        }
    }
}

/// Everything one cycle writes to the render sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleView {
    pub headline: HeadlineView,
    pub details: Vec<DetailView>,
}

/// Probability as a whole percentage, rounded half up and clamped to 0..=100.
pub fn percent(probability: f32) -> u8 {
    let scaled = (f64::from(probability) * 100.0).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 100.0) as u8
}

pub fn aggregate(predictions: &PredictionSet) -> CycleView {
    let mut details = Vec::with_capacity(predictions.len());
    let mut best: Option<&ClassPrediction> = None;

    for prediction in predictions.iter() {
        let fill_percent = percent(prediction.probability);
        details.push(DetailView {
            label: prediction.label.clone(),
            percent_text: format!("{}%", fill_percent),
            fill_percent,
        });

        // Strict `>` against a zero floor keeps the earliest entry on ties
        // and never lets a NaN probability take the lead.
        let current_max = best.map_or(0.0, |current| current.probability);
        if prediction.probability > current_max {
            best = Some(prediction);
        }
    }

    let headline = match best {
        Some(best) => HeadlineState {
            label: best.label.clone(),
            confidence: best.probability,
            tier: Tier::from_confidence(best.probability),
        },
        None => HeadlineState {
            label: String::new(),
            confidence: 0.0,
            tier: Tier::Unrecognized,
        },
    };

    CycleView {
        headline: HeadlineView {
            text: headline.tier.headline_text(&headline.label),
            color: headline.tier.color(),
            fill_percent: percent(headline.confidence),
        },
        details,
    }
}
