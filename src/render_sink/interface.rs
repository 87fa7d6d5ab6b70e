use crate::frame::Frame;
use crate::prediction::{Color, CycleView, DetailView, HeadlineView};
use std::error::Error;

/// A display surface with one headline slot and N ordered detail slots.
pub trait RenderSink: Send + Sync {
    /// Create `count` detail slots, replacing any previous content.
    /// Slots start out as "Class i" at 0%.
    fn build_slots(&mut self, count: usize) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Number of detail slots currently shown.
    #[allow(dead_code)]
    fn slot_count(&self) -> usize;

    /// Write the headline text, color and confidence bar.
    fn set_headline(&mut self, headline: &HeadlineView) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write one detail slot. Fails if `index` is out of range.
    fn set_detail(
        &mut self,
        index: usize,
        detail: &DetailView,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write every detail slot, then the headline. Sinks read from another
    /// thread override this to publish the whole cycle in one write.
    fn set_view(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        for (index, detail) in view.details.iter().enumerate() {
            self.set_detail(index, detail)?;
        }
        self.set_headline(&view.headline)
    }

    /// Show the latest camera frame next to the predictions.
    fn draw_surface(&mut self, frame: &Frame) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace everything with a single human-readable error message.
    fn show_error(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// What a sink currently shows. Shared by the sink implementations.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    pub headline: HeadlineView,
    pub details: Vec<DetailView>,
    pub error: Option<String>,
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self {
            headline: HeadlineView {
                text: "Loading...".to_string(),
                color: Color::neutral(),
                fill_percent: 0,
            },
            details: Vec::new(),
            error: None,
        }
    }
}

impl RenderBuffer {
    pub fn build_slots(&mut self, count: usize) {
        self.error = None;
        self.details = (0..count).map(DetailView::placeholder).collect();
    }

    pub fn set_detail(
        &mut self,
        index: usize,
        detail: &DetailView,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let slot_count = self.details.len();
        let slot = self.details.get_mut(index).ok_or_else(|| {
            format!("Detail slot {} out of range ({} slots)", index, slot_count)
        })?;
        *slot = detail.clone();
        Ok(())
    }

    /// Replaces all details and the headline at once. Fails without
    /// touching anything when the view does not fit the slots.
    pub fn set_view(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        if view.details.len() != self.details.len() {
            return Err(format!(
                "View has {} details for {} slots",
                view.details.len(),
                self.details.len()
            )
            .into());
        }
        self.details.clone_from(&view.details);
        self.headline = view.headline.clone();
        Ok(())
    }

    pub fn show_error(&mut self, message: &str) {
        self.details.clear();
        self.error = Some(message.to_string());
    }
}
