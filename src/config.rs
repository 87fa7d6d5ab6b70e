use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBackend {
    TractOnnx,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    Gui,
    Console,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model_dir: PathBuf,
    pub model_file_name: String,
    pub metadata_file_name: String,
    pub inference_backend: InferenceBackend,
    pub fake_labels: Vec<String>,
    pub frames_dir: Option<PathBuf>,
    pub capture_size: (u32, u32),
    pub flip: bool,
    pub render_target: RenderTarget,
    pub refresh_rate: Duration,
    pub max_consecutive_cycle_failures: u32,
    pub ready_message: String,
    pub startup_error_message: String,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./my_model_files/"),
            model_file_name: "model.onnx".to_string(),
            metadata_file_name: "metadata.json".to_string(),
            inference_backend: InferenceBackend::TractOnnx,
            fake_labels: vec!["Class 1".to_string(), "Class 2".to_string()],
            frames_dir: None,
            capture_size: (200, 200),
            flip: true,
            render_target: RenderTarget::Gui,
            refresh_rate: Duration::from_micros(16_667),
            max_consecutive_cycle_failures: 3,
            ready_message: "Ready! Point your camera.".to_string(),
            startup_error_message: "Could not load the model or access the camera. Make sure camera access is allowed and the model files are in the right place.".to_string(),
            logger_timezone: utc(),
        }
    }
}

impl Config {
    pub fn model_location(&self) -> String {
        self.model_dir
            .join(&self.model_file_name)
            .to_string_lossy()
            .into_owned()
    }

    pub fn metadata_location(&self) -> String {
        self.model_dir
            .join(&self.metadata_file_name)
            .to_string_lossy()
            .into_owned()
    }

    /// Defaults overlaid with `LIVE_CLASSIFIER_*` environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("LIVE_CLASSIFIER_MODEL_DIR") {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("LIVE_CLASSIFIER_FRAMES_DIR") {
            config.frames_dir = Some(PathBuf::from(dir));
        }
        if let Some(backend) = lookup("LIVE_CLASSIFIER_BACKEND") {
            config.inference_backend = match backend.to_lowercase().as_str() {
                "tract" | "onnx" => InferenceBackend::TractOnnx,
                "fake" => InferenceBackend::Fake,
                other => return Err(format!("Unknown inference backend: {}", other).into()),
            };
        }
        if let Some(labels) = lookup("LIVE_CLASSIFIER_FAKE_LABELS") {
            config.fake_labels = labels
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }
        if let Some(target) = lookup("LIVE_CLASSIFIER_RENDER") {
            config.render_target = match target.to_lowercase().as_str() {
                "gui" => RenderTarget::Gui,
                "console" => RenderTarget::Console,
                other => return Err(format!("Unknown render target: {}", other).into()),
            };
        }
        if let Some(hz) = lookup("LIVE_CLASSIFIER_REFRESH_HZ") {
            let hz: f64 = hz.parse()?;
            if !hz.is_finite() || hz <= 0.0 {
                return Err("Refresh rate must be a positive number".into());
            }
            config.refresh_rate = Duration::try_from_secs_f64(1.0 / hz)?;
        }
        if let Some(max) = lookup("LIVE_CLASSIFIER_MAX_CYCLE_FAILURES") {
            config.max_consecutive_cycle_failures = max.parse()?;
        }
        if let Some(flip) = lookup("LIVE_CLASSIFIER_FLIP") {
            config.flip = flip.parse()?;
        }

        Ok(config)
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::{Config, InferenceBackend, RenderTarget};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.inference_backend, InferenceBackend::TractOnnx);
        assert_eq!(config.render_target, RenderTarget::Gui);
        assert_eq!(config.max_consecutive_cycle_failures, 3);
        assert!(config.model_location().ends_with("model.onnx"));
        assert!(config.metadata_location().ends_with("metadata.json"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LIVE_CLASSIFIER_BACKEND", "fake"),
            ("LIVE_CLASSIFIER_RENDER", "console"),
            ("LIVE_CLASSIFIER_REFRESH_HZ", "10"),
            ("LIVE_CLASSIFIER_FAKE_LABELS", "cat, dog ,,bird"),
            ("LIVE_CLASSIFIER_MAX_CYCLE_FAILURES", "0"),
        ]))
        .unwrap();

        assert_eq!(config.inference_backend, InferenceBackend::Fake);
        assert_eq!(config.render_target, RenderTarget::Console);
        assert_eq!(config.refresh_rate, Duration::from_millis(100));
        assert_eq!(config.fake_labels, vec!["cat", "dog", "bird"]);
        assert_eq!(config.max_consecutive_cycle_failures, 0);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Config::from_lookup(lookup(&[("LIVE_CLASSIFIER_BACKEND", "gpu")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LIVE_CLASSIFIER_REFRESH_HZ", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LIVE_CLASSIFIER_REFRESH_HZ", "NaN")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LIVE_CLASSIFIER_REFRESH_HZ", "inf")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LIVE_CLASSIFIER_REFRESH_HZ", "1e-300")])).is_err());
    }
}
