use serde::Deserialize;
use std::error::Error;
use std::path::Path;

pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Class labels and input size exported next to the model weights.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(rename = "imageSize", default = "default_image_size")]
    pub image_size: u32,
    #[serde(rename = "modelName", default)]
    pub model_name: Option<String>,
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

impl ModelMetadata {
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let metadata: ModelMetadata = serde_json::from_str(json)?;
        if metadata.labels.is_empty() {
            return Err("Model metadata declares no classes".into());
        }
        if metadata.image_size == 0 {
            return Err("Model metadata declares a zero image size".into());
        }
        Ok(metadata)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read metadata {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}
