use crate::frame::Frame;
use crate::inference_provider::interface::{InferenceProvider, InferenceProviderLoader};
use crate::inference_provider::metadata::ModelMetadata;
use crate::library::logger::interface::Logger;
use crate::prediction::{ClassPrediction, PredictionSet};
use image::imageops::FilterType;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// Image classifier exported to ONNX. Expects an NHWC float input in
/// `[-1, 1]` and a single `[1, classes]` probability output.
pub struct InferenceProviderTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    metadata: ModelMetadata,
}

impl InferenceProviderTractOnnx {
    pub fn new(
        model_path: &Path,
        metadata: ModelMetadata,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let size = metadata.image_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, f32::fact([1, size, size, 3]).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { model, metadata })
    }

    fn frame_to_tensor(&self, frame: &Frame) -> Tensor {
        let size = self.metadata.image_size;
        let resized = image::imageops::resize(&frame.image, size, size, FilterType::Triangle);

        tract_ndarray::Array4::from_shape_fn(
            (1, size as usize, size as usize, 3),
            |(_, y, x, c)| {
                let pixel = resized.get_pixel(x as u32, y as u32);
                pixel[c] as f32 / 127.5 - 1.0
            },
        )
        .into_tensor()
    }
}

impl InferenceProvider for InferenceProviderTractOnnx {
    fn class_count(&self) -> usize {
        self.metadata.labels.len()
    }

    fn labels(&self) -> Vec<String> {
        self.metadata.labels.clone()
    }

    fn predict(&mut self, frame: &Frame) -> Result<PredictionSet, Box<dyn Error + Send + Sync>> {
        let input = self.frame_to_tensor(frame);
        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("Model produced no outputs")?
            .to_array_view::<f32>()?;

        let scores: Vec<f32> = output.iter().copied().collect();
        if scores.len() != self.class_count() {
            return Err(format!(
                "Model produced {} scores for {} classes",
                scores.len(),
                self.class_count()
            )
            .into());
        }

        let predictions = self
            .metadata
            .labels
            .iter()
            .zip(scores)
            .map(|(label, probability)| ClassPrediction::new(label.clone(), probability))
            .collect::<Vec<_>>();

        Ok(predictions.into())
    }
}

pub struct InferenceProviderLoaderTractOnnx {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceProviderLoaderTractOnnx {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("inference").with_namespace("tract"),
        }
    }
}

impl InferenceProviderLoader for InferenceProviderLoaderTractOnnx {
    fn load(
        &self,
        model_location: &str,
        metadata_location: &str,
    ) -> Result<Box<dyn InferenceProvider>, Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("Loading metadata from {}", metadata_location))?;
        let metadata = ModelMetadata::from_path(metadata_location)?;

        let model_path = Path::new(model_location);
        if !model_path.exists() {
            return Err(format!("Model file {} does not exist", model_location).into());
        }

        self.logger.info(&format!(
            "Loading model from {} ({} classes, {}px input)",
            model_location,
            metadata.labels.len(),
            metadata.image_size
        ))?;
        let provider = InferenceProviderTractOnnx::new(model_path, metadata)?;

        Ok(Box::new(provider))
    }
}
