use crate::frame::Frame;
use crate::prediction::PredictionSet;
use std::error::Error;

pub trait InferenceProvider: Send {
    /// Fixed for the lifetime of the provider.
    fn class_count(&self) -> usize;

    /// Class labels in the order every `PredictionSet` follows.
    fn labels(&self) -> Vec<String>;

    fn predict(&mut self, frame: &Frame) -> Result<PredictionSet, Box<dyn Error + Send + Sync>>;
}

pub trait InferenceProviderLoader: Send + Sync {
    fn load(
        &self,
        model_location: &str,
        metadata_location: &str,
    ) -> Result<Box<dyn InferenceProvider>, Box<dyn Error + Send + Sync>>;
}
