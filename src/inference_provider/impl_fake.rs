use crate::frame::Frame;
use crate::inference_provider::interface::{InferenceProvider, InferenceProviderLoader};
use crate::library::logger::interface::Logger;
use crate::prediction::{ClassPrediction, PredictionSet};
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};

pub type ScriptedPrediction = Result<PredictionSet, String>;

/// Random probabilities over a fixed label list, or a scripted sequence when
/// one is queued.
pub struct InferenceProviderFake {
    labels: Vec<String>,
    script: VecDeque<ScriptedPrediction>,
    predict_count: Arc<Mutex<usize>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceProviderFake {
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            labels,
            script: VecDeque::new(),
            predict_count: Arc::new(Mutex::new(0)),
            logger: logger.with_namespace("inference").with_namespace("fake"),
        }
    }

    fn random_predictions(&self) -> Result<PredictionSet, Box<dyn Error + Send + Sync>> {
        let mut rng = rand::rng();
        let weight_dist = Uniform::new(0.0f32, 1.0f32)?;

        let weights: Vec<f32> = self
            .labels
            .iter()
            .map(|_| weight_dist.sample(&mut rng))
            .collect();
        let total: f32 = weights.iter().sum();

        let predictions = self
            .labels
            .iter()
            .zip(weights)
            .map(|(label, weight)| {
                let probability = if total > 0.0 { weight / total } else { 0.0 };
                ClassPrediction::new(label.clone(), probability)
            })
            .collect::<Vec<_>>();

        Ok(predictions.into())
    }
}

impl InferenceProvider for InferenceProviderFake {
    fn class_count(&self) -> usize {
        self.labels.len()
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn predict(&mut self, frame: &Frame) -> Result<PredictionSet, Box<dyn Error + Send + Sync>> {
        if let Ok(mut count) = self.predict_count.lock() {
            *count += 1;
        }

        match self.script.pop_front() {
            Some(Ok(predictions)) => Ok(predictions),
            Some(Err(message)) => {
                self.logger
                    .error(&format!("Scripted failure on frame {}", frame.id))?;
                Err(message.into())
            }
            None => self.random_predictions(),
        }
    }
}

/// Hands out `InferenceProviderFake`s; can be told to fail or to replay a
/// script of predictions.
#[derive(Clone)]
pub struct InferenceProviderLoaderFake {
    labels: Vec<String>,
    failure: Option<String>,
    script: Vec<ScriptedPrediction>,
    load_count: Arc<Mutex<usize>>,
    predict_count: Arc<Mutex<usize>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceProviderLoaderFake {
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            labels,
            failure: None,
            script: Vec::new(),
            load_count: Arc::new(Mutex::new(0)),
            predict_count: Arc::new(Mutex::new(0)),
            logger,
        }
    }

    #[allow(dead_code)]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn with_script(mut self, script: Vec<ScriptedPrediction>) -> Self {
        self.script = script;
        self
    }

    #[allow(dead_code)]
    pub fn load_count(&self) -> usize {
        self.load_count.lock().map(|c| *c).unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn predict_count(&self) -> usize {
        self.predict_count.lock().map(|c| *c).unwrap_or_default()
    }
}

impl InferenceProviderLoader for InferenceProviderLoaderFake {
    fn load(
        &self,
        model_location: &str,
        metadata_location: &str,
    ) -> Result<Box<dyn InferenceProvider>, Box<dyn Error + Send + Sync>> {
        if let Ok(mut count) = self.load_count.lock() {
            *count += 1;
        }

        self.logger.info(&format!(
            "Loading fake model ({}, {})",
            model_location, metadata_location
        ))?;

        if let Some(message) = &self.failure {
            return Err(message.clone().into());
        }
        if self.labels.is_empty() {
            return Err("Model declares no classes".into());
        }

        let mut provider = InferenceProviderFake::new(self.labels.clone(), self.logger.clone());
        provider.script = self.script.iter().cloned().collect();
        provider.predict_count = Arc::clone(&self.predict_count);

        Ok(Box::new(provider))
    }
}
