use crate::config::Config;
use crate::frame_source::impl_fake::{FrameSourceFake, FrameSourceFakeStats};
use crate::inference_provider::impl_fake::{InferenceProviderLoaderFake, ScriptedPrediction};
use crate::library::cancellation::CancellationToken;
use crate::library::logger::impl_fake::LoggerFake;
use crate::prediction::{ClassPrediction, PredictionSet};
use crate::prediction_loop::session::Session;
use crate::refresh_clock::impl_fake::RefreshClockFake;
use crate::render_sink::impl_fake::RenderSinkFake;
use std::sync::{Arc, Mutex};

pub fn predictions(entries: &[(&str, f32)]) -> PredictionSet {
    entries
        .iter()
        .map(|(label, probability)| ClassPrediction::new(*label, *probability))
        .collect::<Vec<_>>()
        .into()
}

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub struct Fixture {
    pub config: Config,
    pub logger: LoggerFake,
    pub loader: InferenceProviderLoaderFake,
    pub frame_source: FrameSourceFake,
    pub frame_stats: Arc<Mutex<FrameSourceFakeStats>>,
    pub render_sink: RenderSinkFake,
    pub clock: RefreshClockFake,
    pub cancel: CancellationToken,
}

impl Fixture {
    /// Three classes, stops after `cycles` refresh ticks.
    pub fn new(cycles: usize) -> Self {
        Self::with_labels(&["cat", "dog", "bird"], cycles)
    }

    pub fn with_labels(names: &[&str], cycles: usize) -> Self {
        let config = Config::default();
        let logger = LoggerFake::new();
        let cancel = CancellationToken::new();
        let loader = InferenceProviderLoaderFake::new(labels(names), Arc::new(logger.clone()));
        let frame_source = FrameSourceFake::new((4, 4), Arc::new(logger.clone()));
        let frame_stats = frame_source.stats();

        Self {
            config,
            logger,
            loader,
            frame_source,
            frame_stats,
            render_sink: RenderSinkFake::new(),
            clock: RefreshClockFake::new().cancelling_after(cycles, cancel.clone()),
            cancel,
        }
    }

    pub fn script(mut self, script: Vec<ScriptedPrediction>) -> Self {
        self.loader = self.loader.with_script(script);
        self
    }

    pub fn frame_source(mut self, f: impl FnOnce(FrameSourceFake) -> FrameSourceFake) -> Self {
        let source = std::mem::replace(
            &mut self.frame_source,
            FrameSourceFake::new((4, 4), Arc::new(self.logger.clone())),
        );
        self.frame_source = f(source);
        self.frame_stats = self.frame_source.stats();
        self
    }

    /// Moves the frame source into a new session; the fixture keeps its
    /// stats handle.
    pub fn session(&mut self) -> Session {
        let frame_source = std::mem::replace(
            &mut self.frame_source,
            FrameSourceFake::new((4, 4), Arc::new(self.logger.clone())),
        );

        Session::new(
            self.config.clone(),
            Arc::new(self.logger.clone()),
            Arc::new(self.loader.clone()),
            Box::new(frame_source),
            Box::new(self.render_sink.clone()),
            Box::new(self.clock.clone()),
            self.cancel.clone(),
        )
    }

    pub fn frame_stats(&self) -> FrameSourceFakeStats {
        self.frame_stats.lock().unwrap().clone()
    }
}
