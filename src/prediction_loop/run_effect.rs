use crate::prediction_loop::core::{Effect, Msg};
use crate::prediction_loop::session::Session;

impl Session {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::LoadModel => {
                if self.cancel.is_cancelled() {
                    return Some(Msg::Cancelled);
                }
                let model_location = self.config.model_location();
                let metadata_location = self.config.metadata_location();
                let loaded = self.loader.load(&model_location, &metadata_location);
                let class_count = loaded.map(|provider| {
                    let class_count = provider.class_count();
                    let _ = self.logger.info(&format!(
                        "Model loaded with classes: {}",
                        provider.labels().join(", ")
                    ));
                    self.provider = Some(provider);
                    class_count
                });
                Some(Msg::ModelLoadDone(class_count))
            }
            Effect::StartCamera => {
                if self.cancel.is_cancelled() {
                    return Some(Msg::Cancelled);
                }
                let started = self
                    .frame_source
                    .setup()
                    .and_then(|_| self.frame_source.start());
                Some(Msg::CameraStartDone(started))
            }
            Effect::BuildSlots { class_count } => {
                if self.cancel.is_cancelled() {
                    return Some(Msg::Cancelled);
                }
                Some(Msg::SlotsBuilt(self.build_slots(class_count)))
            }
            Effect::ShowStartupError { message } => {
                if let Err(e) = self.render_sink.show_error(&message) {
                    let _ = self.logger.error(&format!("Failed to show error: {}", e));
                }
                None
            }
            Effect::ScheduleNextCycle => {
                if self.cancel.is_cancelled() {
                    return Some(Msg::Cancelled);
                }
                let fired_at = self.refresh_clock.wait_next();
                if self.cancel.is_cancelled() {
                    return Some(Msg::Cancelled);
                }
                Some(Msg::Refresh(fired_at))
            }
            Effect::CaptureFrame => Some(Msg::FrameCaptureDone(self.frame_source.next_frame())),
            Effect::Predict { frame } => {
                let predicted = match self.provider.as_mut() {
                    Some(provider) => provider.predict(&frame),
                    None => Err("No model loaded".into()),
                };
                Some(Msg::PredictDone(predicted))
            }
            Effect::Render { view } => Some(Msg::RenderDone(self.render(&view))),
            Effect::LogCycleFailure {
                message,
                consecutive,
            } => {
                let _ = self.logger.error(&format!(
                    "Skipping cycle ({} of {} tolerated in a row): {}",
                    consecutive, self.config.max_consecutive_cycle_failures, message
                ));
                None
            }
            Effect::ShowFault { message } => {
                let _ = self
                    .logger
                    .error(&format!("Prediction loop halted: {}", message));
                if let Err(e) = self
                    .render_sink
                    .show_error(&format!("Prediction stopped: {}", message))
                {
                    let _ = self.logger.error(&format!("Failed to show fault: {}", e));
                }
                None
            }
            Effect::ReleaseCamera => {
                if let Err(e) = self.frame_source.stop() {
                    let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
                }
                None
            }
        }
    }
}
