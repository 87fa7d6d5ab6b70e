use crate::prediction::{Color, CycleView, HeadlineView};
use crate::prediction_loop::session::Session;
use std::error::Error;

impl Session {
    pub(super) fn build_slots(
        &mut self,
        class_count: usize,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_sink.build_slots(class_count)?;
        self.render_sink.set_headline(&HeadlineView {
            text: self.config.ready_message.clone(),
            color: Color::neutral(),
            fill_percent: 0,
        })?;
        Ok(())
    }

    /// Surface first, then the whole view in one write.
    pub(super) fn render(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(frame) = self.frame_source.surface() {
            self.render_sink.draw_surface(frame)?;
        }

        self.render_sink.set_view(view)
    }
}
