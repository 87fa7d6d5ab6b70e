use crate::frame::Frame;
use crate::prediction::{CycleView, DetailView, HeadlineView};
use crate::render_sink::interface::{RenderBuffer, RenderSink};
use std::error::Error;

const BAR_WIDTH: usize = 20;

/// Text bars on stdout. A screen is printed whenever the headline is written
/// and differs from the last printed screen.
pub struct RenderSinkConsole {
    buffer: RenderBuffer,
    last_printed: Option<String>,
}

impl RenderSinkConsole {
    pub fn new() -> Self {
        Self {
            buffer: RenderBuffer::default(),
            last_printed: None,
        }
    }

    fn bar(fill_percent: u8) -> String {
        let filled = (fill_percent.min(100) as usize * BAR_WIDTH) / 100;
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }

    fn screen(&self) -> String {
        if let Some(error) = &self.buffer.error {
            return format!("Error: {}", error);
        }

        let headline = &self.buffer.headline;
        let mut lines = vec![format!(
            "Prediction: {} [{}] {} {}%",
            headline.text,
            headline.color.hex(),
            Self::bar(headline.fill_percent),
            headline.fill_percent
        )];
        for detail in &self.buffer.details {
            lines.push(format!(
                "  {}: {} {}",
                detail.label,
                detail.percent_text,
                Self::bar(detail.fill_percent)
            ));
        }
        lines.join("\n")
    }

    fn print(&mut self) {
        let screen = self.screen();
        if self.last_printed.as_ref() != Some(&screen) {
            println!("{}", screen);
            self.last_printed = Some(screen);
        }
    }
}

impl RenderSink for RenderSinkConsole {
    fn build_slots(&mut self, count: usize) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.build_slots(count);
        self.print();
        Ok(())
    }

    fn slot_count(&self) -> usize {
        self.buffer.details.len()
    }

    fn set_headline(&mut self, headline: &HeadlineView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.headline = headline.clone();
        self.print();
        Ok(())
    }

    fn set_detail(
        &mut self,
        index: usize,
        detail: &DetailView,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.set_detail(index, detail)
    }

    fn set_view(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.set_view(view)?;
        self.print();
        Ok(())
    }

    fn draw_surface(&mut self, _frame: &Frame) -> Result<(), Box<dyn Error + Send + Sync>> {
        // No image output on a terminal
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.show_error(message);
        self.print();
        Ok(())
    }
}
