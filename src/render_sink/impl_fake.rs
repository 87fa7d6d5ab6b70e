use crate::frame::Frame;
use crate::prediction::{CycleView, DetailView, HeadlineView};
use crate::render_sink::interface::{RenderBuffer, RenderSink};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct RenderSinkFakeState {
    pub buffer: RenderBuffer,
    pub headline_history: Vec<HeadlineView>,
    pub detail_writes: usize,
    pub surfaces_drawn: usize,
    pub build_calls: usize,
    pub errors_shown: Vec<String>,
    /// Every write after this many headline writes fails.
    pub fail_after_headlines: Option<usize>,
}

/// Records everything written to it. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct RenderSinkFake {
    state: Arc<Mutex<RenderSinkFakeState>>,
}

impl RenderSinkFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after_headlines(self, count: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fail_after_headlines = Some(count);
        }
        self
    }

    pub fn snapshot(&self) -> RenderSinkFakeState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    fn with_state<T, F>(&self, f: F) -> Result<T, Box<dyn Error + Send + Sync>>
    where
        F: FnOnce(&mut RenderSinkFakeState) -> Result<T, Box<dyn Error + Send + Sync>>,
    {
        let mut state = self.state.lock().map_err(|_| "Render state poisoned")?;
        if let Some(limit) = state.fail_after_headlines {
            if state.headline_history.len() >= limit {
                return Err("Render surface detached".into());
            }
        }
        f(&mut state)
    }
}

impl RenderSink for RenderSinkFake {
    fn build_slots(&mut self, count: usize) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.build_calls += 1;
            state.buffer.build_slots(count);
            Ok(())
        })
    }

    fn slot_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.buffer.details.len())
            .unwrap_or_default()
    }

    fn set_headline(&mut self, headline: &HeadlineView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.buffer.headline = headline.clone();
            state.headline_history.push(headline.clone());
            Ok(())
        })
    }

    fn set_detail(
        &mut self,
        index: usize,
        detail: &DetailView,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.detail_writes += 1;
            state.buffer.set_detail(index, detail)
        })
    }

    fn set_view(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.buffer.set_view(view)?;
            state.detail_writes += view.details.len();
            state.headline_history.push(view.headline.clone());
            Ok(())
        })
    }

    fn draw_surface(&mut self, _frame: &Frame) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.surfaces_drawn += 1;
            Ok(())
        })
    }

    fn show_error(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock().map_err(|_| "Render state poisoned")?;
        state.buffer.show_error(message);
        state.errors_shown.push(message.to_string());
        Ok(())
    }
}
