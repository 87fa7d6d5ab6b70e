use crate::config::Config;
use crate::frame_source::interface::FrameSource;
use crate::inference_provider::interface::{InferenceProvider, InferenceProviderLoader};
use crate::library::cancellation::CancellationToken;
use crate::library::logger::interface::Logger;
use crate::prediction_loop::core::{init, transition, Effect, Msg, State};
use crate::prediction_loop::error::SessionError;
use crate::refresh_clock::interface::RefreshClock;
use crate::render_sink::interface::RenderSink;
use std::collections::VecDeque;
use std::sync::Arc;

/// Everything one prediction session owns. Created once, run once.
pub struct Session {
    pub(super) config: Config,
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) loader: Arc<dyn InferenceProviderLoader>,
    pub(super) provider: Option<Box<dyn InferenceProvider>>,
    pub(super) frame_source: Box<dyn FrameSource>,
    pub(super) render_sink: Box<dyn RenderSink>,
    pub(super) refresh_clock: Box<dyn RefreshClock>,
    pub(super) cancel: CancellationToken,
    state: State,
}

impl Session {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        loader: Arc<dyn InferenceProviderLoader>,
        frame_source: Box<dyn FrameSource>,
        render_sink: Box<dyn RenderSink>,
        refresh_clock: Box<dyn RefreshClock>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("session"),
            loader,
            provider: None,
            frame_source,
            render_sink,
            refresh_clock,
            cancel,
            state: State::Uninitialized,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Initializes, then drives cycles until cancelled or faulted. Returns
    /// the number of completed cycles.
    pub fn run(&mut self) -> Result<u64, SessionError> {
        if self.state != State::Uninitialized {
            return Err(SessionError::AlreadyStarted);
        }

        let (state, effects) = init();
        self.state = state;

        let mut inbox = VecDeque::new();
        self.run_effects(effects, &mut inbox);

        // One message in flight at a time: every cycle effect yields
        // exactly one follow-up message.
        while let Some(msg) = inbox.pop_front() {
            let old_label = self.state.label();
            let msg_display = msg.to_display_string();

            let old_state = std::mem::replace(&mut self.state, State::Uninitialized);
            let (new_state, effects) = transition(&self.config, old_state, msg);

            if new_state.label() != old_label {
                let _ = self.logger.info(&format!(
                    "{} -> {} on {}",
                    old_label,
                    new_state.label(),
                    msg_display
                ));
            }

            self.state = new_state;
            self.run_effects(effects, &mut inbox);
        }

        match &self.state {
            State::Stopped { completed_cycles } => Ok(*completed_cycles),
            State::StartupFailed { error } | State::Faulted { error, .. } => Err(error.clone()),
            other => Err(SessionError::Cycle(format!(
                "loop went idle in state {}",
                other.label()
            ))),
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>, inbox: &mut VecDeque<Msg>) {
        for effect in effects {
            if let Some(msg) = self.run_effect(effect) {
                inbox.push_back(msg);
            }
        }
    }
}
