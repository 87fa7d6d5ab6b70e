use crate::config::Config;
use crate::frame::Frame;
use crate::prediction::{aggregate, CycleView, PredictionSet};
use crate::prediction_loop::error::SessionError;
use std::error::Error;
use std::time::Instant;

pub type EffectResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    AwaitingRefresh,
    Capturing,
    Predicting,
    Rendering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Running {
    pub class_count: usize,
    pub phase: CyclePhase,
    pub completed_cycles: u64,
    pub consecutive_failures: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    LoadingModel,
    StartingCamera {
        class_count: usize,
    },
    BuildingSlots {
        class_count: usize,
    },
    Running(Running),
    Stopped {
        completed_cycles: u64,
    },
    StartupFailed {
        error: SessionError,
    },
    Faulted {
        completed_cycles: u64,
        error: SessionError,
    },
}

impl State {
    pub fn label(&self) -> &'static str {
        match self {
            State::Uninitialized => "Uninitialized",
            State::LoadingModel => "LoadingModel",
            State::StartingCamera { .. } => "StartingCamera",
            State::BuildingSlots { .. } => "BuildingSlots",
            State::Running(_) => "Running",
            State::Stopped { .. } => "Stopped",
            State::StartupFailed { .. } => "StartupFailed",
            State::Faulted { .. } => "Faulted",
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    ModelLoadDone(EffectResult<usize>),
    CameraStartDone(EffectResult<()>),
    SlotsBuilt(EffectResult<()>),
    Refresh(Instant),
    FrameCaptureDone(EffectResult<Frame>),
    PredictDone(EffectResult<PredictionSet>),
    RenderDone(EffectResult<()>),
    Cancelled,
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::FrameCaptureDone(Ok(frame)) => format!("FrameCaptureDone(Ok(frame {}))", frame.id),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadModel,
    StartCamera,
    BuildSlots { class_count: usize },
    ShowStartupError { message: String },
    ScheduleNextCycle,
    CaptureFrame,
    Predict { frame: Frame },
    Render { view: CycleView },
    LogCycleFailure { message: String, consecutive: u32 },
    ShowFault { message: String },
    ReleaseCamera,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Predict { frame } => format!("Predict {{ frame: {} }}", frame.id),
            Effect::Render { view } => format!("Render {{ headline: {:?} }}", view.headline.text),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::LoadingModel, vec![Effect::LoadModel])
}

pub fn transition(config: &Config, state: State, msg: Msg) -> (State, Vec<Effect>) {
    match (state, msg) {
        // Startup
        (State::LoadingModel, Msg::ModelLoadDone(Ok(0))) => startup_failed(
            config,
            SessionError::ModelLoad("model declares no classes".to_string()),
        ),
        (State::LoadingModel, Msg::ModelLoadDone(Ok(class_count))) => (
            State::StartingCamera { class_count },
            vec![Effect::StartCamera],
        ),
        (State::LoadingModel, Msg::ModelLoadDone(Err(e))) => {
            startup_failed(config, SessionError::ModelLoad(e.to_string()))
        }
        (State::StartingCamera { class_count }, Msg::CameraStartDone(Ok(()))) => (
            State::BuildingSlots { class_count },
            vec![Effect::BuildSlots { class_count }],
        ),
        (State::StartingCamera { .. }, Msg::CameraStartDone(Err(e))) => {
            startup_failed(config, SessionError::CaptureUnavailable(e.to_string()))
        }
        (State::BuildingSlots { class_count }, Msg::SlotsBuilt(Ok(()))) => (
            State::Running(Running {
                class_count,
                phase: CyclePhase::AwaitingRefresh,
                completed_cycles: 0,
                consecutive_failures: 0,
            }),
            vec![Effect::ScheduleNextCycle],
        ),
        (State::BuildingSlots { .. }, Msg::SlotsBuilt(Err(e))) => {
            let (state, mut effects) =
                startup_failed(config, SessionError::RenderUnavailable(e.to_string()));
            effects.push(Effect::ReleaseCamera);
            (state, effects)
        }
        (State::LoadingModel | State::StartingCamera { .. }, Msg::Cancelled) => (
            State::Stopped {
                completed_cycles: 0,
            },
            vec![],
        ),
        (State::BuildingSlots { .. }, Msg::Cancelled) => (
            State::Stopped {
                completed_cycles: 0,
            },
            vec![Effect::ReleaseCamera],
        ),

        // Cycle
        (State::Running(running), Msg::Cancelled) => (
            State::Stopped {
                completed_cycles: running.completed_cycles,
            },
            vec![Effect::ReleaseCamera],
        ),
        (State::Running(running), msg) => cycle(config, running, msg),

        (state, _) => (state, vec![]),
    }
}

fn startup_failed(config: &Config, error: SessionError) -> (State, Vec<Effect>) {
    (
        State::StartupFailed { error },
        vec![Effect::ShowStartupError {
            message: config.startup_error_message.clone(),
        }],
    )
}

fn cycle(config: &Config, running: Running, msg: Msg) -> (State, Vec<Effect>) {
    match (running.phase, msg) {
        (CyclePhase::AwaitingRefresh, Msg::Refresh(_)) => (
            State::Running(Running {
                phase: CyclePhase::Capturing,
                ..running
            }),
            vec![Effect::CaptureFrame],
        ),
        (CyclePhase::Capturing, Msg::FrameCaptureDone(Ok(frame))) => (
            State::Running(Running {
                phase: CyclePhase::Predicting,
                ..running
            }),
            vec![Effect::Predict { frame }],
        ),
        (CyclePhase::Predicting, Msg::PredictDone(Ok(predictions))) => {
            if predictions.len() != running.class_count {
                let message = format!(
                    "prediction covered {} of {} classes",
                    predictions.len(),
                    running.class_count
                );
                return cycle_failed(config, running, message);
            }
            (
                State::Running(Running {
                    phase: CyclePhase::Rendering,
                    ..running
                }),
                vec![Effect::Render {
                    view: aggregate(&predictions),
                }],
            )
        }
        (CyclePhase::Rendering, Msg::RenderDone(Ok(()))) => (
            State::Running(Running {
                phase: CyclePhase::AwaitingRefresh,
                completed_cycles: running.completed_cycles + 1,
                consecutive_failures: 0,
                ..running
            }),
            vec![Effect::ScheduleNextCycle],
        ),
        (CyclePhase::Capturing, Msg::FrameCaptureDone(Err(e))) => {
            cycle_failed(config, running, format!("frame capture failed: {}", e))
        }
        (CyclePhase::Predicting, Msg::PredictDone(Err(e))) => {
            cycle_failed(config, running, format!("inference failed: {}", e))
        }
        (CyclePhase::Rendering, Msg::RenderDone(Err(e))) => {
            cycle_failed(config, running, format!("render failed: {}", e))
        }
        (_, _) => (State::Running(running), vec![]),
    }
}

/// Skips the cycle while the failure streak is within tolerance, faults
/// once it is exceeded.
fn cycle_failed(config: &Config, running: Running, message: String) -> (State, Vec<Effect>) {
    let consecutive = running.consecutive_failures + 1;

    if consecutive > config.max_consecutive_cycle_failures {
        return (
            State::Faulted {
                completed_cycles: running.completed_cycles,
                error: SessionError::Cycle(message.clone()),
            },
            vec![Effect::ShowFault { message }, Effect::ReleaseCamera],
        );
    }

    (
        State::Running(Running {
            phase: CyclePhase::AwaitingRefresh,
            consecutive_failures: consecutive,
            ..running
        }),
        vec![
            Effect::LogCycleFailure {
                message,
                consecutive,
            },
            Effect::ScheduleNextCycle,
        ],
    )
}
