use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("camera unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("display unavailable: {0}")]
    RenderUnavailable(String),

    #[error("prediction cycle failed: {0}")]
    Cycle(String),

    #[error("session has already been started")]
    AlreadyStarted,
}
