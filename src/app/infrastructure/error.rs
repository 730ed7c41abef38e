use thiserror::Error;

use crate::app::domain::view::{FrameId, GroupId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown window: {0}")]
    UnknownFrame(FrameId),

    #[error("Unknown window group: {0}")]
    UnknownGroup(GroupId),

    #[error("Logging error: {0}")]
    Logging(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
