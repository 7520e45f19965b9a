//! Application error types.

use draw_client::ClientError;
use draw_core::DrawError;
use draw_renderer::{EngineError, RenderError};
use thiserror::Error;

/// Result type for app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the app controller and its helpers.
#[derive(Debug, Error)]
pub enum AppError {
    /// No canvas engine is active.
    #[error("no canvas is active")]
    NoCanvas,

    /// A download was requested before any model was generated.
    #[error("no generated model yet")]
    NoResult,

    /// Invalid drawing input.
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// Canvas engine failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Snapshot rendering failure.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Backend failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The model could not be parsed.
    #[error("invalid 3D model: {0}")]
    Model(#[from] gltf::Error),

    /// A drawing script could not be read.
    #[error("invalid drawing script: {0}")]
    Script(#[from] serde_json::Error),

    /// The URL could not be handed to the opener.
    #[error("cannot open {url}: {reason}")]
    Open {
        /// URL that was being opened.
        url: String,
        /// Why it failed.
        reason: String,
    },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message suitable for the error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
