//! Renderer and engine error types.

use draw_core::DrawError;
use thiserror::Error;

use crate::engine::Capability;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for canvas engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while rasterizing or encoding a surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface could not be allocated (zero or oversized dimensions).
    #[error("Rendering context unavailable: {0}")]
    ContextUnavailable(String),

    /// SVG parsing failed.
    #[error("SVG error: {0}")]
    Svg(String),

    /// Image encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),
}

/// Errors returned by canvas engines and the engine registry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine does not implement the requested capability.
    #[error("Engine '{engine}' does not support {capability}")]
    Unsupported {
        /// Engine identifier.
        engine: &'static str,
        /// The missing capability.
        capability: Capability,
    },

    /// No engine is registered under this identifier.
    #[error("Unknown canvas engine: {0}")]
    UnknownEngine(String),

    /// The drawing request was invalid.
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
