//! Error types for drawing operations.

use thiserror::Error;

/// Result type for drawing operations.
pub type DrawResult<T> = Result<T, DrawError>;

/// Errors that can occur while editing a drawing session.
#[derive(Debug, Error)]
pub enum DrawError {
    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Brush size outside the allowed range.
    #[error("Invalid brush size {size} (allowed 1..={max})")]
    InvalidBrushSize {
        /// The rejected size.
        size: u32,
        /// The largest allowed size.
        max: u32,
    },

    /// Sticker identifier is not part of the catalog.
    #[error("Unknown sticker: {0}")]
    UnknownSticker(String),

    /// Stamp identifier is not part of the catalog.
    #[error("Unknown stamp: {0}")]
    UnknownStamp(String),

    /// Template identifier is not part of the catalog.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A gesture did not carry enough points for the active tool.
    #[error("Empty gesture")]
    EmptyGesture,
}
