//! # Kids Draw Core
//!
//! Engine-independent drawing model for Kids Draw 3D.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 draw-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Primitives      │  Session                 │
//! │  - Points/colors │  - Brush & tool          │
//! │  - Draw commands │  - Symmetry expansion    │
//! │  - Shape catalog │                          │
//! ├─────────────────────────────────────────────┤
//! │  History         │  Generation              │
//! │  - Undo/redo     │  - Phase machine         │
//! │  - Snapshots     │  - Request tickets       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod generation;
pub mod history;
pub mod session;
pub mod shape;

pub use element::{Color, DrawCommand, Placement, Point, Stroke};
pub use error::{DrawError, DrawResult};
pub use generation::{
    GenerationPhase, GenerationResult, GenerationState, GenerationTicket,
    DEFAULT_GENERATION_ERROR, NO_CANVAS_MESSAGE,
};
pub use history::History;
pub use session::{DrawingSession, SymmetryMode, Tool};
pub use shape::{ShapeKind, StampDef, StickerDef, TemplateDef};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
