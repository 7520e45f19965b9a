//! # Kids Draw Renderer
//!
//! Interchangeable canvas engines behind one capability-checked trait.
//!
//! ## Engines
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             CanvasEngine Trait              │
//! ├─────────────┬─────────────┬─────────────────┤
//! │ Vector      │ Pixel       │ Whiteboard      │
//! │ (SVG/resvg) │ (tiny-skia) │ (smoothed ink)  │
//! └─────────────┴─────────────┴─────────────────┘
//!                      │
//!              PNG data URL snapshot
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod error;
pub mod export;
pub mod image;
pub mod raster;
pub mod scene;

pub use engine::{
    CanvasEngine, Capabilities, Capability, EngineDescriptor, EngineFactory, EngineRegistry,
    PixelEngine, VectorEngine, WhiteboardEngine, IMPORT_MAX_FRACTION,
};
pub use error::{EngineError, EngineResult, RenderError, RenderResult};
pub use export::{ExportConfig, SceneExporter};
pub use scene::{VectorElement, VectorScene};
