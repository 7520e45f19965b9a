//! # Kids Draw App
//!
//! Ties the drawing session, the canvas engines, the backend client and the
//! model viewer together.
//!
//! ## Flow
//!
//! ```text
//! toolbar ──▶ DrawingSession ──▶ CanvasEngine ──▶ PNG data URL
//!                                                     │
//!                                                     ▼
//! ModelViewer ◀── GenerationState ◀── GenerationApi (POST /api/generate)
//!      │
//!      └──▶ downloads (GLB via model URL, STL via task id)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod error;
pub mod script;
pub mod toolbar;
pub mod viewer;

pub use config::{AppConfig, CliArgs, Command, GlobalArgs, NARROW_VIEWPORT_MAX};
pub use controller::{download_file_name, AppController, GlbDownload, LogOpener, UrlOpener};
pub use error::{AppError, AppResult};
pub use script::{DrawingScript, ScriptStep};
pub use toolbar::ToolbarAction;
pub use viewer::{Bounds, ModelSummary, ModelViewer};
