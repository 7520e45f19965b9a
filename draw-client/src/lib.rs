//! # Kids Draw Client
//!
//! HTTP client for the 3D generation backend.
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`GenerationApi::generate_3d_model`] | `POST /api/generate` |
//! | [`GenerationApi::download_stl`] | `GET /api/download/{task_id}` |
//! | [`GenerationApi::task_status`] | `GET /api/status/{task_id}` |
//! | [`GenerationApi::health`] | `GET /` |
//! | [`GenerationApi::fetch_model`] | model URL from a generation result |
//!
//! The app talks to the backend only through the [`GenerationApi`] trait, so
//! tests can swap in a fake.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod wire;

pub use client::{ApiClient, GenerationApi, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use wire::{HealthStatus, TaskState, TaskStatus};
