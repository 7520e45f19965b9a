//! App controller: owns the drawing session, the active canvas engine, the
//! generation state and the viewer, and orchestrates
//! draw → snapshot → generate → display → download.

use std::path::{Path, PathBuf};

use draw_client::{ClientResult, GenerationApi};
use draw_core::{
    DrawingSession, GenerationPhase, GenerationResult, GenerationState, GenerationTicket, Point,
    NO_CANVAS_MESSAGE,
};
use draw_renderer::{CanvasEngine, Capability, EngineRegistry};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, NARROW_VIEWPORT_MAX};
use crate::error::{AppError, AppResult};
use crate::toolbar::ToolbarAction;
use crate::viewer::ModelViewer;

/// Opens a URL outside the app (browser, system handler).
pub trait UrlOpener {
    /// Open `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Open`] if the URL could not be handed off.
    fn open(&self, url: &str) -> AppResult<()>;
}

/// Opener for headless hosts: reports the URL instead of launching anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOpener;

impl UrlOpener for LogOpener {
    fn open(&self, url: &str) -> AppResult<()> {
        info!(%url, "Open this link to download the model");
        Ok(())
    }
}

/// Outcome of a GLB download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlbDownload {
    /// The model was fetched and written to this path.
    Saved(PathBuf),
    /// The fetch failed; this link to the model was handed to the opener instead.
    Opened(String),
}

/// File name a downloaded model is saved under.
#[must_use]
pub fn download_file_name(task_id: &str, extension: &str) -> String {
    format!("my-3d-model-{task_id}.{extension}")
}

/// Drawing app state and transitions.
pub struct AppController<A, O> {
    api: A,
    opener: O,
    registry: EngineRegistry,
    engine: Option<Box<dyn CanvasEngine>>,
    canvas_size: (u32, u32),
    session: DrawingSession,
    generation: GenerationState,
    viewer: ModelViewer,
    download_dir: PathBuf,
    viewport_width: u32,
    preview_open: bool,
    preview_opens: usize,
}

impl<A, O> std::fmt::Debug for AppController<A, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("engine", &self.engine.as_ref().map(|e| e.descriptor().id))
            .field("canvas_size", &self.canvas_size)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("viewer", &self.viewer)
            .field("preview_open", &self.preview_open)
            .finish_non_exhaustive()
    }
}

impl<A: GenerationApi, O: UrlOpener> AppController<A, O> {
    /// Create a controller with the built-in engines.
    ///
    /// If the configured engine cannot be created the controller starts with
    /// no active canvas.
    #[must_use]
    pub fn new(api: A, opener: O, config: &AppConfig) -> Self {
        Self::with_registry(api, opener, config, EngineRegistry::with_builtin())
    }

    /// Create a controller with a custom engine registry.
    #[must_use]
    pub fn with_registry(api: A, opener: O, config: &AppConfig, registry: EngineRegistry) -> Self {
        let canvas_size = (config.canvas_width, config.canvas_height);
        let engine = match registry.create(&config.engine, canvas_size.0, canvas_size.1) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!(engine = %config.engine, "Canvas unavailable: {e}");
                None
            }
        };

        Self {
            api,
            opener,
            registry,
            engine,
            canvas_size,
            session: DrawingSession::new(),
            generation: GenerationState::new(),
            viewer: ModelViewer::new(),
            download_dir: config.download_dir.clone(),
            viewport_width: config.viewport_width,
            preview_open: false,
            preview_opens: 0,
        }
    }

    /// The active engine, if any.
    #[must_use]
    pub fn engine(&self) -> Option<&dyn CanvasEngine> {
        self.engine.as_deref()
    }

    /// Engine registry.
    #[must_use]
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Drawing session state.
    #[must_use]
    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    /// Generation phase, result and error.
    #[must_use]
    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    /// Current error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.generation.error()
    }

    /// The model viewer.
    #[must_use]
    pub fn viewer(&self) -> &ModelViewer {
        &self.viewer
    }

    /// The backend client.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn engine_mut(&mut self) -> AppResult<&mut Box<dyn CanvasEngine>> {
        self.engine.as_mut().ok_or(AppError::NoCanvas)
    }

    /// Replace the active engine with a blank one of type `id`.
    ///
    /// # Errors
    ///
    /// Returns an engine error for unknown ids; the previous engine stays active.
    pub fn switch_engine(&mut self, id: &str) -> AppResult<()> {
        let (width, height) = self.canvas_size;
        let engine = self.registry.create(id, width, height)?;
        if let Some(previous) = self.engine.replace(engine) {
            debug!(from = previous.descriptor().id, to = id, "Switched canvas engine");
        }
        Ok(())
    }

    /// Drop the active engine (the canvas went away).
    pub fn unmount(&mut self) {
        if let Some(engine) = self.engine.take() {
            debug!(engine = engine.descriptor().id, "Canvas unmounted");
        }
    }

    /// Apply a toolbar action to the session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Draw`] for invalid selections.
    pub fn apply_toolbar(&mut self, action: &ToolbarAction) -> AppResult<()> {
        action.apply(&mut self.session)?;
        Ok(())
    }

    /// Draw a pointer gesture with the current tool, brush and symmetry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoCanvas`] without an engine, or a draw error for
    /// an empty gesture.
    #[allow(clippy::cast_precision_loss)]
    pub fn gesture(&mut self, points: &[Point]) -> AppResult<()> {
        let (width, height) = self.canvas_size;
        let commands = self
            .session
            .gesture_commands(points, width as f32, height as f32)?;
        self.engine_mut()?.draw_batch(&commands)?;
        Ok(())
    }

    /// Clear the drawing, discard the generated model and empty the viewer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoCanvas`] without an engine.
    pub fn clear(&mut self) -> AppResult<()> {
        self.engine_mut()?.clear();
        self.generation.discard_result();
        self.viewer.reset();
        self.preview_open = false;
        debug!("Canvas cleared");
        Ok(())
    }

    /// Undo the last drawing step. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|e| e.undo())
    }

    /// Redo the last undone step. Returns `false` if the engine has no redo or
    /// nothing was undone.
    ///
    /// # Errors
    ///
    /// Returns an engine error if the engine fails to redo.
    pub fn redo(&mut self) -> AppResult<bool> {
        match self.engine.as_mut() {
            Some(engine) if engine.supports(Capability::Redo) => Ok(engine.redo()?),
            _ => Ok(false),
        }
    }

    /// Whether redo is available right now.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.can_redo())
    }

    /// Import a picture onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoCanvas`] without an engine, an engine error if
    /// the engine cannot import, or a decode error.
    pub fn import_image(&mut self, data_url: &str) -> AppResult<()> {
        self.engine_mut()?.import_image(data_url)?;
        Ok(())
    }

    /// Draw a template outline.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoCanvas`] without an engine, an engine error if
    /// the engine has no templates, or a draw error for unknown ids.
    pub fn add_template(&mut self, template_id: &str) -> AppResult<()> {
        self.engine_mut()?.add_template(template_id)?;
        Ok(())
    }

    /// Start a generation: snapshot the canvas and issue a ticket.
    ///
    /// Returns `None` when there is nothing to send (no canvas, or the
    /// snapshot failed); the error state says why.
    pub fn begin_generation(&mut self) -> Option<(GenerationTicket, String)> {
        let Some(engine) = self.engine.as_ref() else {
            warn!("Generate requested without a canvas");
            self.generation.set_error(NO_CANVAS_MESSAGE);
            return None;
        };
        let snapshot = engine.to_data_url();

        let ticket = self.generation.begin();
        match snapshot {
            Ok(image) => Some((ticket, image)),
            Err(e) => {
                self.fail_generation(ticket, e.to_string());
                None
            }
        }
    }

    /// Record a failure; when `ticket` is current the old model leaves the viewer.
    fn fail_generation(&mut self, ticket: GenerationTicket, message: String) {
        if self.generation.fail(ticket, message) {
            self.viewer.reset();
            self.preview_open = false;
        }
    }

    /// Finish the generation identified by `ticket`.
    ///
    /// Stale tickets are ignored. On success the viewer shows the model URL
    /// and, on a narrow viewport, the preview modal opens. On failure the
    /// viewer is emptied and the preview closes.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: ClientResult<GenerationResult>,
    ) -> GenerationPhase {
        match outcome {
            Ok(result) => {
                let model_url = result.model_url.clone();
                if self.generation.succeed(ticket, result) {
                    self.viewer.show(model_url);
                    if self.is_narrow_viewport() {
                        self.preview_open = true;
                        self.preview_opens += 1;
                    }
                }
            }
            Err(e) => self.fail_generation(ticket, e.user_message()),
        }
        self.generation.phase()
    }

    /// Snapshot the canvas, send it to the backend and display the result.
    pub async fn generate(&mut self) -> GenerationPhase {
        let Some((ticket, image)) = self.begin_generation() else {
            return self.generation.phase();
        };
        info!("Generating 3D model {ticket}");
        let outcome = self.api.generate_3d_model(&image).await;
        self.finish_generation(ticket, outcome)
    }

    fn live_result(&mut self) -> AppResult<GenerationResult> {
        if let Some(result) = self.generation.result() {
            return Ok(result.clone());
        }
        self.generation.set_error(AppError::NoResult.to_string());
        Err(AppError::NoResult)
    }

    async fn save(&mut self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let path = self.download_dir.join(file_name);
        let written = write_file(&self.download_dir, &path, bytes).await;
        if let Err(e) = written {
            self.generation.set_error(e.to_string());
            return Err(e.into());
        }
        info!(path = %path.display(), bytes = bytes.len(), "Saved download");
        Ok(path)
    }

    /// Download the GLB model into the download directory.
    ///
    /// If fetching fails, the model URL, resolved against the backend, is
    /// handed to the opener instead.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoResult`] before a successful generation, or an
    /// error if neither saving nor opening works.
    pub async fn download_glb(&mut self) -> AppResult<GlbDownload> {
        let result = self.live_result()?;
        match self.api.fetch_model(&result.model_url).await {
            Ok(bytes) => {
                if let Err(e) = self.viewer.load(&bytes) {
                    warn!("Downloaded model could not be previewed: {e}");
                }
                let path = self
                    .save(&download_file_name(&result.task_id, "glb"), &bytes)
                    .await?;
                self.generation.clear_error();
                Ok(GlbDownload::Saved(path))
            }
            Err(e) => {
                let link = self.api.model_link(&result.model_url);
                warn!(url = %link, "Model fetch failed, opening link instead: {e}");
                if let Err(open_err) = self.opener.open(&link) {
                    self.generation.set_error(open_err.to_string());
                    return Err(open_err);
                }
                self.generation.clear_error();
                Ok(GlbDownload::Opened(link))
            }
        }
    }

    /// Download the STL file into the download directory.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoResult`] before a successful generation, or the
    /// backend/filesystem error. Every failure is also recorded in the error state.
    pub async fn download_stl(&mut self) -> AppResult<PathBuf> {
        let result = self.live_result()?;
        let bytes = match self.api.download_stl(&result.task_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.generation.set_error(e.user_message());
                return Err(e.into());
            }
        };
        let path = self
            .save(&download_file_name(&result.task_id, "stl"), &bytes)
            .await?;
        self.generation.clear_error();
        Ok(path)
    }

    /// Update the viewport width (window resize).
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Whether the viewport is phone-sized.
    #[must_use]
    pub fn is_narrow_viewport(&self) -> bool {
        self.viewport_width <= NARROW_VIEWPORT_MAX
    }

    /// Whether the mobile preview modal is showing.
    #[must_use]
    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    /// How many times the preview modal has opened.
    #[must_use]
    pub fn preview_open_count(&self) -> usize {
        self.preview_opens
    }

    /// Dismiss the preview modal.
    pub fn close_preview(&mut self) {
        self.preview_open = false;
    }
}

async fn write_file(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}

