//! Canvas engine abstraction.
//!
//! Every drawing backend implements [`CanvasEngine`]. Optional operations
//! (redo, image import, templates) are advertised through [`Capabilities`];
//! calling one an engine lacks returns [`EngineError::Unsupported`] instead of
//! panicking, so callers check [`CanvasEngine::supports`] first.
//!
//! Engines are created by id through the [`EngineRegistry`]. Switching engines
//! means dropping the old instance and creating a new blank one; nothing is
//! converted between engines.

mod pixel;
mod vector;
mod whiteboard;

use std::fmt;

use draw_core::{DrawCommand, Point};

use crate::error::{EngineError, EngineResult, RenderResult};

pub use pixel::PixelEngine;
pub use vector::VectorEngine;
pub use whiteboard::WhiteboardEngine;

/// Largest share of each surface dimension an imported image may cover.
pub const IMPORT_MAX_FRACTION: f32 = 0.8;

/// Share of the shorter surface dimension covered by a template outline.
pub const TEMPLATE_FRACTION: f32 = 0.6;

/// Width of template outlines in pixels.
pub const TEMPLATE_LINE_WIDTH: f32 = 4.0;

/// An optional engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Re-apply undone steps.
    Redo,
    /// Place a picture from a data URL.
    ImportImage,
    /// Draw predefined outlines.
    Templates,
}

impl Capability {
    /// Every capability, in display order.
    pub const ALL: [Self; 3] = [Self::Redo, Self::ImportImage, Self::Templates];

    const fn bit(self) -> u8 {
        match self {
            Self::Redo => 1,
            Self::ImportImage => 1 << 1,
            Self::Templates => 1 << 2,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Redo => "redo",
            Self::ImportImage => "import",
            Self::Templates => "templates",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of optional capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No optional capabilities (undo only).
    pub const NONE: Self = Self(0);

    /// Add a capability.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// Whether the set contains `capability`.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Iterate the contained capabilities.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(Capability::name).collect();
        if names.is_empty() {
            f.write_str("undo")
        } else {
            write!(f, "undo, {}", names.join(", "))
        }
    }
}

/// Static description of a registered engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineDescriptor {
    /// Stable identifier used for switching.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Toolbar icon.
    pub icon: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Optional operations the engine implements.
    pub capabilities: Capabilities,
}

/// A drawing backend.
pub trait CanvasEngine: Send {
    /// Descriptor this engine was registered with.
    fn descriptor(&self) -> &'static EngineDescriptor;

    /// Optional operations this engine implements.
    fn capabilities(&self) -> Capabilities {
        self.descriptor().capabilities
    }

    /// Whether `capability` is implemented.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Apply one command as its own history step.
    ///
    /// # Errors
    ///
    /// See [`CanvasEngine::draw_batch`].
    fn draw(&mut self, command: &DrawCommand) -> EngineResult<()> {
        self.draw_batch(std::slice::from_ref(command))
    }

    /// Apply several commands as a single history step.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be applied; the surface is left
    /// as it was before the batch.
    fn draw_batch(&mut self, commands: &[DrawCommand]) -> EngineResult<()>;

    /// Empty the surface. Undoable.
    fn clear(&mut self);

    /// Step back one history entry. Returns `false` if there was nothing to undo.
    fn undo(&mut self) -> bool;

    /// Whether an undo step exists.
    fn can_undo(&self) -> bool;

    /// Re-apply the last undone step. Returns `Ok(false)` if there was nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unsupported`] unless the engine has [`Capability::Redo`].
    fn redo(&mut self) -> EngineResult<bool> {
        Err(unsupported(self.descriptor(), Capability::Redo))
    }

    /// Whether a redo step exists. Always `false` without [`Capability::Redo`].
    fn can_redo(&self) -> bool {
        false
    }

    /// Place a picture from a `data:image/...` URL, centered and scaled to fit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unsupported`] unless the engine has
    /// [`Capability::ImportImage`], or a render error if the picture cannot be decoded.
    fn import_image(&mut self, data_url: &str) -> EngineResult<()> {
        let _ = data_url;
        Err(unsupported(self.descriptor(), Capability::ImportImage))
    }

    /// Draw a predefined outline centered on the surface.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unsupported`] unless the engine has
    /// [`Capability::Templates`], or a draw error for unknown ids.
    fn add_template(&mut self, template_id: &str) -> EngineResult<()> {
        let _ = template_id;
        Err(unsupported(self.descriptor(), Capability::Templates))
    }

    /// Encode the visible surface as a `data:image/png;base64,` URL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::ContextUnavailable`] if there is no surface to encode.
    fn to_data_url(&self) -> RenderResult<String>;
}

fn unsupported(descriptor: &EngineDescriptor, capability: Capability) -> EngineError {
    EngineError::Unsupported {
        engine: descriptor.id,
        capability,
    }
}

/// Center and edge length of a template outline on a `width` x `height` surface.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn template_frame(width: u32, height: u32) -> (Point, f32) {
    let center = Point::new(width as f32 / 2.0, height as f32 / 2.0);
    (center, width.min(height) as f32 * TEMPLATE_FRACTION)
}

/// Constructor for a registered engine.
pub type EngineFactory = fn(u32, u32) -> RenderResult<Box<dyn CanvasEngine>>;

/// Engines available by id.
pub struct EngineRegistry {
    entries: Vec<(&'static EngineDescriptor, EngineFactory)>,
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(d, _)| d.id))
            .finish()
    }
}

impl EngineRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry with the vector, pixel and whiteboard engines.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(&vector::DESCRIPTOR, vector::factory);
        registry.register(&pixel::DESCRIPTOR, pixel::factory);
        registry.register(&whiteboard::DESCRIPTOR, whiteboard::factory);
        registry
    }

    /// Register an engine, replacing any previous one with the same id.
    pub fn register(&mut self, descriptor: &'static EngineDescriptor, factory: EngineFactory) {
        if let Some(entry) = self.entries.iter_mut().find(|(d, _)| d.id == descriptor.id) {
            *entry = (descriptor, factory);
        } else {
            self.entries.push((descriptor, factory));
        }
        tracing::debug!(engine = descriptor.id, "Registered canvas engine");
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static EngineDescriptor> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    /// Look up a descriptor by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'static EngineDescriptor> {
        self.descriptors().find(|d| d.id == id)
    }

    /// Id of the first registered engine.
    #[must_use]
    pub fn default_id(&self) -> Option<&'static str> {
        self.entries.first().map(|(d, _)| d.id)
    }

    /// Create a blank engine of `width` x `height`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEngine`] for unregistered ids, or a render
    /// error if the surface cannot be allocated.
    pub fn create(&self, id: &str, width: u32, height: u32) -> EngineResult<Box<dyn CanvasEngine>> {
        let (descriptor, factory) = self
            .entries
            .iter()
            .find(|(d, _)| d.id == id)
            .ok_or_else(|| EngineError::UnknownEngine(id.to_string()))?;
        let engine = factory(width, height)?;
        tracing::debug!(engine = descriptor.id, width, height, "Created canvas engine");
        Ok(engine)
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
