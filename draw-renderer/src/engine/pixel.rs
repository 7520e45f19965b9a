//! Immediate-mode pixel engine with flood fill.

use draw_core::{Color, DrawCommand, History};
use tiny_skia::Pixmap;

use super::{CanvasEngine, Capabilities, Capability, EngineDescriptor, IMPORT_MAX_FRACTION};
use crate::error::{EngineResult, RenderResult};
use crate::image::{load_image_from_data_uri, texture_to_pixmap, ImageRect};
use crate::raster::{self, FILL_TOLERANCE};

pub(crate) static DESCRIPTOR: EngineDescriptor = EngineDescriptor {
    id: "pixel",
    name: "Pixel Paint",
    icon: "🎨",
    description: "Paint straight onto pixels and fill areas with the paint bucket",
    capabilities: Capabilities::NONE.with(Capability::ImportImage),
};

/// Snapshots kept for undo. Each one is a full copy of the surface.
const PIXEL_HISTORY_LIMIT: usize = 20;

pub(crate) fn factory(width: u32, height: u32) -> RenderResult<Box<dyn CanvasEngine>> {
    Ok(Box::new(PixelEngine::new(width, height)?))
}

/// Paints every command straight into an RGBA pixmap.
#[derive(Debug)]
pub struct PixelEngine {
    surface: Pixmap,
    history: History<Pixmap>,
}

impl PixelEngine {
    /// Create a blank white engine.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::ContextUnavailable`] if the surface cannot be allocated.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            surface: raster::new_surface(width, height, Color::WHITE)?,
            history: History::undo_only(PIXEL_HISTORY_LIMIT),
        })
    }

    /// The current surface.
    #[must_use]
    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    fn apply(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Stroke(stroke) => raster::paint_stroke(&mut self.surface, stroke, None, false),
            DrawCommand::Erase(stroke) => {
                raster::paint_stroke(&mut self.surface, stroke, Some(Color::WHITE), false);
            }
            DrawCommand::Sticker(p) | DrawCommand::Stamp(p) => {
                raster::fill_contours(&mut self.surface, &p.shape.contours_at(p.center, p.size), p.color);
            }
            DrawCommand::Fill { at, color } => {
                if !raster::flood_fill(&mut self.surface, *at, *color, FILL_TOLERANCE) {
                    tracing::trace!(x = at.x, y = at.y, "Flood fill changed nothing");
                }
            }
        }
    }
}

impl CanvasEngine for PixelEngine {
    fn descriptor(&self) -> &'static EngineDescriptor {
        &DESCRIPTOR
    }

    fn size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    fn draw_batch(&mut self, commands: &[DrawCommand]) -> EngineResult<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let before = self.surface.clone();
        for command in commands {
            self.apply(command);
        }
        if before.data() == self.surface.data() {
            tracing::trace!(count = commands.len(), "Batch left the surface unchanged");
        } else {
            self.history.record(before);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.history.record(self.surface.clone());
        self.surface.fill(raster::to_skia(Color::WHITE));
    }

    fn undo(&mut self) -> bool {
        self.history.undo(&mut self.surface)
    }

    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn import_image(&mut self, data_url: &str) -> EngineResult<()> {
        let texture = load_image_from_data_uri(data_url)?;
        let picture = texture_to_pixmap(&texture)?;
        let rect = ImageRect::centered_fit(
            texture.width,
            texture.height,
            self.surface.width(),
            self.surface.height(),
            IMPORT_MAX_FRACTION,
        );
        self.history.record(self.surface.clone());
        raster::draw_image(&mut self.surface, &picture, rect);
        tracing::debug!(width = texture.width, height = texture.height, "Imported image");
        Ok(())
    }

    fn to_data_url(&self) -> RenderResult<String> {
        raster::to_data_url(&self.surface)
    }
}
