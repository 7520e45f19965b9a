//! Retained-mode vector engine rendered through the SVG pipeline.

use draw_core::{shape, Color, DrawCommand, History};

use super::{
    template_frame, CanvasEngine, Capabilities, Capability, EngineDescriptor, IMPORT_MAX_FRACTION,
    TEMPLATE_LINE_WIDTH,
};
use crate::error::{EngineResult, RenderError, RenderResult};
use crate::export::SceneExporter;
use crate::image::{load_image_from_data_uri, png_data_url, texture_to_pixmap, ImageRect};
use crate::raster;
use crate::scene::{VectorElement, VectorScene};

pub(crate) static DESCRIPTOR: EngineDescriptor = EngineDescriptor {
    id: "vector",
    name: "Vector",
    icon: "✏️",
    description: "Smooth shapes that stay crisp, with templates to color in",
    capabilities: Capabilities::NONE
        .with(Capability::Redo)
        .with(Capability::ImportImage)
        .with(Capability::Templates),
};

pub(crate) fn factory(width: u32, height: u32) -> RenderResult<Box<dyn CanvasEngine>> {
    Ok(Box::new(VectorEngine::new(width, height)?))
}

/// Keeps every stroke and shape as an element and renders on demand.
#[derive(Debug)]
pub struct VectorEngine {
    scene: VectorScene,
    history: History<VectorScene>,
    exporter: SceneExporter,
}

impl VectorEngine {
    /// Create a blank engine.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContextUnavailable`] for a zero-sized surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::ContextUnavailable(format!(
                "cannot create {width}x{height} vector surface"
            )));
        }
        Ok(Self {
            scene: VectorScene::new(width, height),
            history: History::default(),
            exporter: SceneExporter::with_defaults(),
        })
    }

    /// The retained scene.
    #[must_use]
    pub fn scene(&self) -> &VectorScene {
        &self.scene
    }

    fn apply(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Stroke(stroke) => self.scene.push(VectorElement::Stroke(stroke.clone())),
            DrawCommand::Erase(stroke) => self.scene.push(VectorElement::Erase(stroke.clone())),
            DrawCommand::Sticker(p) | DrawCommand::Stamp(p) => self.scene.push(VectorElement::Shape {
                contours: p.shape.contours_at(p.center, p.size),
                fill: Some(p.color),
                outline: None,
            }),
            // No pixel regions to flood; fill recolors the background.
            DrawCommand::Fill { color, .. } => self.scene.background = *color,
        }
    }

    fn checkpoint(&mut self) {
        self.history.record(self.scene.clone());
    }
}

impl CanvasEngine for VectorEngine {
    fn descriptor(&self) -> &'static EngineDescriptor {
        &DESCRIPTOR
    }

    fn size(&self) -> (u32, u32) {
        (self.scene.width, self.scene.height)
    }

    fn draw_batch(&mut self, commands: &[DrawCommand]) -> EngineResult<()> {
        if commands.is_empty() {
            return Ok(());
        }
        self.checkpoint();
        for command in commands {
            self.apply(command);
        }
        tracing::trace!(count = commands.len(), elements = self.scene.len(), "Vector batch applied");
        Ok(())
    }

    fn clear(&mut self) {
        self.checkpoint();
        self.scene.reset();
    }

    fn undo(&mut self) -> bool {
        self.history.undo(&mut self.scene)
    }

    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn redo(&mut self) -> EngineResult<bool> {
        Ok(self.history.redo(&mut self.scene))
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn import_image(&mut self, data_url: &str) -> EngineResult<()> {
        let texture = load_image_from_data_uri(data_url)?;
        // Re-encode so the scene only ever embeds PNG.
        let png = raster::encode_png(&texture_to_pixmap(&texture)?)?;
        let rect = ImageRect::centered_fit(
            texture.width,
            texture.height,
            self.scene.width,
            self.scene.height,
            IMPORT_MAX_FRACTION,
        );
        self.checkpoint();
        self.scene.push(VectorElement::Image {
            data_url: png_data_url(&png),
            rect,
        });
        tracing::debug!(width = texture.width, height = texture.height, "Imported image");
        Ok(())
    }

    fn add_template(&mut self, template_id: &str) -> EngineResult<()> {
        let def = shape::template(template_id)?;
        let (center, size) = template_frame(self.scene.width, self.scene.height);
        self.checkpoint();
        self.scene.push(VectorElement::Shape {
            contours: def.shape.contours_at(center, size),
            fill: None,
            outline: Some((Color::BLACK, TEMPLATE_LINE_WIDTH)),
        });
        Ok(())
    }

    fn to_data_url(&self) -> RenderResult<String> {
        self.exporter.render_to_data_url(&self.scene)
    }
}
