//! Whiteboard engine: freehand ink with smoothing.

use std::sync::Arc;

use draw_core::{Color, DrawCommand, History, Point, Stroke};
use tiny_skia::Pixmap;

use super::{CanvasEngine, Capabilities, Capability, EngineDescriptor, IMPORT_MAX_FRACTION};
use crate::error::{EngineResult, RenderError, RenderResult};
use crate::image::{load_image_from_data_uri, texture_to_pixmap, ImageRect};
use crate::raster;

pub(crate) static DESCRIPTOR: EngineDescriptor = EngineDescriptor {
    id: "whiteboard",
    name: "Whiteboard",
    icon: "🖍️",
    description: "Smooth marker ink that follows your hand",
    capabilities: Capabilities::NONE
        .with(Capability::Redo)
        .with(Capability::ImportImage),
};

pub(crate) fn factory(width: u32, height: u32) -> RenderResult<Box<dyn CanvasEngine>> {
    Ok(Box::new(WhiteboardEngine::new(width, height)?))
}

#[derive(Debug, Clone)]
enum Item {
    Ink(Stroke),
    Wipe(Stroke),
    Shape { contours: Vec<Vec<Point>>, color: Color },
    Picture { pixmap: Arc<Pixmap>, rect: ImageRect },
}

#[derive(Debug, Clone)]
struct Board {
    background: Color,
    items: Vec<Item>,
}

impl Board {
    fn blank() -> Self {
        Self {
            background: Color::WHITE,
            items: Vec::new(),
        }
    }
}

/// Keeps ink strokes and repaints them smoothed on every snapshot.
#[derive(Debug)]
pub struct WhiteboardEngine {
    width: u32,
    height: u32,
    board: Board,
    history: History<Board>,
}

impl WhiteboardEngine {
    /// Create a blank board.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContextUnavailable`] for a zero-sized surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::ContextUnavailable(format!(
                "cannot create {width}x{height} whiteboard"
            )));
        }
        Ok(Self {
            width,
            height,
            board: Board::blank(),
            history: History::default(),
        })
    }

    /// Number of items on the board.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.board.items.len()
    }

    /// Repaint the board into a fresh pixmap.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContextUnavailable`] if the pixmap cannot be allocated.
    pub fn render(&self) -> RenderResult<Pixmap> {
        let mut surface = raster::new_surface(self.width, self.height, self.board.background)?;
        for item in &self.board.items {
            match item {
                Item::Ink(stroke) => raster::paint_stroke(&mut surface, stroke, None, true),
                Item::Wipe(stroke) => {
                    raster::paint_stroke(&mut surface, stroke, Some(self.board.background), true);
                }
                Item::Shape { contours, color } => raster::fill_contours(&mut surface, contours, *color),
                Item::Picture { pixmap, rect } => raster::draw_image(&mut surface, pixmap, *rect),
            }
        }
        Ok(surface)
    }

    fn apply(&mut self, command: &DrawCommand) {
        let item = match command {
            DrawCommand::Stroke(stroke) => Item::Ink(stroke.clone()),
            DrawCommand::Erase(stroke) => Item::Wipe(stroke.clone()),
            DrawCommand::Sticker(p) | DrawCommand::Stamp(p) => Item::Shape {
                contours: p.shape.contours_at(p.center, p.size),
                color: p.color,
            },
            DrawCommand::Fill { color, .. } => {
                self.board.background = *color;
                return;
            }
        };
        self.board.items.push(item);
    }
}

impl CanvasEngine for WhiteboardEngine {
    fn descriptor(&self) -> &'static EngineDescriptor {
        &DESCRIPTOR
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_batch(&mut self, commands: &[DrawCommand]) -> EngineResult<()> {
        if commands.is_empty() {
            return Ok(());
        }
        self.history.record(self.board.clone());
        for command in commands {
            self.apply(command);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.history.record(self.board.clone());
        self.board = Board::blank();
    }

    fn undo(&mut self) -> bool {
        self.history.undo(&mut self.board)
    }

    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn redo(&mut self) -> EngineResult<bool> {
        Ok(self.history.redo(&mut self.board))
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn import_image(&mut self, data_url: &str) -> EngineResult<()> {
        let texture = load_image_from_data_uri(data_url)?;
        let pixmap = texture_to_pixmap(&texture)?;
        let rect = ImageRect::centered_fit(
            texture.width,
            texture.height,
            self.width,
            self.height,
            IMPORT_MAX_FRACTION,
        );
        self.history.record(self.board.clone());
        self.board.items.push(Item::Picture {
            pixmap: Arc::new(pixmap),
            rect,
        });
        Ok(())
    }

    fn to_data_url(&self) -> RenderResult<String> {
        raster::to_data_url(&self.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> DrawCommand {
        DrawCommand::Stroke(Stroke::new(
            vec![
                Point::new(5.0, 5.0),
                Point::new(15.0, 25.0),
                Point::new(25.0, 5.0),
                Point::new(35.0, 25.0),
            ],
            Color::rgb(200, 0, 0),
            4.0,
        ))
    }

    #[test]
    fn test_ink_is_painted() {
        let mut engine = WhiteboardEngine::new(40, 30).expect("engine");
        engine.draw(&zigzag()).expect("draw");
        let surface = engine.render().expect("render");
        let blank = raster::new_surface(40, 30, Color::WHITE).expect("blank");
        assert_ne!(surface.data(), blank.data());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut engine = WhiteboardEngine::new(40, 30).expect("engine");
        engine.draw(&zigzag()).expect("draw");
        let drawn = engine.to_data_url().expect("snapshot");

        assert!(engine.undo());
        assert_eq!(engine.item_count(), 0);
        assert!(engine.can_redo());
        assert!(engine.redo().expect("redo"));
        assert_eq!(engine.to_data_url().expect("snapshot"), drawn);
    }

    #[test]
    fn test_new_stroke_drops_redo() {
        let mut engine = WhiteboardEngine::new(40, 30).expect("engine");
        engine.draw(&zigzag()).expect("draw");
        engine.undo();
        engine.draw(&zigzag()).expect("draw");
        assert!(!engine.can_redo());
        assert!(!engine.redo().expect("redo"));
    }

    #[test]
    fn test_fill_recolors_board() {
        let mut engine = WhiteboardEngine::new(10, 10).expect("engine");
        engine
            .draw(&DrawCommand::Fill {
                at: Point::new(0.0, 0.0),
                color: Color::rgb(0, 0, 0),
            })
            .expect("fill");
        let surface = engine.render().expect("render");
        assert!(surface.pixels().iter().all(|p| p.red() == 0 && p.alpha() == 255));
    }
}
