//! Drawing session state: the brush, the active tool and the symmetry mode.
//!
//! The session is owned by the app controller and only changes through the
//! named transition methods below. It also turns a pointer gesture into the
//! primitive [`DrawCommand`]s an engine applies, mirrored by the symmetry mode.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::shape::{stamp, sticker};
use crate::{Color, DrawCommand, DrawError, DrawResult, Placement, Point, Stroke};

/// Largest brush diameter in pixels.
pub const MAX_BRUSH_SIZE: u32 = 64;

/// Default brush diameter in pixels.
pub const DEFAULT_BRUSH_SIZE: u32 = 8;

/// Edge length of a placed sticker in pixels.
pub const STICKER_SIZE: f32 = 64.0;

/// Smallest edge length of a placed stamp in pixels.
pub const MIN_STAMP_SIZE: f32 = 24.0;

/// Number of copies drawn in radial symmetry.
pub const RADIAL_SEGMENTS: usize = 6;

/// The tool the pointer currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand brush.
    #[default]
    Brush,
    /// Eraser (paints the background color).
    Eraser,
    /// Places the selected sticker.
    Sticker,
    /// Places the selected stamp in the brush color.
    Stamp,
    /// Fills the region under the pointer.
    Fill,
}

/// Mirror mode applied to every gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    /// No mirroring.
    #[default]
    None,
    /// Mirror left/right across the vertical center line.
    Horizontal,
    /// Mirror top/bottom across the horizontal center line.
    Vertical,
    /// Rotated copies around the center.
    Radial,
}

impl SymmetryMode {
    /// Expand one command into its mirrored copies for a `width` x `height` surface.
    ///
    /// The unmirrored command is always first.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn expand(self, command: &DrawCommand, width: f32, height: f32) -> Vec<DrawCommand> {
        match self {
            Self::None => vec![command.clone()],
            Self::Horizontal => vec![
                command.clone(),
                command.map_points(|p| Point::new(width - p.x, p.y)),
            ],
            Self::Vertical => vec![
                command.clone(),
                command.map_points(|p| Point::new(p.x, height - p.y)),
            ],
            Self::Radial => {
                let center = Point::new(width / 2.0, height / 2.0);
                (0..RADIAL_SEGMENTS)
                    .map(|k| {
                        let angle = TAU * k as f32 / RADIAL_SEGMENTS as f32;
                        if k == 0 {
                            command.clone()
                        } else {
                            command.map_points(|p| p.rotate_around(center, angle))
                        }
                    })
                    .collect()
            }
        }
    }
}

/// The complete drawing session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSession {
    brush_color: Color,
    brush_size: u32,
    tool: Tool,
    sticker_id: String,
    stamp_id: String,
    symmetry: SymmetryMode,
}

impl DrawingSession {
    /// Create a session with the default brush.
    #[must_use]
    pub fn new() -> Self {
        Self {
            brush_color: Color::BLACK,
            brush_size: DEFAULT_BRUSH_SIZE,
            tool: Tool::Brush,
            sticker_id: "star".to_string(),
            stamp_id: "circle".to_string(),
            symmetry: SymmetryMode::None,
        }
    }

    /// Current brush color.
    #[must_use]
    pub fn brush_color(&self) -> Color {
        self.brush_color
    }

    /// Current brush diameter.
    #[must_use]
    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Selected sticker identifier.
    #[must_use]
    pub fn sticker_id(&self) -> &str {
        &self.sticker_id
    }

    /// Selected stamp identifier.
    #[must_use]
    pub fn stamp_id(&self) -> &str {
        &self.stamp_id
    }

    /// Active symmetry mode.
    #[must_use]
    pub fn symmetry(&self) -> SymmetryMode {
        self.symmetry
    }

    /// Change the brush color.
    pub fn set_brush_color(&mut self, color: Color) {
        tracing::debug!("Brush color -> {color}");
        self.brush_color = color;
    }

    /// Change the brush diameter.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::InvalidBrushSize`] for 0 or sizes above [`MAX_BRUSH_SIZE`].
    pub fn set_brush_size(&mut self, size: u32) -> DrawResult<()> {
        if size == 0 || size > MAX_BRUSH_SIZE {
            return Err(DrawError::InvalidBrushSize {
                size,
                max: MAX_BRUSH_SIZE,
            });
        }
        tracing::debug!("Brush size -> {size}");
        self.brush_size = size;
        Ok(())
    }

    /// Switch the active tool.
    pub fn select_tool(&mut self, tool: Tool) {
        tracing::debug!("Tool -> {tool:?}");
        self.tool = tool;
    }

    /// Select a sticker and switch to the sticker tool.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::UnknownSticker`] if the id is not in the catalog.
    pub fn select_sticker(&mut self, id: &str) -> DrawResult<()> {
        sticker(id)?;
        self.sticker_id = id.to_string();
        self.tool = Tool::Sticker;
        Ok(())
    }

    /// Select a stamp and switch to the stamp tool.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::UnknownStamp`] if the id is not in the catalog.
    pub fn select_stamp(&mut self, id: &str) -> DrawResult<()> {
        stamp(id)?;
        self.stamp_id = id.to_string();
        self.tool = Tool::Stamp;
        Ok(())
    }

    /// Change the symmetry mode.
    pub fn set_symmetry(&mut self, mode: SymmetryMode) {
        tracing::debug!("Symmetry -> {mode:?}");
        self.symmetry = mode;
    }

    /// Turn a pointer gesture into drawing commands for a `width` x `height` surface.
    ///
    /// Brush and eraser use every point; sticker, stamp and fill act at the
    /// last point of the gesture. The result is already expanded by the
    /// symmetry mode.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::EmptyGesture`] when `points` is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn gesture_commands(
        &self,
        points: &[Point],
        width: f32,
        height: f32,
    ) -> DrawResult<Vec<DrawCommand>> {
        let last = *points.last().ok_or(DrawError::EmptyGesture)?;
        let size = self.brush_size as f32;

        let command = match self.tool {
            Tool::Brush => DrawCommand::Stroke(Stroke::new(points.to_vec(), self.brush_color, size)),
            Tool::Eraser => DrawCommand::Erase(Stroke::new(points.to_vec(), Color::WHITE, size)),
            Tool::Sticker => {
                let def = sticker(&self.sticker_id)?;
                DrawCommand::Sticker(Placement {
                    id: def.id.to_string(),
                    shape: def.shape,
                    center: last,
                    size: STICKER_SIZE,
                    color: def.color,
                })
            }
            Tool::Stamp => {
                let def = stamp(&self.stamp_id)?;
                DrawCommand::Stamp(Placement {
                    id: def.id.to_string(),
                    shape: def.shape,
                    center: last,
                    size: (size * 4.0).max(MIN_STAMP_SIZE),
                    color: self.brush_color,
                })
            }
            Tool::Fill => DrawCommand::Fill {
                at: last,
                color: self.brush_color,
            },
        };

        Ok(self.symmetry.expand(&command, width, height))
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeKind;
    use proptest::prelude::*;

    fn stroke_points() -> Vec<Point> {
        vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]
    }

    #[test]
    fn test_defaults() {
        let session = DrawingSession::new();
        assert_eq!(session.tool(), Tool::Brush);
        assert_eq!(session.brush_size(), DEFAULT_BRUSH_SIZE);
        assert_eq!(session.brush_color(), Color::BLACK);
        assert_eq!(session.symmetry(), SymmetryMode::None);
    }

    #[test]
    fn test_brush_size_bounds() {
        let mut session = DrawingSession::new();
        assert!(session.set_brush_size(0).is_err());
        assert!(session.set_brush_size(MAX_BRUSH_SIZE + 1).is_err());
        assert_eq!(session.brush_size(), DEFAULT_BRUSH_SIZE);
        session.set_brush_size(MAX_BRUSH_SIZE).expect("max size is valid");
        assert_eq!(session.brush_size(), MAX_BRUSH_SIZE);
    }

    #[test]
    fn test_select_sticker_switches_tool() {
        let mut session = DrawingSession::new();
        session.select_sticker("heart").expect("known sticker");
        assert_eq!(session.tool(), Tool::Sticker);
        assert_eq!(session.sticker_id(), "heart");

        assert!(session.select_sticker("dragon").is_err());
        assert_eq!(session.sticker_id(), "heart");
    }

    #[test]
    fn test_brush_gesture_single_command() {
        let mut session = DrawingSession::new();
        session.set_brush_color(Color::rgb(255, 0, 0));
        let commands = session
            .gesture_commands(&stroke_points(), 100.0, 100.0)
            .expect("commands");
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            DrawCommand::Stroke(stroke) => {
                assert_eq!(stroke.color, Color::rgb(255, 0, 0));
                assert_eq!(stroke.points.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_stamp_uses_brush_color() {
        let mut session = DrawingSession::new();
        session.set_brush_color(Color::rgb(0, 0, 255));
        session.select_stamp("star").expect("known stamp");
        let commands = session
            .gesture_commands(&[Point::new(50.0, 50.0)], 100.0, 100.0)
            .expect("commands");
        match &commands[0] {
            DrawCommand::Stamp(p) => {
                assert_eq!(p.shape, ShapeKind::Star);
                assert_eq!(p.color, Color::rgb(0, 0, 255));
                assert!(p.size >= MIN_STAMP_SIZE);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_empty_gesture_rejected() {
        let session = DrawingSession::new();
        assert!(matches!(
            session.gesture_commands(&[], 100.0, 100.0),
            Err(DrawError::EmptyGesture)
        ));
    }

    #[test]
    fn test_horizontal_mirror() {
        let mut session = DrawingSession::new();
        session.set_symmetry(SymmetryMode::Horizontal);
        let commands = session
            .gesture_commands(&stroke_points(), 100.0, 80.0)
            .expect("commands");
        assert_eq!(commands.len(), 2);
        let DrawCommand::Stroke(mirrored) = &commands[1] else {
            panic!("expected stroke");
        };
        assert_eq!(mirrored.points[0], Point::new(90.0, 20.0));
    }

    #[test]
    fn test_vertical_mirror() {
        let mut session = DrawingSession::new();
        session.set_symmetry(SymmetryMode::Vertical);
        let commands = session
            .gesture_commands(&stroke_points(), 100.0, 80.0)
            .expect("commands");
        let DrawCommand::Stroke(mirrored) = &commands[1] else {
            panic!("expected stroke");
        };
        assert_eq!(mirrored.points[0], Point::new(10.0, 60.0));
    }

    #[test]
    fn test_radial_copies() {
        let mut session = DrawingSession::new();
        session.set_symmetry(SymmetryMode::Radial);
        let commands = session
            .gesture_commands(&stroke_points(), 100.0, 100.0)
            .expect("commands");
        assert_eq!(commands.len(), RADIAL_SEGMENTS);
        assert_eq!(commands[0], DrawCommand::Stroke(Stroke::new(stroke_points(), Color::BLACK, 8.0)));
    }

    proptest! {
        #[test]
        fn prop_radial_copies_keep_distance_to_center(x in 0.0f32..200.0, y in 0.0f32..200.0) {
            let command = DrawCommand::Fill { at: Point::new(x, y), color: Color::BLACK };
            let center = Point::new(100.0, 100.0);
            let expected = Point::new(x, y).distance(center);
            for copy in SymmetryMode::Radial.expand(&command, 200.0, 200.0) {
                let DrawCommand::Fill { at, .. } = copy else { unreachable!() };
                prop_assert!((at.distance(center) - expected).abs() < 1e-2);
            }
        }

        #[test]
        fn prop_mirror_twice_is_identity(x in 0.0f32..300.0, y in 0.0f32..300.0) {
            let command = DrawCommand::Fill { at: Point::new(x, y), color: Color::BLACK };
            let once = SymmetryMode::Horizontal.expand(&command, 300.0, 300.0)[1].clone();
            let twice = SymmetryMode::Horizontal.expand(&once, 300.0, 300.0)[1].clone();
            let DrawCommand::Fill { at, .. } = twice else { unreachable!() };
            prop_assert!((at.x - x).abs() < 1e-3);
            prop_assert!((at.y - y).abs() < 1e-3);
        }
    }
}
