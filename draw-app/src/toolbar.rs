//! Stateless toolbar: fixed palettes and the actions they emit.
//!
//! The toolbar owns no state. It renders the current [`DrawingSession`] and
//! turns clicks into [`ToolbarAction`]s, which the controller applies through
//! the session's named transitions.

use draw_core::shape::{StampDef, StickerDef, STAMPS, STICKERS};
use draw_core::{Color, DrawResult, DrawingSession, SymmetryMode, Tool};
use serde::{Deserialize, Serialize};

/// Crayon box offered by the color picker.
pub const COLOR_PALETTE: [Color; 12] = [
    Color::rgb(0, 0, 0),
    Color::rgb(255, 255, 255),
    Color::rgb(235, 50, 60),
    Color::rgb(255, 140, 0),
    Color::rgb(255, 215, 0),
    Color::rgb(60, 180, 75),
    Color::rgb(0, 170, 220),
    Color::rgb(40, 80, 200),
    Color::rgb(145, 60, 200),
    Color::rgb(255, 120, 180),
    Color::rgb(140, 90, 50),
    Color::rgb(128, 128, 128),
];

/// Brush sizes offered by the size picker.
pub const BRUSH_SIZES: [u32; 5] = [4, 8, 16, 24, 40];

/// Tools in toolbar order.
pub const TOOLS: [Tool; 5] = [Tool::Brush, Tool::Eraser, Tool::Sticker, Tool::Stamp, Tool::Fill];

/// Symmetry modes in toolbar order.
pub const SYMMETRY_MODES: [SymmetryMode; 4] = [
    SymmetryMode::None,
    SymmetryMode::Horizontal,
    SymmetryMode::Vertical,
    SymmetryMode::Radial,
];

/// Stickers offered by the sticker picker.
#[must_use]
pub fn stickers() -> &'static [StickerDef] {
    STICKERS
}

/// Stamps offered by the stamp picker.
#[must_use]
pub fn stamps() -> &'static [StampDef] {
    STAMPS
}

/// A toolbar interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Pick a brush color.
    SetColor(Color),
    /// Pick a brush size.
    SetSize(u32),
    /// Pick a tool.
    SelectTool(Tool),
    /// Pick a sticker (also selects the sticker tool).
    SelectSticker(String),
    /// Pick a stamp (also selects the stamp tool).
    SelectStamp(String),
    /// Pick a symmetry mode.
    SetSymmetry(SymmetryMode),
}

impl ToolbarAction {
    /// Apply the action to the session.
    ///
    /// # Errors
    ///
    /// Returns a [`draw_core::DrawError`] for unknown stickers or stamps and
    /// out-of-range brush sizes. The session is unchanged in that case.
    pub fn apply(&self, session: &mut DrawingSession) -> DrawResult<()> {
        match self {
            Self::SetColor(color) => session.set_brush_color(*color),
            Self::SetSize(size) => session.set_brush_size(*size)?,
            Self::SelectTool(tool) => session.select_tool(*tool),
            Self::SelectSticker(id) => session.select_sticker(id)?,
            Self::SelectStamp(id) => session.select_stamp(id)?,
            Self::SetSymmetry(mode) => session.set_symmetry(*mode),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_core::DrawError;

    #[test]
    fn test_actions_drive_session() {
        let mut session = DrawingSession::new();
        ToolbarAction::SetColor(COLOR_PALETTE[2])
            .apply(&mut session)
            .expect("color");
        ToolbarAction::SetSize(BRUSH_SIZES[3])
            .apply(&mut session)
            .expect("size");
        ToolbarAction::SetSymmetry(SymmetryMode::Radial)
            .apply(&mut session)
            .expect("symmetry");
        ToolbarAction::SelectStamp("heart".into())
            .apply(&mut session)
            .expect("stamp");

        assert_eq!(session.brush_color(), COLOR_PALETTE[2]);
        assert_eq!(session.brush_size(), 24);
        assert_eq!(session.symmetry(), SymmetryMode::Radial);
        assert_eq!(session.tool(), Tool::Stamp);
        assert_eq!(session.stamp_id(), "heart");
    }

    #[test]
    fn test_invalid_selection_leaves_session() {
        let mut session = DrawingSession::new();
        let before = session.clone();
        assert!(matches!(
            ToolbarAction::SelectSticker("unicorn".into()).apply(&mut session),
            Err(DrawError::UnknownSticker(_))
        ));
        assert!(ToolbarAction::SetSize(0).apply(&mut session).is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn test_palettes_are_selectable() {
        let mut session = DrawingSession::new();
        for sticker in stickers() {
            ToolbarAction::SelectSticker(sticker.id.to_string())
                .apply(&mut session)
                .expect("sticker");
        }
        for stamp in stamps() {
            ToolbarAction::SelectStamp(stamp.id.to_string())
                .apply(&mut session)
                .expect("stamp");
        }
        for size in BRUSH_SIZES {
            ToolbarAction::SetSize(size).apply(&mut session).expect("size");
        }
    }

    #[test]
    fn test_action_json_shape() {
        let action: ToolbarAction =
            serde_json::from_str(r##"{"action":"set_color","value":"#ff0000"}"##).expect("json");
        assert_eq!(action, ToolbarAction::SetColor(Color::rgb(255, 0, 0)));

        let tool: ToolbarAction =
            serde_json::from_str(r#"{"action":"select_tool","value":"eraser"}"#).expect("json");
        assert_eq!(tool, ToolbarAction::SelectTool(Tool::Eraser));
    }
}
