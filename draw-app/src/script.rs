//! Drawing scripts: a JSON list of toolbar clicks and pointer gestures.
//!
//! ```json
//! {
//!   "engine": "vector",
//!   "steps": [
//!     { "op": "toolbar", "action": "set_color", "value": "#eb323c" },
//!     { "op": "stroke", "points": [[100, 100], [200, 150]] },
//!     { "op": "sticker", "id": "star", "at": [300, 120] },
//!     { "op": "template", "id": "house" },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use draw_client::GenerationApi;
use draw_core::{Point, Tool};
use draw_renderer::image::image_data_url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::{AppController, UrlOpener};
use crate::error::AppResult;
use crate::toolbar::ToolbarAction;

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A toolbar click.
    Toolbar(ToolbarAction),
    /// A pointer gesture with the current tool.
    Gesture {
        /// Pointer positions as `[x, y]`.
        points: Vec<[f32; 2]>,
    },
    /// Brush stroke.
    Stroke {
        /// Pointer positions as `[x, y]`.
        points: Vec<[f32; 2]>,
    },
    /// Eraser stroke.
    Erase {
        /// Pointer positions as `[x, y]`.
        points: Vec<[f32; 2]>,
    },
    /// Place a sticker.
    Sticker {
        /// Sticker id.
        id: String,
        /// Center as `[x, y]`.
        at: [f32; 2],
    },
    /// Place a stamp in the brush color.
    Stamp {
        /// Stamp id.
        id: String,
        /// Center as `[x, y]`.
        at: [f32; 2],
    },
    /// Fill the region under a point.
    Fill {
        /// Seed as `[x, y]`.
        at: [f32; 2],
    },
    /// Import a picture file.
    Import {
        /// Image path, relative to the script.
        path: PathBuf,
    },
    /// Draw a template outline.
    Template {
        /// Template id.
        id: String,
    },
    /// Undo.
    Undo,
    /// Redo.
    Redo,
    /// Clear the canvas.
    Clear,
    /// Switch to another engine (blank canvas).
    SwitchEngine {
        /// Engine id.
        engine: String,
    },
}

/// A recorded drawing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawingScript {
    /// Engine to draw on; the current engine when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Steps in order.
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl DrawingScript {
    /// Parse a script from JSON. Relative paths resolve against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Script`] for malformed JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a script file. Relative paths resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a script error for
    /// malformed JSON.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        let mut script = Self::from_json(&json)?;
        script.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(script)
    }

    /// Play every step against `controller`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing step.
    pub async fn replay<A, O>(&self, controller: &mut AppController<A, O>) -> AppResult<()>
    where
        A: GenerationApi,
        O: UrlOpener,
    {
        if let Some(engine) = &self.engine {
            controller.switch_engine(engine)?;
        }

        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, ?step, "Replaying step");
            match step {
                ScriptStep::Toolbar(action) => controller.apply_toolbar(action)?,
                ScriptStep::Gesture { points } => controller.gesture(&to_points(points))?,
                ScriptStep::Stroke { points } => {
                    controller.apply_toolbar(&ToolbarAction::SelectTool(Tool::Brush))?;
                    controller.gesture(&to_points(points))?;
                }
                ScriptStep::Erase { points } => {
                    controller.apply_toolbar(&ToolbarAction::SelectTool(Tool::Eraser))?;
                    controller.gesture(&to_points(points))?;
                }
                ScriptStep::Sticker { id, at } => {
                    controller.apply_toolbar(&ToolbarAction::SelectSticker(id.clone()))?;
                    controller.gesture(&to_points(&[*at]))?;
                }
                ScriptStep::Stamp { id, at } => {
                    controller.apply_toolbar(&ToolbarAction::SelectStamp(id.clone()))?;
                    controller.gesture(&to_points(&[*at]))?;
                }
                ScriptStep::Fill { at } => {
                    controller.apply_toolbar(&ToolbarAction::SelectTool(Tool::Fill))?;
                    controller.gesture(&to_points(&[*at]))?;
                }
                ScriptStep::Import { path } => {
                    let bytes = tokio::fs::read(self.base_dir.join(path)).await?;
                    controller.import_image(&image_data_url(&bytes))?;
                }
                ScriptStep::Template { id } => controller.add_template(id)?,
                ScriptStep::Undo => {
                    controller.undo();
                }
                ScriptStep::Redo => {
                    controller.redo()?;
                }
                ScriptStep::Clear => controller.clear()?,
                ScriptStep::SwitchEngine { engine } => controller.switch_engine(engine)?,
            }
        }
        Ok(())
    }
}

fn to_points(points: &[[f32; 2]]) -> Vec<Point> {
    points.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_core::Color;

    #[test]
    fn test_parse_steps() {
        let script = DrawingScript::from_json(
            r##"{
                "engine": "pixel",
                "steps": [
                    { "op": "toolbar", "action": "set_color", "value": "#ff0000" },
                    { "op": "toolbar", "action": "set_size", "value": 16 },
                    { "op": "gesture", "points": [[1, 2], [3.5, 4]] },
                    { "op": "template", "id": "house" },
                    { "op": "undo" },
                    { "op": "switch_engine", "engine": "vector" }
                ]
            }"##,
        )
        .expect("script");

        assert_eq!(script.engine.as_deref(), Some("pixel"));
        assert_eq!(
            script.steps,
            vec![
                ScriptStep::Toolbar(ToolbarAction::SetColor(Color::rgb(255, 0, 0))),
                ScriptStep::Toolbar(ToolbarAction::SetSize(16)),
                ScriptStep::Gesture {
                    points: vec![[1.0, 2.0], [3.5, 4.0]]
                },
                ScriptStep::Template { id: "house".into() },
                ScriptStep::Undo,
                ScriptStep::SwitchEngine {
                    engine: "vector".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_tool_shortcuts() {
        let script = DrawingScript::from_json(
            r#"{ "steps": [
                { "op": "stroke", "points": [[0, 0], [5, 5]] },
                { "op": "stamp", "id": "heart", "at": [40, 40] },
                { "op": "fill", "at": [1, 1] }
            ] }"#,
        )
        .expect("script");
        assert_eq!(
            script.steps[1],
            ScriptStep::Stamp {
                id: "heart".into(),
                at: [40.0, 40.0]
            }
        );
        assert_eq!(script.steps[2], ScriptStep::Fill { at: [1.0, 1.0] });
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(DrawingScript::from_json(r#"{ "steps": [{ "op": "explode" }] }"#).is_err());
    }

    #[test]
    fn test_empty_script() {
        let script = DrawingScript::from_json("{}").expect("script");
        assert!(script.engine.is_none());
        assert!(script.steps.is_empty());
    }
}
