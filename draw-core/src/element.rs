//! Drawing primitives - the building blocks every canvas engine understands.

use serde::{Deserialize, Serialize};

use crate::{DrawError, DrawResult, ShapeKind};

/// A point in surface coordinates (pixels from the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate around `center` by `angle` radians.
    #[must_use]
    pub fn rotate_around(self, center: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// An RGBA color, serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white, the blank surface color.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::InvalidColor`] if the string is not a hex color.
    pub fn from_hex(input: &str) -> DrawResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = || DrawError::InvalidColor(input.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = channel(&c.to_string())?;
                    *slot = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = DrawError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A freehand polyline drawn with a round brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Sampled pointer positions, in drawing order.
    pub points: Vec<Point>,
    /// Ink color.
    pub color: Color,
    /// Brush diameter in pixels.
    pub width: f32,
}

impl Stroke {
    /// Create a stroke from points.
    #[must_use]
    pub fn new(points: Vec<Point>, color: Color, width: f32) -> Self {
        Self {
            points,
            color,
            width,
        }
    }

    /// Map every point through `f`, keeping color and width.
    #[must_use]
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            points: self.points.iter().copied().map(f).collect(),
            color: self.color,
            width: self.width,
        }
    }
}

/// A catalog shape placed on the surface (sticker or stamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Catalog identifier of the sticker or stamp.
    pub id: String,
    /// Outline drawn for this placement.
    pub shape: ShapeKind,
    /// Center of the placed shape.
    pub center: Point,
    /// Edge length of the bounding square in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// A primitive drawing operation applied to a canvas engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Paint a brush stroke.
    Stroke(Stroke),
    /// Erase along a stroke (painted in the background color).
    Erase(Stroke),
    /// Place a sticker in its catalog color.
    Sticker(Placement),
    /// Place a solid stamp in the brush color.
    Stamp(Placement),
    /// Fill the region under a point.
    Fill {
        /// Seed point.
        at: Point,
        /// Fill color.
        color: Color,
    },
}

impl DrawCommand {
    /// Map every coordinate of the command through `f`.
    #[must_use]
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Self::Stroke(stroke) => Self::Stroke(stroke.map_points(f)),
            Self::Erase(stroke) => Self::Erase(stroke.map_points(f)),
            Self::Sticker(p) => Self::Sticker(Placement {
                center: f(p.center),
                ..p.clone()
            }),
            Self::Stamp(p) => Self::Stamp(Placement {
                center: f(p.center),
                ..p.clone()
            }),
            Self::Fill { at, color } => Self::Fill {
                at: f(*at),
                color: *color,
            },
        }
    }
}
