//! Built-in shape catalog shared by stickers, stamps and templates.
//!
//! Shapes are described as closed contours in a unit box centered on the
//! origin (`-0.5..=0.5` on both axes, y pointing down). Engines scale them
//! to a placement with [`ShapeKind::contours_at`] and fill them with the
//! non-zero winding rule, or stroke them for templates.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::{Color, DrawError, DrawResult, Point};

/// Number of segments used to approximate curved outlines.
const CURVE_SEGMENTS: usize = 48;

/// A shape in the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circle.
    Circle,
    /// Five pointed star.
    Star,
    /// Heart.
    Heart,
    /// Square.
    Square,
    /// Triangle.
    Triangle,
    /// Five petal flower.
    Flower,
    /// Sun with rays.
    Sun,
    /// Crescent moon.
    Moon,
    /// Puffy cloud.
    Cloud,
    /// House with a roof.
    House,
    /// Fish.
    Fish,
    /// Pine tree.
    Tree,
}

impl ShapeKind {
    /// Every shape, in catalog order.
    pub const ALL: [Self; 12] = [
        Self::Circle,
        Self::Star,
        Self::Heart,
        Self::Square,
        Self::Triangle,
        Self::Flower,
        Self::Sun,
        Self::Moon,
        Self::Cloud,
        Self::House,
        Self::Fish,
        Self::Tree,
    ];

    /// Stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Flower => "flower",
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Cloud => "cloud",
            Self::House => "house",
            Self::Fish => "fish",
            Self::Tree => "tree",
        }
    }

    /// Look a shape up by identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.id() == id)
    }

    /// Closed contours in the unit box.
    #[must_use]
    pub fn contours(self) -> Vec<Vec<Point>> {
        match self {
            Self::Circle => vec![ellipse(0.0, 0.0, 0.5, 0.5)],
            Self::Star => vec![star(5, 0.5, 0.2)],
            Self::Heart => vec![heart()],
            Self::Square => vec![polygon(&[(-0.45, -0.45), (0.45, -0.45), (0.45, 0.45), (-0.45, 0.45)])],
            Self::Triangle => vec![polygon(&[(0.0, -0.45), (0.5, 0.4), (-0.5, 0.4)])],
            Self::Flower => vec![flower(), ellipse(0.0, 0.0, 0.12, 0.12)],
            Self::Sun => vec![star(12, 0.5, 0.34), ellipse(0.0, 0.0, 0.26, 0.26)],
            Self::Moon => vec![crescent()],
            Self::Cloud => vec![
                ellipse(-0.24, 0.06, 0.2, 0.2),
                ellipse(0.0, -0.08, 0.26, 0.26),
                ellipse(0.24, 0.06, 0.2, 0.2),
                polygon(&[(-0.24, 0.06), (0.24, 0.06), (0.24, 0.26), (-0.24, 0.26)]),
            ],
            Self::House => vec![polygon(&[
                (-0.4, 0.45),
                (0.4, 0.45),
                (0.4, -0.05),
                (0.5, -0.05),
                (0.0, -0.5),
                (-0.5, -0.05),
                (-0.4, -0.05),
            ])],
            Self::Fish => vec![
                ellipse(-0.1, 0.0, 0.35, 0.22),
                polygon(&[(0.18, 0.0), (0.5, -0.25), (0.5, 0.25)]),
            ],
            Self::Tree => vec![
                polygon(&[(0.0, -0.5), (0.4, 0.2), (-0.4, 0.2)]),
                polygon(&[(-0.08, 0.2), (0.08, 0.2), (0.08, 0.5), (-0.08, 0.5)]),
            ],
        }
    }

    /// Contours scaled into a `size` x `size` square centered on `center`.
    #[must_use]
    pub fn contours_at(self, center: Point, size: f32) -> Vec<Vec<Point>> {
        self.contours()
            .into_iter()
            .map(|contour| {
                contour
                    .into_iter()
                    .map(|p| Point::new(center.x + p.x * size, center.y + p.y * size))
                    .collect()
            })
            .collect()
    }
}

fn polygon(points: &[(f32, f32)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[allow(clippy::cast_precision_loss)]
fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Vec<Point> {
    (0..CURVE_SEGMENTS)
        .map(|i| {
            let t = TAU * i as f32 / CURVE_SEGMENTS as f32;
            Point::new(cx + rx * t.cos(), cy + ry * t.sin())
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn star(points: usize, outer: f32, inner: f32) -> Vec<Point> {
    let vertices = points * 2;
    (0..vertices)
        .map(|i| {
            let angle = -FRAC_PI_2 + PI * i as f32 / points as f32;
            let radius = if i % 2 == 0 { outer } else { inner };
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn heart() -> Vec<Point> {
    (0..CURVE_SEGMENTS)
        .map(|i| {
            let t = TAU * i as f32 / CURVE_SEGMENTS as f32;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Point::new(x / 34.0, -y / 34.0 - 0.176)
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn flower() -> Vec<Point> {
    let segments = CURVE_SEGMENTS * 2;
    (0..segments)
        .map(|i| {
            let t = TAU * i as f32 / segments as f32;
            let r = 0.32 + 0.18 * (5.0 * t).cos();
            Point::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn crescent() -> Vec<Point> {
    let half = CURVE_SEGMENTS / 2;
    let outer = (0..=half).map(|i| {
        let t = FRAC_PI_2 + PI * i as f32 / half as f32;
        Point::new(0.45 * t.cos(), 0.45 * t.sin())
    });
    let inner = (0..=half).map(|i| {
        let t = 3.0 * FRAC_PI_2 - PI * i as f32 / half as f32;
        Point::new(0.18 * t.cos(), 0.45 * t.sin())
    });
    outer.chain(inner).collect()
}

/// A sticker: a catalog shape with its own fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickerDef {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Outline.
    pub shape: ShapeKind,
    /// Fill color.
    pub color: Color,
}

/// A stamp: a catalog shape filled with the current brush color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampDef {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Outline.
    pub shape: ShapeKind,
}

/// A template: an outline for kids to color in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateDef {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Outline.
    pub shape: ShapeKind,
}

/// Sticker catalog.
pub const STICKERS: &[StickerDef] = &[
    StickerDef { id: "star", name: "Gold Star", shape: ShapeKind::Star, color: Color::rgb(255, 200, 0) },
    StickerDef { id: "heart", name: "Red Heart", shape: ShapeKind::Heart, color: Color::rgb(235, 50, 80) },
    StickerDef { id: "sun", name: "Sunshine", shape: ShapeKind::Sun, color: Color::rgb(255, 150, 0) },
    StickerDef { id: "flower", name: "Pink Flower", shape: ShapeKind::Flower, color: Color::rgb(255, 120, 200) },
    StickerDef { id: "cloud", name: "Cloud", shape: ShapeKind::Cloud, color: Color::rgb(150, 200, 255) },
    StickerDef { id: "moon", name: "Moon", shape: ShapeKind::Moon, color: Color::rgb(250, 230, 90) },
    StickerDef { id: "fish", name: "Fish", shape: ShapeKind::Fish, color: Color::rgb(40, 180, 170) },
    StickerDef { id: "tree", name: "Tree", shape: ShapeKind::Tree, color: Color::rgb(40, 160, 60) },
];

/// Stamp catalog.
pub const STAMPS: &[StampDef] = &[
    StampDef { id: "circle", name: "Circle", shape: ShapeKind::Circle },
    StampDef { id: "star", name: "Star", shape: ShapeKind::Star },
    StampDef { id: "heart", name: "Heart", shape: ShapeKind::Heart },
    StampDef { id: "square", name: "Square", shape: ShapeKind::Square },
    StampDef { id: "triangle", name: "Triangle", shape: ShapeKind::Triangle },
    StampDef { id: "flower", name: "Flower", shape: ShapeKind::Flower },
];

/// Template catalog.
pub const TEMPLATES: &[TemplateDef] = &[
    TemplateDef { id: "circle", name: "Circle", shape: ShapeKind::Circle },
    TemplateDef { id: "star", name: "Star", shape: ShapeKind::Star },
    TemplateDef { id: "heart", name: "Heart", shape: ShapeKind::Heart },
    TemplateDef { id: "house", name: "House", shape: ShapeKind::House },
    TemplateDef { id: "fish", name: "Fish", shape: ShapeKind::Fish },
    TemplateDef { id: "flower", name: "Flower", shape: ShapeKind::Flower },
    TemplateDef { id: "tree", name: "Tree", shape: ShapeKind::Tree },
    TemplateDef { id: "sun", name: "Sun", shape: ShapeKind::Sun },
    TemplateDef { id: "cloud", name: "Cloud", shape: ShapeKind::Cloud },
];

/// Look up a sticker.
///
/// # Errors
///
/// Returns [`DrawError::UnknownSticker`] for ids outside the catalog.
pub fn sticker(id: &str) -> DrawResult<&'static StickerDef> {
    STICKERS
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| DrawError::UnknownSticker(id.to_string()))
}

/// Look up a stamp.
///
/// # Errors
///
/// Returns [`DrawError::UnknownStamp`] for ids outside the catalog.
pub fn stamp(id: &str) -> DrawResult<&'static StampDef> {
    STAMPS
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| DrawError::UnknownStamp(id.to_string()))
}

/// Look up a template.
///
/// # Errors
///
/// Returns [`DrawError::UnknownTemplate`] for ids outside the catalog.
pub fn template(id: &str) -> DrawResult<&'static TemplateDef> {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| DrawError::UnknownTemplate(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_lookup() {
        for shape in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_id(shape.id()), Some(shape));
        }
        assert_eq!(ShapeKind::from_id("dragon"), None);
    }

    #[test]
    fn test_contours_stay_in_unit_box() {
        for shape in ShapeKind::ALL {
            for contour in shape.contours() {
                assert!(contour.len() >= 3, "{shape:?} contour too short");
                for p in contour {
                    assert!(p.x.abs() <= 0.5 + 1e-3, "{shape:?} x out of box: {}", p.x);
                    assert!(p.y.abs() <= 0.5 + 1e-3, "{shape:?} y out of box: {}", p.y);
                }
            }
        }
    }

    #[test]
    fn test_contours_at_scales_and_translates() {
        let contours = ShapeKind::Square.contours_at(Point::new(100.0, 50.0), 20.0);
        let first = contours[0][0];
        assert!((first.x - 91.0).abs() < 1e-4);
        assert!((first.y - 41.0).abs() < 1e-4);
    }

    #[test]
    fn test_catalog_lookups() {
        assert_eq!(sticker("star").unwrap().shape, ShapeKind::Star);
        assert_eq!(stamp("heart").unwrap().shape, ShapeKind::Heart);
        assert_eq!(template("house").unwrap().shape, ShapeKind::House);
        assert!(matches!(sticker("nope"), Err(DrawError::UnknownSticker(_))));
        assert!(matches!(stamp("nope"), Err(DrawError::UnknownStamp(_))));
        assert!(matches!(template("nope"), Err(DrawError::UnknownTemplate(_))));
    }
}
