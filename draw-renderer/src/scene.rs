//! Retained scene model for the vector engine.

use draw_core::{Color, Point, Stroke};

use crate::image::ImageRect;

/// One retained element of a [`VectorScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum VectorElement {
    /// A brush stroke in its own color.
    Stroke(Stroke),
    /// An eraser stroke. Painted in the scene background at render time.
    Erase(Stroke),
    /// A closed shape made of one or more contours.
    Shape {
        /// Polygon contours in surface coordinates.
        contours: Vec<Vec<Point>>,
        /// Interior color, if filled.
        fill: Option<Color>,
        /// Outline color and width, if stroked.
        outline: Option<(Color, f32)>,
    },
    /// An imported picture.
    Image {
        /// PNG `data:` URL of the picture.
        data_url: String,
        /// Where the picture is placed.
        rect: ImageRect,
    },
}

/// Ordered list of elements over a solid background.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorScene {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background color.
    pub background: Color,
    /// Elements in paint order.
    pub elements: Vec<VectorElement>,
}

impl VectorScene {
    /// Create an empty white scene.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::WHITE,
            elements: Vec::new(),
        }
    }

    /// Add an element on top of the existing ones.
    pub fn push(&mut self, element: VectorElement) {
        self.elements.push(element);
    }

    /// Remove all elements and restore the white background.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.background = Color::WHITE;
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
