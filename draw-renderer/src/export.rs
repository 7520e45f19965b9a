//! Scene export to SVG and PNG.
//!
//! Renders a [`VectorScene`] through an SVG intermediate representation and
//! the resvg/tiny-skia rasterization pipeline.

use std::fmt::Write;

use draw_core::{Color, Point, Stroke};
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};
use crate::image::png_data_url;
use crate::raster;
use crate::scene::{VectorElement, VectorScene};

/// Configuration for scene export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Scale factor applied to the scene size (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Exports a [`VectorScene`] to SVG markup, pixmaps, PNG bytes and data URLs.
#[derive(Debug, Clone, Default)]
pub struct SceneExporter {
    config: ExportConfig,
}

impl SceneExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export the scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContextUnavailable`] for an empty surface.
    pub fn render_to_svg(&self, scene: &VectorScene) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions(scene)?;

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            scene.width, scene.height,
        );

        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" {}/>",
            paint_attrs("fill", scene.background),
        );

        for element in &scene.elements {
            render_element_svg(&mut svg, element, scene.background);
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Rasterize the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is empty or the SVG cannot be parsed.
    pub fn render_to_pixmap(&self, scene: &VectorScene) -> RenderResult<Pixmap> {
        let svg_string = self.render_to_svg(scene)?;
        Self::rasterize_svg(&svg_string)
    }

    /// Export the scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, scene: &VectorScene) -> RenderResult<Vec<u8>> {
        raster::encode_png(&self.render_to_pixmap(scene)?)
    }

    /// Export the scene to a `data:image/png;base64,` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_data_url(&self, scene: &VectorScene) -> RenderResult<String> {
        Ok(png_data_url(&self.render_to_png(scene)?))
    }

    /// Get output dimensions (width, height) in pixels.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn output_dimensions(&self, scene: &VectorScene) -> RenderResult<(u32, u32)> {
        if scene.width == 0 || scene.height == 0 {
            return Err(RenderError::ContextUnavailable(format!(
                "scene has no area ({}x{})",
                scene.width, scene.height
            )));
        }
        let scale = self.config.scale.max(f32::EPSILON);
        let out_w = (scene.width as f32 * scale).round() as u32;
        let out_h = (scene.height as f32 * scale).round() as u32;
        Ok((out_w.max(1), out_h.max(1)))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Svg(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().ceil() as u32;
        let px_h = tree.size().height().ceil() as u32;

        let mut pixmap = Pixmap::new(px_w, px_h).ok_or_else(|| {
            RenderError::ContextUnavailable(format!("cannot allocate {px_w}x{px_h} pixmap"))
        })?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &VectorElement, background: Color) {
    match element {
        VectorElement::Stroke(stroke) => render_stroke_svg(svg, stroke, stroke.color),
        VectorElement::Erase(stroke) => render_stroke_svg(svg, stroke, background),
        VectorElement::Shape {
            contours,
            fill,
            outline,
        } => {
            let d = contours
                .iter()
                .filter_map(|c| polyline_data(c, true))
                .collect::<Vec<_>>()
                .join(" ");
            if d.is_empty() {
                return;
            }
            let fill_attr = fill.map_or_else(|| "fill=\"none\"".to_string(), |c| paint_attrs("fill", c));
            let stroke_attr = outline.map_or_else(String::new, |(color, width)| {
                format!(
                    " {} stroke-width=\"{width}\" stroke-linejoin=\"round\"",
                    paint_attrs("stroke", color)
                )
            });
            let _ = write!(svg, "<path d=\"{d}\" {fill_attr}{stroke_attr}/>");
        }
        VectorElement::Image { data_url, rect } => {
            let escaped_src = escape_xml(data_url);
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{escaped_src}\"/>",
                rect.x, rect.y, rect.width, rect.height,
            );
        }
    }
}

fn render_stroke_svg(svg: &mut String, stroke: &Stroke, color: Color) {
    let width = stroke.width.max(1.0);
    match stroke.points.as_slice() {
        [] => {}
        [dot] => {
            let _ = write!(
                svg,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
                dot.x,
                dot.y,
                width / 2.0,
                paint_attrs("fill", color),
            );
        }
        points => {
            if let Some(d) = polyline_data(points, false) {
                let _ = write!(
                    svg,
                    "<path d=\"{d}\" fill=\"none\" {} stroke-width=\"{width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
                    paint_attrs("stroke", color),
                );
            }
        }
    }
}

fn polyline_data(points: &[Point], closed: bool) -> Option<String> {
    let (first, rest) = points.split_first()?;
    let mut d = format!("M{} {}", first.x, first.y);
    for p in rest {
        let _ = write!(d, " L{} {}", p.x, p.y);
    }
    if closed {
        d.push_str(" Z");
    }
    Some(d)
}

/// `name="#rrggbb"` plus `name-opacity` when the color is translucent.
fn paint_attrs(name: &str, color: Color) -> String {
    let mut attrs = format!(
        "{name}=\"#{:02x}{:02x}{:02x}\"",
        color.r, color.g, color.b
    );
    if color.a < 255 {
        let _ = write!(attrs, " {name}-opacity=\"{}\"", f32::from(color.a) / 255.0);
    }
    attrs
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
