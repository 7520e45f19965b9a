//! Immediate-mode raster helpers on top of tiny-skia.
//!
//! Shared by the engines that paint straight into a pixmap, and by the
//! exporter for the final PNG/data URL encoding.

use draw_core::{Color, Point, Stroke};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    PremultipliedColorU8, Transform,
};

use crate::error::{RenderError, RenderResult};
use crate::image::{png_data_url, ImageRect};

/// Allocate a surface filled with `background`.
///
/// # Errors
///
/// Returns [`RenderError::ContextUnavailable`] for zero or oversized dimensions.
pub fn new_surface(width: u32, height: u32, background: Color) -> RenderResult<Pixmap> {
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        RenderError::ContextUnavailable(format!("cannot allocate {width}x{height} surface"))
    })?;
    pixmap.fill(to_skia(background));
    Ok(pixmap)
}

/// Convert a drawing color to a tiny-skia color.
#[must_use]
pub fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Build the path for a stroke.
///
/// With `smooth`, interior points become quadratic control points through the
/// midpoints of neighbouring samples, which rounds off jittery input.
#[must_use]
pub fn stroke_path(points: &[Point], smooth: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);

    if rest.is_empty() {
        // A tap: a zero-length segment, drawn as a dot by the round cap.
        pb.line_to(first.x + 0.01, first.y);
        return pb.finish();
    }

    if smooth && rest.len() > 1 {
        for pair in rest.windows(2) {
            let (ctrl, next) = (pair[0], pair[1]);
            let mid = Point::new((ctrl.x + next.x) / 2.0, (ctrl.y + next.y) / 2.0);
            pb.quad_to(ctrl.x, ctrl.y, mid.x, mid.y);
        }
        if let Some(last) = rest.last() {
            pb.line_to(last.x, last.y);
        }
    } else {
        for p in rest {
            pb.line_to(p.x, p.y);
        }
    }
    pb.finish()
}

/// Paint a stroke, optionally overriding its color (used by the eraser).
pub fn paint_stroke(pixmap: &mut Pixmap, stroke: &Stroke, color: Option<Color>, smooth: bool) {
    let Some(path) = stroke_path(&stroke.points, smooth) else {
        return;
    };
    let style = tiny_skia::Stroke {
        width: stroke.width.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &paint(color.unwrap_or(stroke.color)),
        &style,
        Transform::identity(),
        None,
    );
}

fn contour_path(contour: &[Point]) -> Option<Path> {
    let (first, rest) = contour.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Fill closed contours with the non-zero winding rule.
pub fn fill_contours(pixmap: &mut Pixmap, contours: &[Vec<Point>], color: Color) {
    let fill = paint(color);
    for contour in contours {
        if let Some(path) = contour_path(contour) {
            pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        }
    }
}

/// Draw `image` scaled into `rect`.
#[allow(clippy::cast_precision_loss)]
pub fn draw_image(pixmap: &mut Pixmap, image: &Pixmap, rect: ImageRect) {
    let sx = rect.width / image.width().max(1) as f32;
    let sy = rect.height / image.height().max(1) as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(
        0,
        0,
        image.as_ref(),
        &paint,
        Transform::from_row(sx, 0.0, 0.0, sy, rect.x, rect.y),
        None,
    );
}

/// Per-channel tolerance used by [`flood_fill`].
pub const FILL_TOLERANCE: u8 = 32;

/// Flood fill the 4-connected region around `at` whose color is within
/// `tolerance` of the seed pixel.
///
/// Returns `false` when nothing changed (seed outside the surface, or the
/// region already has the fill color).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn flood_fill(pixmap: &mut Pixmap, at: Point, color: Color, tolerance: u8) -> bool {
    let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
    if at.x < 0.0 || at.y < 0.0 {
        return false;
    }
    let (sx, sy) = (at.x as usize, at.y as usize);
    if sx >= width || sy >= height {
        return false;
    }

    let replacement = to_skia(color).premultiply().to_color_u8();
    let pixels = pixmap.pixels_mut();
    let target = pixels[sy * width + sx];
    if target == replacement {
        return false;
    }

    let matches = |px: PremultipliedColorU8| {
        px.red().abs_diff(target.red()) <= tolerance
            && px.green().abs_diff(target.green()) <= tolerance
            && px.blue().abs_diff(target.blue()) <= tolerance
            && px.alpha().abs_diff(target.alpha()) <= tolerance
    };

    let mut visited = vec![false; width * height];
    let mut stack = vec![(sx, sy)];

    while let Some((x, y)) = stack.pop() {
        let idx = y * width + x;
        if visited[idx] || !matches(pixels[idx]) {
            continue;
        }
        visited[idx] = true;
        pixels[idx] = replacement;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    true
}

/// Encode a surface as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if PNG encoding fails.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
}

/// Encode a surface as a `data:image/png;base64,` URL.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if PNG encoding fails.
pub fn to_data_url(pixmap: &Pixmap) -> RenderResult<String> {
    Ok(png_data_url(&encode_png(pixmap)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> tiny_skia::ColorU8 {
        pixmap
            .pixel(x, y)
            .map(|p| p.demultiply())
            .expect("pixel in bounds")
    }

    #[test]
    fn test_new_surface_is_background() {
        let pixmap = new_surface(4, 3, Color::WHITE).expect("surface");
        assert_eq!(pixmap.width(), 4);
        assert!(pixmap.data().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_zero_surface_unavailable() {
        assert!(matches!(
            new_surface(0, 10, Color::WHITE),
            Err(RenderError::ContextUnavailable(_))
        ));
    }

    #[test]
    fn test_stroke_paints_pixels() {
        let mut pixmap = new_surface(20, 20, Color::WHITE).expect("surface");
        let stroke = Stroke::new(
            vec![Point::new(2.0, 10.0), Point::new(18.0, 10.0)],
            Color::rgb(255, 0, 0),
            4.0,
        );
        paint_stroke(&mut pixmap, &stroke, None, false);
        let px = pixel(&pixmap, 10, 10);
        assert_eq!((px.red(), px.green(), px.blue()), (255, 0, 0));
    }

    #[test]
    fn test_single_point_stroke_draws_dot() {
        let mut pixmap = new_surface(20, 20, Color::WHITE).expect("surface");
        let stroke = Stroke::new(vec![Point::new(10.0, 10.0)], Color::BLACK, 6.0);
        paint_stroke(&mut pixmap, &stroke, None, true);
        let px = pixel(&pixmap, 10, 10);
        assert!(px.red() < 128);
    }

    #[test]
    fn test_flood_fill_stops_at_border() {
        let mut pixmap = new_surface(30, 30, Color::WHITE).expect("surface");
        // Vertical wall down the middle.
        let wall = Stroke::new(
            vec![Point::new(15.0, -5.0), Point::new(15.0, 35.0)],
            Color::BLACK,
            4.0,
        );
        paint_stroke(&mut pixmap, &wall, None, false);

        assert!(flood_fill(
            &mut pixmap,
            Point::new(3.0, 3.0),
            Color::rgb(0, 0, 255),
            FILL_TOLERANCE
        ));
        let left = pixel(&pixmap, 3, 20);
        let right = pixel(&pixmap, 27, 20);
        assert_eq!((left.red(), left.green(), left.blue()), (0, 0, 255));
        assert_eq!((right.red(), right.green(), right.blue()), (255, 255, 255));
    }

    #[test]
    fn test_flood_fill_noops() {
        let mut pixmap = new_surface(5, 5, Color::WHITE).expect("surface");
        assert!(!flood_fill(&mut pixmap, Point::new(-1.0, 0.0), Color::BLACK, 0));
        assert!(!flood_fill(&mut pixmap, Point::new(9.0, 0.0), Color::BLACK, 0));
        assert!(!flood_fill(&mut pixmap, Point::new(1.0, 1.0), Color::WHITE, 0));
    }

    #[test]
    fn test_data_url_prefix() {
        let pixmap = new_surface(2, 2, Color::WHITE).expect("surface");
        let url = to_data_url(&pixmap).expect("data url");
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
