//! Image loading utilities.
//!
//! Decodes pictures imported onto a canvas from raw bytes or `data:` URLs and
//! converts them into premultiplied tiny-skia pixmaps.

use base64::Engine;
use tiny_skia::{IntSize, Pixmap};

use crate::error::{RenderError, RenderResult};

/// Decoded RGBA image data.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight (non-premultiplied) RGBA pixel data, 4 bytes per pixel.
    pub data: Vec<u8>,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type for data URLs.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Destination rectangle for a placed image, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl ImageRect {
    /// Center an image of `image_w` x `image_h` on a surface, scaled down to
    /// fit within `fraction` of each surface dimension. Small images are not
    /// enlarged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centered_fit(image_w: u32, image_h: u32, surface_w: u32, surface_h: u32, fraction: f32) -> Self {
        let max_w = surface_w as f32 * fraction;
        let max_h = surface_h as f32 * fraction;
        let (iw, ih) = (image_w.max(1) as f32, image_h.max(1) as f32);
        let scale = (max_w / iw).min(max_h / ih).min(1.0);
        let width = iw * scale;
        let height = ih * scale;
        Self {
            x: (surface_w as f32 - width) / 2.0,
            y: (surface_h as f32 - height) / 2.0,
            width,
            height,
        }
    }
}

/// Load an image from raw bytes.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<TextureData> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData {
        width,
        height,
        data: rgba.into_raw(),
    })
}

/// Split a data URL into its MIME type and decoded payload.
///
/// Supports `data:image/png;base64,iVBORw0KGgo...` and percent-encoded payloads.
///
/// # Errors
///
/// Returns an error if the URL is not a well formed data URL.
pub fn decode_data_url(uri: &str) -> RenderResult<(String, Vec<u8>)> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let comma_pos = uri_data
        .find(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let metadata = &uri_data[..comma_pos];
    let encoded_data = &uri_data[comma_pos + 1..];
    let mime = metadata.split(';').next().unwrap_or_default().to_string();

    let bytes = if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        urlencoding_decode(encoded_data)?
    };

    Ok((mime, bytes))
}

/// Load an image from a data URI.
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<TextureData> {
    let (_, bytes) = decode_data_url(uri)?;
    load_image_from_bytes(&bytes)
}

/// Encode PNG bytes as a `data:image/png;base64,` URL.
#[must_use]
pub fn png_data_url(png: &[u8]) -> String {
    encode_data_url(ImageFormat::Png.mime_type(), png)
}

/// Encode image file bytes as a data URL, sniffing the format from the header.
#[must_use]
pub fn image_data_url(data: &[u8]) -> String {
    encode_data_url(ImageFormat::from_magic_bytes(data).mime_type(), data)
}

fn encode_data_url(mime: &str, data: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

/// Convert straight RGBA texture data into a premultiplied pixmap.
///
/// # Errors
///
/// Returns [`RenderError::ContextUnavailable`] for empty images and
/// [`RenderError::Resource`] if the pixel buffer does not match the size.
pub fn texture_to_pixmap(texture: &TextureData) -> RenderResult<Pixmap> {
    let size = IntSize::from_wh(texture.width, texture.height).ok_or_else(|| {
        RenderError::ContextUnavailable(format!(
            "image has invalid size {}x{}",
            texture.width, texture.height
        ))
    })?;

    let mut premultiplied = Vec::with_capacity(texture.data.len());
    for px in texture.data.chunks_exact(4) {
        let alpha = u16::from(px[3]);
        for channel in &px[..3] {
            #[allow(clippy::cast_possible_truncation)]
            premultiplied.push(((u16::from(*channel) * alpha + 127) / 255) as u8);
        }
        premultiplied.push(px[3]);
    }

    Pixmap::from_vec(premultiplied, size)
        .ok_or_else(|| RenderError::Resource("Pixel buffer does not match image size".to_string()))
}

/// Simple URL decoding (percent-encoding).
fn urlencoding_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(hex);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 red pixel PNG.
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_format_detection_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            ImageFormat::WebP
        );
        assert_eq!(ImageFormat::from_magic_bytes(&[1, 2]), ImageFormat::Unknown);
    }

    #[test]
    fn test_image_data_url_sniffs_format() {
        let png = base64::engine::general_purpose::STANDARD
            .decode(RED_PIXEL_PNG)
            .expect("base64");
        let url = image_data_url(&png);
        assert!(url.starts_with("data:image/png;base64,"));
        let (mime, bytes) = decode_data_url(&url).expect("data url");
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, png);
    }

    #[test]
    fn test_data_uri_parsing() {
        let data_uri = format!("data:image/png;base64,{RED_PIXEL_PNG}");
        let texture = load_image_from_data_uri(&data_uri).expect("valid data URI");
        assert_eq!(texture.width, 1);
        assert_eq!(texture.height, 1);
        assert_eq!(texture.data.len(), 4);
    }

    #[test]
    fn test_decode_data_url_reports_mime() {
        let (mime, bytes) = decode_data_url("data:text/plain,a%20b").expect("plain data url");
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"a b");
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image_from_data_uri("not a data uri").is_err());
        assert!(load_image_from_data_uri("data:image/png").is_err());
        assert!(decode_data_url("data:text/plain,%zz").is_err());
    }

    #[test]
    fn test_texture_to_pixmap_premultiplies() {
        let texture = TextureData {
            width: 1,
            height: 1,
            data: vec![255, 0, 0, 128],
        };
        let pixmap = texture_to_pixmap(&texture).expect("pixmap");
        assert_eq!(pixmap.data(), &[128, 0, 0, 128]);
    }

    #[test]
    fn test_centered_fit() {
        let rect = ImageRect::centered_fit(1000, 500, 800, 600, 0.8);
        assert!((rect.width - 640.0).abs() < 1e-3);
        assert!((rect.height - 320.0).abs() < 1e-3);
        assert!((rect.x - 80.0).abs() < 1e-3);
        assert!((rect.y - 140.0).abs() < 1e-3);

        let small = ImageRect::centered_fit(10, 10, 800, 600, 0.8);
        assert!((small.width - 10.0).abs() < 1e-3);
    }
}
