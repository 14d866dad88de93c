//! Rendering module: surface capability trait, software canvas, frame output

pub mod font;
pub mod raster;

pub use raster::Canvas;

use crate::error::Result;
use base64::Engine as Base64Engine;

/// Font family selectable on a render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    /// Theme sans-serif family (body text, headings, chrome)
    Sans,
    /// Monospace family (code spans, code box)
    Mono,
}

/// Text-drawing capability consumed by the layout engine.
///
/// The engine only ever selects fonts, measures strings under the current
/// selection, picks fill colors, and draws left-baseline-anchored runs.
/// `Canvas` is the production implementation; tests substitute a recording
/// mock with deterministic metrics.
pub trait TextSurface {
    /// Select the current font. `weight` follows CSS conventions ("400",
    /// "800", "bold"); values at or above 700 render bold.
    fn set_font(&mut self, weight: &str, size_px: f32, family: FontFamily);

    /// Pixel width of `s` under the currently-selected font.
    fn measure_text(&self, s: &str) -> f32;

    /// Select the fill color as a `#rrggbb` hex string.
    fn set_fill_color(&mut self, color: &str);

    /// Draw `s` with its left baseline anchored at `(x, y)`.
    fn fill_text(&mut self, s: &str, x: f32, y: f32);
}

/// A rendered RGBA frame.
#[derive(Debug, Clone)]
pub struct PostImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl PostImage {
    /// RGBA value at `(x, y)`; panics when out of bounds (test helper).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Encodes the frame as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| crate::Error::Encode("framebuffer size mismatch".to_string()))?;
        let mut out = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut out),
            image::ImageFormat::Png,
        )?;
        Ok(out)
    }

    /// Encodes the frame as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.to_png()?;
        let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
        Ok(format!("data:image/png;base64,{b64}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_output_carries_signature() {
        let canvas = Canvas::new(16, 16);
        let png = canvas.into_image().to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn data_url_has_png_prefix() {
        let canvas = Canvas::new(4, 4);
        let url = canvas.into_image().to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
