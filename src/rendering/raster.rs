//! Software rasterizer backing the post templates
//!
//! `Canvas` is a plain RGBA framebuffer with the 2D-canvas-style state the
//! template painters need: fill/stroke colors, global alpha, line width and
//! a current font. All drawing clips silently at the canvas edge; several
//! decorative shapes are deliberately centered off-canvas.

use super::font;
use super::{FontFamily, PostImage, TextSurface};
use crate::theme::parse_hex_color;

#[derive(Debug, Clone, Copy)]
struct FontState {
    bold: bool,
    size: f32,
    #[allow(dead_code)] // both families share the same metrics
    family: FontFamily,
}

/// An owned RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    fill: [u8; 3],
    stroke: [u8; 3],
    alpha: f32,
    line_width: f32,
    font: FontState,
}

impl Canvas {
    /// Creates an opaque white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = vec![255u8; (width as usize) * (height as usize) * 4];
        Canvas {
            width,
            height,
            pixels,
            fill: [0, 0, 0],
            stroke: [0, 0, 0],
            alpha: 1.0,
            line_width: 1.0,
            font: FontState {
                bold: false,
                size: 16.0,
                family: FontFamily::Sans,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Consumes the canvas, yielding the rendered frame.
    pub fn into_image(self) -> PostImage {
        PostImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels,
        }
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        match parse_hex_color(color) {
            Some(rgb) => self.stroke = rgb,
            None => log::warn!("ignoring invalid stroke color {color:?}"),
        }
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width.max(0.0);
    }

    fn blend(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let a = self.alpha;
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        for c in 0..3 {
            let src = rgb[c] as f32;
            let dst = self.pixels[i + c] as f32;
            self.pixels[i + c] = (src * a + dst * (1.0 - a)).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    /// Clipped integer pixel range covering `[v, v + extent)`.
    fn span(v: f32, extent: f32, limit: u32) -> std::ops::Range<i32> {
        let lo = v.floor().max(0.0) as i32;
        let hi = (v + extent).ceil().min(limit as f32) as i32;
        lo..hi.max(lo)
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let fill = self.fill;
        for py in Self::span(y, h, self.height) {
            for px in Self::span(x, w, self.width) {
                self.blend(px, py, fill);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let lw = self.line_width;
        let stroke = self.stroke;
        let fill = std::mem::replace(&mut self.fill, stroke);
        self.fill_rect(x, y, w, lw);
        self.fill_rect(x, y + h - lw, w, lw);
        self.fill_rect(x, y, lw, h);
        self.fill_rect(x + w - lw, y, lw, h);
        self.fill = fill;
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        let fill = self.fill;
        let r2 = r * r;
        for py in Self::span(cy - r, 2.0 * r, self.height) {
            for px in Self::span(cx - r, 2.0 * r, self.width) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, fill);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32) {
        let stroke = self.stroke;
        let half = self.line_width / 2.0;
        let outer = r + half;
        let inner = (r - half).max(0.0);
        let (outer2, inner2) = (outer * outer, inner * inner);
        for py in Self::span(cy - outer, 2.0 * outer, self.height) {
            for px in Self::span(cx - outer, 2.0 * outer, self.width) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer2 && d2 >= inner2 {
                    self.blend(px, py, stroke);
                }
            }
        }
    }

    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let fill = self.fill;
        let r = r.min(w / 2.0).min(h / 2.0);
        for py in Self::span(y, h, self.height) {
            for px in Self::span(x, w, self.width) {
                let fx = px as f32 + 0.5;
                let fy = py as f32 + 0.5;
                // Nearest corner-arc center; interior points clamp onto
                // themselves and always pass.
                let cx = fx.clamp(x + r, x + w - r);
                let cy = fy.clamp(y + r, y + h - r);
                let dx = fx - cx;
                let dy = fy - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend(px, py, fill);
                }
            }
        }
    }

    /// Thick line segment with round caps, in the stroke color.
    pub fn stroke_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let stroke = self.stroke;
        let half = self.line_width / 2.0;
        let min_x = x0.min(x1) - half;
        let min_y = y0.min(y1) - half;
        let w = (x0 - x1).abs() + self.line_width;
        let h = (y0 - y1).abs() + self.line_width;
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        for py in Self::span(min_y, h, self.height) {
            for px in Self::span(min_x, w, self.width) {
                let fx = px as f32 + 0.5;
                let fy = py as f32 + 0.5;
                let t = if len2 > 0.0 {
                    (((fx - x0) * dx + (fy - y0) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = fx - (x0 + t * dx);
                let ey = fy - (y0 + t * dy);
                if ex * ex + ey * ey <= half * half {
                    self.blend(px, py, stroke);
                }
            }
        }
    }

    pub fn stroke_polyline(&mut self, points: &[(f32, f32)]) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
        }
    }

    /// Fills the whole canvas with a diagonal gradient from the top-left
    /// (`from`) to the bottom-right (`to`), canvas-2D
    /// `createLinearGradient(0, 0, w, h)` semantics.
    pub fn fill_diagonal_gradient(&mut self, from: &str, to: &str) {
        let (Some(c0), Some(c1)) = (parse_hex_color(from), parse_hex_color(to)) else {
            log::warn!("ignoring gradient with invalid colors {from:?} -> {to:?}");
            return;
        };
        let (gw, gh) = (self.width as f32, self.height as f32);
        let len2 = gw * gw + gh * gh;
        for py in 0..self.height as i32 {
            for px in 0..self.width as i32 {
                let t = ((px as f32 + 0.5) * gw + (py as f32 + 0.5) * gh) / len2;
                let t = t.clamp(0.0, 1.0);
                let rgb = [
                    (c0[0] as f32 + (c1[0] as f32 - c0[0] as f32) * t).round() as u8,
                    (c0[1] as f32 + (c1[1] as f32 - c0[1] as f32) * t).round() as u8,
                    (c0[2] as f32 + (c1[2] as f32 - c0[2] as f32) * t).round() as u8,
                ];
                self.blend(px, py, rgb);
            }
        }
    }

    /// Draw `s` horizontally centered on `cx` (template chrome only; the
    /// layout engine always draws left-anchored).
    pub fn fill_text_centered(&mut self, s: &str, cx: f32, y: f32) {
        let w = self.measure_text(s);
        self.fill_text(s, cx - w / 2.0, y);
    }

    fn draw_glyph(&mut self, rows: [u8; 7], x: f32, baseline: f32, unit: f32) {
        let fill = self.fill;
        let top = baseline - unit * font::GLYPH_HEIGHT as f32;
        let w = unit * font::GLYPH_WIDTH as f32;
        let h = unit * font::GLYPH_HEIGHT as f32;
        for py in Self::span(top, h, self.height) {
            let row = ((py as f32 + 0.5 - top) / unit).floor();
            if row < 0.0 || row >= font::GLYPH_HEIGHT as f32 {
                continue;
            }
            let bits = rows[row as usize];
            for px in Self::span(x, w, self.width) {
                let col = ((px as f32 + 0.5 - x) / unit).floor();
                if col < 0.0 || col >= font::GLYPH_WIDTH as f32 {
                    continue;
                }
                if bits & (1 << (font::GLYPH_WIDTH - 1 - col as u32)) != 0 {
                    self.blend(px, py, fill);
                }
            }
        }
    }
}

/// CSS-ish weight strings: numeric values of 700 and up, or the bold
/// keywords, select the bold strike.
fn is_bold_weight(weight: &str) -> bool {
    match weight {
        "bold" | "bolder" => true,
        other => other.trim().parse::<u32>().map_or(false, |w| w >= 700),
    }
}

impl TextSurface for Canvas {
    fn set_font(&mut self, weight: &str, size_px: f32, family: FontFamily) {
        self.font = FontState {
            bold: is_bold_weight(weight),
            size: size_px.max(1.0),
            family,
        };
    }

    fn measure_text(&self, s: &str) -> f32 {
        font::measure(s, self.font.size)
    }

    fn set_fill_color(&mut self, color: &str) {
        match parse_hex_color(color) {
            Some(rgb) => self.fill = rgb,
            None => log::warn!("ignoring invalid fill color {color:?}"),
        }
    }

    fn fill_text(&mut self, s: &str, x: f32, y: f32) {
        let unit = self.font.size / font::EM_UNITS as f32;
        let advance = font::char_advance(self.font.size);
        let bold = self.font.bold;
        let mut pen = x;
        for c in s.chars() {
            let rows = font::glyph(c);
            self.draw_glyph(rows, pen, y, unit);
            if bold {
                self.draw_glyph(rows, pen + (unit * 0.4).max(0.5), y, unit);
            }
            pen += advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_opaque_white() {
        let c = Canvas::new(3, 2);
        let img = c.into_image();
        assert_eq!(img.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(img.pixel(2, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn fill_rect_paints_and_clips() {
        let mut c = Canvas::new(4, 4);
        c.set_fill_color("#000000");
        c.fill_rect(2.0, 2.0, 100.0, 100.0);
        let img = c.into_image();
        assert_eq!(img.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(img.pixel(3, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn global_alpha_blends() {
        let mut c = Canvas::new(1, 1);
        c.set_fill_color("#000000");
        c.set_global_alpha(0.5);
        c.fill_rect(0.0, 0.0, 1.0, 1.0);
        let img = c.into_image();
        let [r, g, b, a] = img.pixel(0, 0);
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn off_canvas_circle_is_silently_clipped() {
        let mut c = Canvas::new(8, 8);
        c.set_fill_color("#ff0000");
        c.fill_circle(100.0, 100.0, 5.0);
        let img = c.into_image();
        assert_eq!(img.pixel(7, 7), [255, 255, 255, 255]);
    }

    #[test]
    fn invalid_colors_are_ignored() {
        let mut c = Canvas::new(2, 2);
        c.set_fill_color("#000000");
        c.set_fill_color("not-a-color");
        c.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(c.into_image().pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn bold_weight_parsing() {
        assert!(is_bold_weight("bold"));
        assert!(is_bold_weight("800"));
        assert!(is_bold_weight("700"));
        assert!(!is_bold_weight("400"));
        assert!(!is_bold_weight("normal"));
    }

    #[test]
    fn fill_text_marks_pixels_under_the_baseline_box() {
        let mut c = Canvas::new(32, 32);
        c.set_font("400", 16.0, FontFamily::Sans);
        c.set_fill_color("#000000");
        c.fill_text("H", 4.0, 24.0);
        let img = c.into_image();
        let dark = (0..32)
            .flat_map(|y| (0..32).map(move |x| (x, y)))
            .filter(|&(x, y)| img.pixel(x, y)[0] < 128)
            .count();
        assert!(dark > 0, "no glyph pixels drawn");
    }

    #[test]
    fn measure_tracks_font_size() {
        let mut c = Canvas::new(1, 1);
        c.set_font("400", 40.0, FontFamily::Sans);
        assert_eq!(c.measure_text("abcd"), 4.0 * 30.0);
        c.set_font("800", 20.0, FontFamily::Mono);
        assert_eq!(c.measure_text("abcd"), 4.0 * 15.0);
    }

    #[test]
    fn gradient_endpoints() {
        let mut c = Canvas::new(16, 16);
        c.fill_diagonal_gradient("#000000", "#ffffff");
        let img = c.into_image();
        let start = img.pixel(0, 0)[0];
        let end = img.pixel(15, 15)[0];
        assert!(start < 32, "gradient start should be near black, got {start}");
        assert!(end > 224, "gradient end should be near white, got {end}");
    }
}
