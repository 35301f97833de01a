//! Raster canvas for the PNG artifacts.
//!
//! Shapes are drawn with `imageproc`; text uses the 8x8 bitmap glyphs from
//! `font8x8`, scaled by an integer factor, so rendering never depends on
//! fonts installed on the host.

use std::io::Cursor;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use cryptoreport_core::ReportError;

pub const GLYPH_SIZE: u32 = 8;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([34, 34, 34]);
pub const GRID: Rgb<u8> = Rgb([210, 210, 210]);
pub const HEADER_BG: Rgb<u8> = Rgb([40, 62, 98]);
pub const STRIPE_BG: Rgb<u8> = Rgb([238, 242, 248]);
pub const BAR: Rgb<u8> = Rgb([66, 133, 244]);

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
        if w > 0 && h > 0 {
            draw_filled_rect_mut(&mut self.image, Rect::at(x, y).of_size(w, h), color);
        }
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
        if w > 0 && h > 0 {
            draw_hollow_rect_mut(&mut self.image, Rect::at(x, y).of_size(w, h), color);
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        draw_line_segment_mut(&mut self.image, from, to, color);
    }

    /// Horizontal text with its top-left corner at (x, y).
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        for (i, ch) in text.chars().enumerate() {
            let gx = x + (i as u32 * GLYPH_SIZE * scale) as i32;
            self.glyph(ch, scale, color, |col, row| (gx + col, y + row));
        }
    }

    /// Text rotated a quarter turn counter-clockwise, reading bottom to top,
    /// with its baseline end at (x, y).
    pub fn text_vertical(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        for (i, ch) in text.chars().enumerate() {
            let gy = y - (i as u32 * GLYPH_SIZE * scale) as i32;
            self.glyph(ch, scale, color, |col, row| (x + row, gy - col));
        }
    }

    fn glyph<F>(&mut self, ch: char, scale: u32, color: Rgb<u8>, place: F)
    where
        F: Fn(i32, i32) -> (i32, i32),
    {
        let bitmap = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        let scale = scale.max(1) as i32;
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_SIZE as i32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (px, py) = place(col * scale + dx, row as i32 * scale + dy);
                        self.put(px, py, color);
                    }
                }
            }
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn encode_png(&self, artifact: &'static str) -> Result<Vec<u8>, ReportError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ReportError::render(artifact, e))?;
        Ok(bytes)
    }
}

/// Pixel width of `text` at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Cut `text` to `max_chars`, marking the cut with "..".
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}
