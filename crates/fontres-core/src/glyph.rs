// this_file: crates/fontres-core/src/glyph.rs

//! Glyph-level data exchanged with the rendering backend

/// Backend glyph id, or [`crate::INVALID_CODE`]
pub type GlyphCode = u32;

/// Bounding box and advance of a glyph or glyph string, in pixels
///
/// `ascent` grows upward from the baseline and `descent` downward, both
/// positive for ordinary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub lbearing: i32,
    pub rbearing: i32,
    pub width: i32,
    pub ascent: i32,
    pub descent: i32,
}

impl FontMetrics {
    /// Appends `next` after an advance of `self.width`, unioning the boxes
    pub fn extend(&mut self, next: &FontMetrics) {
        let offset = self.width;
        self.lbearing = self.lbearing.min(offset + next.lbearing);
        self.rbearing = self.rbearing.max(offset + next.rbearing);
        self.ascent = self.ascent.max(next.ascent);
        self.descent = self.descent.max(next.descent);
        self.width += next.width;
    }

    pub fn is_empty(&self) -> bool {
        *self == FontMetrics::default()
    }
}

/// A rasterized glyph
///
/// Rows run top to bottom. With 8 bits per pixel each byte is coverage;
/// with 1 bit per pixel rows are packed most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontBitmap {
    pub bits_per_pixel: u8,
    pub rows: u32,
    pub width: u32,
    pub pitch: usize,
    /// Offset from the pen position to the left edge
    pub left: i32,
    /// Offset from the baseline up to the top row
    pub top: i32,
    pub advance: i32,
    pub buffer: Vec<u8>,
}

impl FontBitmap {
    /// Coverage at (x, y) scaled to 0..=255
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.rows {
            return 0;
        }
        let row = y as usize * self.pitch;
        match self.bits_per_pixel {
            1 => {
                let byte = self.buffer.get(row + x as usize / 8).copied().unwrap_or(0);
                if byte & (0x80 >> (x % 8)) != 0 {
                    255
                } else {
                    0
                }
            }
            _ => self.buffer.get(row + x as usize).copied().unwrap_or(0),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|&b| b == 0)
    }
}

/// One segment of a glyph outline, pixel units, y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphOutline {
    pub commands: Vec<PathCommand>,
    pub advance: f32,
}

impl GlyphOutline {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A glyph placed by OpenType layout, pixel units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapedGlyph {
    pub glyph: GlyphCode,
    /// Byte offset of the source cluster in the input text
    pub cluster: u32,
    pub x_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_unions_bearings_after_advance() {
        let mut total = FontMetrics {
            lbearing: 1,
            rbearing: 6,
            width: 7,
            ascent: 9,
            descent: 2,
        };
        total.extend(&FontMetrics {
            lbearing: -1,
            rbearing: 5,
            width: 6,
            ascent: 10,
            descent: 1,
        });
        assert_eq!(
            total,
            FontMetrics {
                lbearing: 1,
                rbearing: 12,
                width: 13,
                ascent: 10,
                descent: 2,
            }
        );
    }

    #[test]
    fn one_bit_coverage_reads_msb_first() {
        let bitmap = FontBitmap {
            bits_per_pixel: 1,
            rows: 1,
            width: 9,
            pitch: 2,
            buffer: vec![0b1000_0001, 0b1000_0000],
            ..Default::default()
        };
        assert_eq!(bitmap.coverage(0, 0), 255);
        assert_eq!(bitmap.coverage(1, 0), 0);
        assert_eq!(bitmap.coverage(7, 0), 255);
        assert_eq!(bitmap.coverage(8, 0), 255);
        assert_eq!(bitmap.coverage(9, 0), 0);
    }
}
