// this_file: backends/fontres-canvas/src/pixmap.rs

//! In-memory grayscale draw target

use fontres_core::{DrawTarget, FontBitmap};

/// An 8-bit grayscale canvas, rows top to bottom
///
/// Glyph coverage blends the foreground over whatever is below it, so
/// overlapping glyphs accumulate the way they would on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    background: u8,
    foreground: u8,
    data: Vec<u8>,
}

impl Pixmap {
    /// Black text on a white canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_colors(width, height, 0, 255)
    }

    pub fn with_colors(width: u32, height: u32, foreground: u8, background: u8) -> Self {
        Self {
            width,
            height,
            background,
            foreground,
            data: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value at (x, y), `None` outside the canvas
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Whether anything differs from the background
    pub fn has_ink(&self) -> bool {
        self.data.iter().any(|&v| v != self.background)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Binary PGM (P5) encoding
    pub fn to_pgm(&self) -> Vec<u8> {
        let header = format!("P5\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.data.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.data);
        out
    }
}

fn blend(dst: u8, src: u8, coverage: u8) -> u8 {
    let c = u32::from(coverage);
    ((u32::from(src) * c + u32::from(dst) * (255 - c) + 127) / 255) as u8
}

impl DrawTarget for Pixmap {
    fn fill_background(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i32).min(self.width as i32);
        let y1 = y.saturating_add(height as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(i) = self.index(px, py) {
                    self.data[i] = self.background;
                }
            }
        }
    }

    fn blend_glyph(&mut self, x: i32, y: i32, bitmap: &FontBitmap) {
        for gy in 0..bitmap.rows {
            for gx in 0..bitmap.width {
                let coverage = bitmap.coverage(gx, gy);
                if coverage == 0 {
                    continue;
                }
                // Clipped
                let Some(i) = self.index(x + gx as i32, y + gy as i32) else {
                    continue;
                };
                self.data[i] = blend(self.data[i], self.foreground, coverage);
            }
        }
    }
}
