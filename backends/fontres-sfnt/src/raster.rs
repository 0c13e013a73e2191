// this_file: backends/fontres-sfnt/src/raster.rs

//! Glyph outlines and bitmaps
//!
//! Outlines come from skrifa, unhinted, in pixel units with y up. Bitmaps
//! are rasterized with zeno and flipped to rows running top to bottom.

use fontres_core::{DriverError, FontBitmap, GlyphCode, GlyphOutline, PathCommand};
use kurbo::Shape;
use read_fonts::tables::glyf::Glyph;
use read_fonts::TableProvider;
use skrifa::instance::LocationRef;
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId, MetadataProvider};
use thiserror::Error;
use zeno::Mask;

use crate::metrics::SfntFont;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("glyph {0} has no outline")]
    NoOutline(GlyphCode),
    #[error("outline of glyph {glyph} could not be drawn: {reason}")]
    Draw { glyph: GlyphCode, reason: String },
    #[error("face data became unreadable")]
    Face,
}

impl From<RasterError> for DriverError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::NoOutline(glyph) => DriverError::GlyphNotFound(glyph),
            other => DriverError::InvalidFont(other.to_string()),
        }
    }
}

/// Collects one outline as zeno path data, a kurbo path for bounds, and
/// plain commands for callers
struct OutlineCollector {
    svg: Vec<String>,
    path: kurbo::BezPath,
    commands: Vec<PathCommand>,
}

impl OutlineCollector {
    fn new() -> Self {
        Self {
            svg: Vec::new(),
            path: kurbo::BezPath::new(),
            commands: Vec::new(),
        }
    }
}

impl OutlinePen for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.svg.push(format!("M {x:.2},{y:.2}"));
        self.path.move_to((x as f64, y as f64));
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.svg.push(format!("L {x:.2},{y:.2}"));
        self.path.line_to((x as f64, y as f64));
        self.commands.push(PathCommand::LineTo(x, y));
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.svg.push(format!("Q {cx:.2},{cy:.2} {x:.2},{y:.2}"));
        self.path
            .quad_to((cx as f64, cy as f64), (x as f64, y as f64));
        self.commands.push(PathCommand::QuadTo(cx, cy, x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.svg.push(format!(
            "C {cx0:.2},{cy0:.2} {cx1:.2},{cy1:.2} {x:.2},{y:.2}"
        ));
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
        self.commands.push(PathCommand::CurveTo(cx0, cy0, cx1, cy1, x, y));
    }

    fn close(&mut self) {
        self.svg.push("Z".to_string());
        self.path.close_path();
        self.commands.push(PathCommand::Close);
    }
}

fn collect(font: &SfntFont, glyph: GlyphCode) -> Result<(OutlineCollector, f32), RasterError> {
    let face = font.face().font().ok_or(RasterError::Face)?;
    let gid = GlyphId::new(glyph);
    let outline = face
        .outline_glyphs()
        .get(gid)
        .ok_or(RasterError::NoOutline(glyph))?;
    let mut pen = OutlineCollector::new();
    outline
        .draw(
            DrawSettings::unhinted(font.size(), LocationRef::default()),
            &mut pen,
        )
        .map_err(|err| RasterError::Draw {
            glyph,
            reason: err.to_string(),
        })?;
    let advance = face
        .glyph_metrics(font.size(), LocationRef::default())
        .advance_width(gid)
        .unwrap_or_default();
    Ok((pen, advance))
}

pub fn outline(font: &SfntFont, glyph: GlyphCode) -> Result<GlyphOutline, RasterError> {
    let (pen, advance) = collect(font, glyph)?;
    Ok(GlyphOutline {
        commands: pen.commands,
        advance,
    })
}

/// Rasterizes `glyph` at 8 bits per pixel, or packed to 1 bit
pub fn bitmap(font: &SfntFont, glyph: GlyphCode, bits_per_pixel: u8) -> Result<FontBitmap, DriverError> {
    if bits_per_pixel != 1 && bits_per_pixel != 8 {
        return Err(DriverError::UnsupportedDepth(bits_per_pixel));
    }
    let (pen, advance) = collect(font, glyph)?;
    let advance = advance.round() as i32;

    let bbox = pen.path.bounding_box();
    if pen.commands.is_empty() || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        // Blank glyphs such as the space still advance
        return Ok(FontBitmap {
            bits_per_pixel,
            advance,
            ..FontBitmap::default()
        });
    }

    let left = bbox.x0.floor() as i32;
    let bottom = bbox.y0.floor() as i32;
    let top = bbox.y1.ceil() as i32;
    let width = (bbox.x1.ceil() as i32 - left).max(1) as u32;
    let rows = (top - bottom).max(1) as u32;

    let path_data = pen.svg.join(" ");
    let mut mask = vec![0u8; (width * rows) as usize];
    Mask::new(path_data.as_str())
        .size(width, rows)
        .offset((-left, -bottom))
        .render_into(&mut mask, None);

    // Font coordinates are y-up, bitmaps are y-down
    let pitch = width as usize;
    for y in 0..(rows as usize / 2) {
        let (upper, lower) = mask.split_at_mut((rows as usize - 1 - y) * pitch);
        upper[y * pitch..(y + 1) * pitch].swap_with_slice(&mut lower[..pitch]);
    }

    let (pitch, buffer) = if bits_per_pixel == 1 {
        pack_mono(&mask, width as usize, rows as usize)
    } else {
        (pitch, mask)
    };

    Ok(FontBitmap {
        bits_per_pixel,
        rows,
        width,
        pitch,
        left,
        top,
        advance,
        buffer,
    })
}

/// Thresholds 8-bit coverage at half, packing rows most significant bit first
fn pack_mono(mask: &[u8], width: usize, rows: usize) -> (usize, Vec<u8>) {
    let pitch = width.div_ceil(8);
    let mut packed = vec![0u8; pitch * rows];
    for y in 0..rows {
        for x in 0..width {
            if mask[y * width + x] >= 0x80 {
                packed[y * pitch + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    (pitch, packed)
}

/// Pixel position of point `index` of a simple TrueType glyph
pub fn anchor_point(font: &SfntFont, glyph: GlyphCode, index: u32) -> Option<(i32, i32)> {
    let face = font.face().font()?;
    let loca = face.loca(None).ok()?;
    let glyf = face.glyf().ok()?;
    let Glyph::Simple(simple) = loca.get_glyf(GlyphId::new(glyph), &glyf).ok()?? else {
        return None;
    };
    let point = simple.points().nth(index as usize)?;
    let scale = font.scale();
    Some((
        (f32::from(point.x) * scale).round() as i32,
        (f32::from(point.y) * scale).round() as i32,
    ))
}
