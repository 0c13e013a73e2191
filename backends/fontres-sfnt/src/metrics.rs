// this_file: backends/fontres-sfnt/src/metrics.rs

//! Open-font instances and their metrics
//!
//! An [`SfntFont`] is one face at one pixel size. It carries the values
//! computed at open time and a small cache of per-glyph boxes.

use std::num::NonZeroUsize;
use std::sync::Arc;

use fontres_core::{FontMetrics, GlyphCode, ObjectMetrics, Spacing};
use lru::LruCache;
use parking_lot::Mutex;
use skrifa::instance::{LocationRef, Size};
use skrifa::{GlyphId, MetadataProvider};

use crate::face::SharedFace;
use crate::scan::FaceKey;

const GLYPH_CACHE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(511);

/// A face realized at one pixel size; stored as the object's driver data
pub struct SfntFont {
    face: Arc<SharedFace>,
    key: FaceKey,
    pixel_size: u32,
    metrics: ObjectMetrics,
    glyphs: Mutex<LruCache<GlyphCode, Option<FontMetrics>>>,
}

impl SfntFont {
    pub fn new(face: Arc<SharedFace>, key: FaceKey, pixel_size: u32, spacing: Spacing) -> Self {
        let metrics = object_metrics(&face, pixel_size, spacing);
        Self {
            face,
            key,
            pixel_size,
            metrics,
            glyphs: Mutex::new(LruCache::new(GLYPH_CACHE_SIZE)),
        }
    }

    pub fn face(&self) -> &Arc<SharedFace> {
        &self.face
    }

    pub fn key(&self) -> &FaceKey {
        &self.key
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixel_size as f32)
    }

    pub fn metrics(&self) -> &ObjectMetrics {
        &self.metrics
    }

    /// Font units to pixels
    pub fn scale(&self) -> f32 {
        self.pixel_size as f32 / f32::from(self.face.units_per_em().max(1))
    }

    pub fn encode(&self, c: char) -> Option<GlyphCode> {
        let font = self.face.font()?;
        font.charmap().map(c).map(|gid| gid.to_u32())
    }

    /// Pixel box and advance of one glyph, `None` if the font lacks it
    pub fn glyph_metrics(&self, glyph: GlyphCode) -> Option<FontMetrics> {
        if let Some(cached) = self.glyphs.lock().get(&glyph) {
            return *cached;
        }
        let computed = self.compute_glyph_metrics(glyph);
        self.glyphs.lock().put(glyph, computed);
        computed
    }

    fn compute_glyph_metrics(&self, glyph: GlyphCode) -> Option<FontMetrics> {
        let font = self.face.font()?;
        let gid = GlyphId::new(glyph);
        if glyph >= font.metrics(Size::unscaled(), LocationRef::default()).glyph_count as u32 {
            return None;
        }
        let glyph_metrics = font.glyph_metrics(self.size(), LocationRef::default());
        let advance = glyph_metrics.advance_width(gid)?;
        let mut m = FontMetrics {
            width: advance.round() as i32,
            ..FontMetrics::default()
        };
        if let Some(bounds) = glyph_metrics.bounds(gid) {
            m.lbearing = bounds.x_min.floor() as i32;
            m.rbearing = bounds.x_max.ceil() as i32;
            m.ascent = bounds.y_max.ceil() as i32;
            m.descent = (-bounds.y_min).ceil() as i32;
        }
        Some(m)
    }

    /// Total advance and union box of `glyphs`
    ///
    /// Glyphs the font cannot measure advance the pen by the space width
    /// without contributing to the box.
    pub fn text_extents(&self, glyphs: &[GlyphCode]) -> FontMetrics {
        let mut total = FontMetrics::default();
        let mut first = true;
        for &glyph in glyphs {
            match self.glyph_metrics(glyph) {
                Some(m) if first => {
                    // Seed the box at the pen, past any unmeasured glyphs
                    let pen = total.width;
                    total = FontMetrics {
                        lbearing: pen + m.lbearing,
                        rbearing: pen + m.rbearing,
                        width: pen + m.width,
                        ascent: m.ascent,
                        descent: m.descent,
                    };
                    first = false;
                }
                Some(m) => total.extend(&m),
                None => total.width += self.metrics.space_width,
            }
        }
        total
    }
}

fn object_metrics(face: &SharedFace, pixel_size: u32, spacing: Spacing) -> ObjectMetrics {
    let Some(font) = face.font() else {
        return ObjectMetrics::default();
    };
    let size = Size::new(pixel_size as f32);
    let m = font.metrics(size, LocationRef::default());
    let glyph_metrics = font.glyph_metrics(size, LocationRef::default());
    let charmap = font.charmap();

    let ascent = m.ascent.ceil() as i32;
    let descent = (-m.descent).ceil() as i32;
    let max_advance = m.max_width.map(|w| w.round() as i32);

    let ascii_advances: Vec<i32> = (0x20u32..=0x7E)
        .filter_map(|cp| charmap.map(cp))
        .filter_map(|gid| glyph_metrics.advance_width(gid))
        .map(|w| w.round() as i32)
        .collect();
    let space_width = charmap
        .map(' ')
        .and_then(|gid| glyph_metrics.advance_width(gid))
        .map(|w| w.round() as i32);

    let fallback = max_advance.unwrap_or((pixel_size / 2) as i32);
    let (space_width, average_width, min_width) = if spacing.is_fixed() {
        let w = max_advance
            .or(space_width)
            .unwrap_or(fallback);
        (w, w, w)
    } else {
        let average = if ascii_advances.is_empty() {
            fallback
        } else {
            ascii_advances.iter().sum::<i32>() / ascii_advances.len() as i32
        };
        let min = ascii_advances
            .iter()
            .copied()
            .filter(|&w| w > 0)
            .min()
            .unwrap_or(average);
        (space_width.unwrap_or(average), average, min)
    };

    ObjectMetrics {
        ascent,
        descent,
        height: ascent + descent + m.leading.max(0.0).round() as i32,
        space_width,
        average_width,
        min_width,
        baseline_offset: 0,
        relative_compose: 0,
        default_ascent: 0,
        underline_position: m.underline.map(|u| (-u.offset).round() as i32),
        underline_thickness: m.underline.map(|u| u.thickness.round().max(1.0) as i32),
        scalable: true,
    }
}
