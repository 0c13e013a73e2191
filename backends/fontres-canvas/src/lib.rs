// this_file: backends/fontres-canvas/src/lib.rs

//! Device-drawing font driver
//!
//! Presents the faces of an [`SfntDriver`] under its own type and adds the
//! half the sfnt driver leaves out: drawing glyph runs onto a
//! [`DrawTarget`]. Entities are the sfnt driver's, re-tagged; open fonts
//! wrap an sfnt font plus a cache of rasterized glyphs.

pub mod pixmap;

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use fontres_core::{
    BackendInitFailure, Config, DisplayId, DrawTarget, DriverError, EntityId, EntityPayload,
    FontBitmap, FontDriver, FontEntity, FontMetrics, FontObject, FontSpec, Frame, GlyphCode,
    GlyphOutline, OtfCapability, OtfSpec, ResourceError, ShapedGlyph, INVALID_CODE,
};
use fontres_sfnt::SfntDriver;
use lru::LruCache;
use parking_lot::Mutex;

pub use pixmap::Pixmap;

/// Type tag of entities this driver creates
pub const DRIVER_TYPE: &str = "canvas";

const BITMAP_CACHE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(255);

/// An open canvas font: the underlying sfnt font and its drawn glyphs
pub struct CanvasFont {
    inner: FontObject,
    bitmaps: Mutex<LruCache<GlyphCode, Arc<FontBitmap>>>,
}

impl CanvasFont {
    pub fn inner(&self) -> &FontObject {
        &self.inner
    }

    pub fn cached_glyphs(&self) -> usize {
        self.bitmaps.lock().len()
    }
}

pub struct CanvasDriver {
    sfnt: Arc<SfntDriver>,
    entities: Mutex<HashMap<EntityId, Arc<FontEntity>>>,
}

impl CanvasDriver {
    /// Shares discovery and face data with `sfnt`
    pub fn new(sfnt: Arc<SfntDriver>) -> Self {
        Self {
            sfnt,
            entities: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(SfntDriver::new(config)))
    }

    pub fn sfnt(&self) -> &Arc<SfntDriver> {
        &self.sfnt
    }

    fn wrap(&self, inner: Arc<FontEntity>) -> Arc<FontEntity> {
        self.entities
            .lock()
            .entry(inner.id())
            .or_insert_with(|| {
                Arc::new(inner.retag(DRIVER_TYPE, EntityPayload::new(inner.clone())))
            })
            .clone()
    }

    fn inner_entity(entity: &FontEntity) -> Option<&Arc<FontEntity>> {
        if entity.driver_type() != DRIVER_TYPE {
            return None;
        }
        entity.payload().get::<Arc<FontEntity>>()
    }

    fn instance(font: &FontObject) -> Option<&CanvasFont> {
        font.driver_data::<CanvasFont>()
    }

    fn instance_or_closed(font: &FontObject) -> Result<&CanvasFont, DriverError> {
        Self::instance(font).ok_or(DriverError::Closed)
    }

    fn glyph_bitmap(&self, font: &CanvasFont, glyph: GlyphCode) -> Result<Arc<FontBitmap>, DriverError> {
        if let Some(bitmap) = font.bitmaps.lock().get(&glyph) {
            return Ok(bitmap.clone());
        }
        let bitmap = Arc::new(self.sfnt.get_bitmap(&font.inner, glyph, 8)?);
        font.bitmaps.lock().put(glyph, bitmap.clone());
        Ok(bitmap)
    }
}

impl FontDriver for CanvasDriver {
    fn driver_type(&self) -> &str {
        DRIVER_TYPE
    }

    fn init(&self) -> Result<(), BackendInitFailure> {
        self.sfnt
            .init()
            .map_err(|err| BackendInitFailure::new(DRIVER_TYPE, err.reason))
    }

    fn list(&self, display: DisplayId, spec: &FontSpec) -> Vec<Arc<FontEntity>> {
        // The sfnt driver only answers to its own type
        let inner_spec = FontSpec {
            driver_type: None,
            ..spec.clone()
        };
        self.sfnt
            .list(display, &inner_spec)
            .into_iter()
            .map(|inner| self.wrap(inner))
            .collect()
    }

    fn match_font(&self, display: DisplayId, spec: &FontSpec) -> Option<Arc<FontEntity>> {
        let inner_spec = FontSpec {
            driver_type: None,
            ..spec.clone()
        };
        self.sfnt
            .match_font(display, &inner_spec)
            .map(|inner| self.wrap(inner))
    }

    fn list_family(&self, display: DisplayId) -> Vec<String> {
        self.sfnt.list_family(display)
    }

    fn free_entity(&self, entity: &FontEntity) {
        if let Some(inner) = Self::inner_entity(entity) {
            self.entities.lock().remove(&inner.id());
            self.sfnt.free_entity(inner);
        }
    }

    fn open(
        &self,
        frame: &Frame,
        entity: &Arc<FontEntity>,
        pixel_size: u32,
    ) -> Result<FontObject, ResourceError> {
        let inner_entity = Self::inner_entity(entity).ok_or_else(|| ResourceError::ForeignEntity {
            entity: entity.to_string(),
            driver: DRIVER_TYPE.to_string(),
        })?;
        let inner = self.sfnt.open(frame, inner_entity, pixel_size)?;

        let mut metrics = *inner.metrics();
        let printable: Vec<GlyphCode> = (' '..='~')
            .map(|c| self.sfnt.encode_char(&inner, c))
            .filter(|&g| g != INVALID_CODE)
            .collect();
        if !printable.is_empty() {
            let extents = self.sfnt.text_extents(&inner, &printable);
            metrics.average_width = extents.width / printable.len() as i32;
        }
        metrics.min_width = metrics.space_width;

        let font = CanvasFont {
            inner,
            bitmaps: Mutex::new(LruCache::new(BITMAP_CACHE_SIZE)),
        };
        Ok(FontObject::new(entity.clone(), pixel_size, frame.id, metrics, font))
    }

    fn close(&self, frame: &Frame, font: &FontObject) {
        match Self::instance(font) {
            Some(canvas) => self.sfnt.close(frame, &canvas.inner),
            None => log::warn!("close of a font this driver did not open"),
        }
    }

    fn encode_char(&self, font: &FontObject, c: char) -> GlyphCode {
        Self::instance(font).map_or(INVALID_CODE, |f| self.sfnt.encode_char(&f.inner, c))
    }

    fn text_extents(&self, font: &FontObject, glyphs: &[GlyphCode]) -> FontMetrics {
        Self::instance(font)
            .map(|f| self.sfnt.text_extents(&f.inner, glyphs))
            .unwrap_or_default()
    }

    fn draw(
        &self,
        font: &FontObject,
        glyphs: &[GlyphCode],
        x: i32,
        y: i32,
        with_background: bool,
        target: &mut dyn DrawTarget,
    ) -> Result<i32, DriverError> {
        let canvas = Self::instance_or_closed(font)?;
        let metrics = font.metrics();

        if with_background {
            let advance = self.sfnt.text_extents(&canvas.inner, glyphs).width;
            target.fill_background(
                x,
                y - metrics.ascent,
                advance.max(0) as u32,
                (metrics.ascent + metrics.descent).max(0) as u32,
            );
        }

        let mut pen = x;
        for &glyph in glyphs {
            let bitmap = match self.glyph_bitmap(canvas, glyph) {
                Ok(bitmap) => bitmap,
                Err(DriverError::GlyphNotFound(_)) => {
                    pen += metrics.space_width;
                    continue;
                }
                Err(err) => return Err(err),
            };
            if !bitmap.is_blank() {
                target.blend_glyph(pen + bitmap.left, y - bitmap.top, &bitmap);
            }
            pen += bitmap.advance;
        }
        Ok(pen - x)
    }

    fn get_bitmap(
        &self,
        font: &FontObject,
        glyph: GlyphCode,
        bits_per_pixel: u8,
    ) -> Result<FontBitmap, DriverError> {
        let canvas = Self::instance_or_closed(font)?;
        self.sfnt.get_bitmap(&canvas.inner, glyph, bits_per_pixel)
    }

    fn get_outline(&self, font: &FontObject, glyph: GlyphCode) -> Option<GlyphOutline> {
        self.sfnt.get_outline(&Self::instance(font)?.inner, glyph)
    }

    fn anchor_point(&self, font: &FontObject, glyph: GlyphCode, index: u32) -> Option<(i32, i32)> {
        self.sfnt
            .anchor_point(&Self::instance(font)?.inner, glyph, index)
    }

    fn otf_capability(&self, font: &FontObject) -> Option<OtfCapability> {
        self.sfnt.otf_capability(&Self::instance(font)?.inner)
    }

    fn otf_drive(
        &self,
        font: &FontObject,
        text: &str,
        spec: &OtfSpec,
    ) -> Result<Vec<ShapedGlyph>, DriverError> {
        let canvas = Self::instance_or_closed(font)?;
        self.sfnt.otf_drive(&canvas.inner, text, spec)
    }
}
