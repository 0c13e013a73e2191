// this_file: crates/fontres-core/src/driver.rs

//! The contract every font backend signs
//!
//! A driver turns specs into entities, entities into open fonts, and open
//! fonts into glyph codes, metrics and pixels. Six operations are required;
//! the rest have defaults that report "unsupported" so a rasterizing
//! driver and a device-drawing driver can each implement only their half.
//!
//! Failure crosses this boundary as values: an empty list, `None`, or
//! [`INVALID_CODE`]. `Result` is reserved for the operations whose caller
//! needs to know why (opening, initializing, the device operations).

use std::sync::Arc;

use crate::entity::{DisplayId, FontEntity, Frame};
use crate::error::{BackendInitFailure, DriverError, ResourceError};
use crate::generic::GenericFamily;
use crate::glyph::{FontBitmap, FontMetrics, GlyphCode, GlyphOutline, ShapedGlyph};
use crate::object::FontObject;
use crate::otf::OtfCapability;
use crate::props::OtfSpec;
use crate::spec::FontSpec;
use crate::INVALID_CODE;

/// Where a device-drawing driver puts its pixels
pub trait DrawTarget {
    /// Clears a rectangle to the background; `y` is the top edge
    fn fill_background(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Composites a glyph whose top-left pixel lands on (`x`, `y`)
    fn blend_glyph(&mut self, x: i32, y: i32, bitmap: &FontBitmap);
}

/// A font backend
///
/// ```ignore
/// struct MyDriver;
///
/// impl FontDriver for MyDriver {
///     fn driver_type(&self) -> &str {
///         "mine"
///     }
///
///     fn list(&self, display: DisplayId, spec: &FontSpec) -> Vec<Arc<FontEntity>> {
///         // Every font matching `spec` exactly, no substitution
///         Vec::new()
///     }
///     // ...
/// }
/// ```
pub trait FontDriver: Send + Sync {
    /// Tag stamped on every entity this driver produces
    fn driver_type(&self) -> &str;

    /// One-time backend setup; called once before first use
    fn init(&self) -> Result<(), BackendInitFailure> {
        Ok(())
    }

    /// Name of the entity-cache partition this driver uses
    ///
    /// Drivers that share a backend may return the same name.
    fn get_cache(&self) -> &str {
        self.driver_type()
    }

    /// Every entity matching `spec` exactly; empty is not an error
    fn list(&self, display: DisplayId, spec: &FontSpec) -> Vec<Arc<FontEntity>>;

    /// The single closest entity by the driver's own metric
    fn match_font(&self, display: DisplayId, spec: &FontSpec) -> Option<Arc<FontEntity>>;

    /// Installed family names; order unspecified, duplicates allowed
    fn list_family(&self, _display: DisplayId) -> Vec<String> {
        Vec::new()
    }

    /// Concrete families this backend associates with `generic`
    fn generic_family_members(&self, generic: GenericFamily) -> Vec<String> {
        generic
            .default_members()
            .iter()
            .map(|member| member.to_string())
            .collect()
    }

    /// All entities of one concrete family, for building generic lists
    ///
    /// Unlike [`FontDriver::list`] this may fail, so that a half-built
    /// generic list is never cached.
    fn list_family_members(
        &self,
        display: DisplayId,
        family: &str,
    ) -> Result<Vec<Arc<FontEntity>>, DriverError> {
        Ok(self.list(display, &FontSpec::family(family)))
    }

    /// Releases driver-private state of an entity dropped from the cache
    fn free_entity(&self, _entity: &FontEntity) {}

    /// Realizes `entity` at `pixel_size` (already non-zero)
    fn open(
        &self,
        frame: &Frame,
        entity: &Arc<FontEntity>,
        pixel_size: u32,
    ) -> Result<FontObject, ResourceError>;

    /// Releases the backend resources of `font`
    fn close(&self, frame: &Frame, font: &FontObject);

    /// `Some(answer)` when the entity alone tells, `None` when the font must be opened
    fn has_char(&self, entity: &FontEntity, c: char) -> Option<bool> {
        entity.repertory().map(|r| r.contains(c as u32))
    }

    /// Glyph for `c`, or [`INVALID_CODE`] when the font lacks it
    fn encode_char(&self, font: &FontObject, c: char) -> GlyphCode;

    /// Total advance of `glyphs` and the union of their boxes
    ///
    /// The returned metrics' `width` is the total advance. An empty slice
    /// yields all zeros. Glyphs without metrics advance by the space width.
    fn text_extents(&self, font: &FontObject, glyphs: &[GlyphCode]) -> FontMetrics;

    /// Draws `glyphs` with the pen starting at (`x`, `y`) on the baseline
    ///
    /// Returns the advance drawn.
    fn draw(
        &self,
        _font: &FontObject,
        _glyphs: &[GlyphCode],
        _x: i32,
        _y: i32,
        _with_background: bool,
        _target: &mut dyn DrawTarget,
    ) -> Result<i32, DriverError> {
        Err(DriverError::unsupported(self.driver_type(), "draw"))
    }

    /// Rasterizes one glyph at 1 or 8 bits per pixel
    fn get_bitmap(
        &self,
        _font: &FontObject,
        _glyph: GlyphCode,
        _bits_per_pixel: u8,
    ) -> Result<FontBitmap, DriverError> {
        Err(DriverError::unsupported(self.driver_type(), "get_bitmap"))
    }

    fn free_bitmap(&self, _font: &FontObject, bitmap: FontBitmap) {
        drop(bitmap);
    }

    fn get_outline(&self, _font: &FontObject, _glyph: GlyphCode) -> Option<GlyphOutline> {
        None
    }

    fn free_outline(&self, _font: &FontObject, outline: GlyphOutline) {
        drop(outline);
    }

    /// Pixel position of outline point `index` of `glyph`
    fn anchor_point(&self, _font: &FontObject, _glyph: GlyphCode, _index: u32) -> Option<(i32, i32)> {
        None
    }

    fn otf_capability(&self, _font: &FontObject) -> Option<OtfCapability> {
        None
    }

    /// Applies the GSUB/GPOS features of `spec` to `text`
    fn otf_drive(
        &self,
        _font: &FontObject,
        _text: &str,
        _spec: &OtfSpec,
    ) -> Result<Vec<ShapedGlyph>, DriverError> {
        Err(DriverError::unsupported(self.driver_type(), "otf_drive"))
    }
}

/// Encodes each char of `text`, keeping [`INVALID_CODE`] for misses
pub fn encode_str(driver: &dyn FontDriver, font: &FontObject, text: &str) -> Vec<GlyphCode> {
    text.chars().map(|c| driver.encode_char(font, c)).collect()
}

/// Whether `code` names a real glyph
pub fn is_valid_code(code: GlyphCode) -> bool {
    code != INVALID_CODE
}
