// this_file: crates/fontres-core/src/lib.rs

//! Shared vocabulary of the fontres font subsystem
//!
//! Everything the resolution engine and the drivers exchange lives here:
//!
//! - [`FontSpec`] - a partial request, the only thing callers write
//! - [`FontEntity`] - a concrete candidate, only drivers create these
//! - [`FontObject`] - an open font at one pixel size
//! - [`FontDriver`] - the operations a backend provides
//!
//! plus the matching predicate, query patterns, coverage tables, the
//! input-blocking guard and configuration.

pub mod block;
pub mod config;
pub mod coverage;
pub mod driver;
pub mod entity;
pub mod error;
pub mod generic;
pub mod glyph;
pub mod matching;
pub mod object;
pub mod otf;
pub mod pattern;
pub mod props;
pub mod spec;

pub use block::{BlockInput, InputBlocker};
pub use config::Config;
pub use coverage::Repertory;
pub use driver::{DrawTarget, FontDriver};
pub use entity::{DisplayId, EntityId, EntityPayload, FontEntity, Frame, FrameId};
pub use error::{
    BackendInitFailure, BuildError, ConfigError, DriverError, FontError, ParseError,
    ResourceError, Result,
};
pub use generic::GenericFamily;
pub use glyph::{FontBitmap, FontMetrics, GlyphCode, GlyphOutline, PathCommand, ShapedGlyph};
pub use matching::font_match_p;
pub use object::{FontObject, ObjectMetrics};
pub use otf::{OtfCapability, OtfLangSys, OtfScript};
pub use pattern::{parse_font_name, FontName, Pattern};
pub use props::{
    Extra, FontSize, OtfFeature, OtfSpec, OtfTag, Registry, Slant, Spacing, Weight, Width,
};
pub use spec::FontSpec;

/// Returned by `encode_char` for characters the font cannot display
///
/// Distinct from glyph 0, which can be a real (if usually `.notdef`) glyph.
pub const INVALID_CODE: GlyphCode = 0xFFFF_FFFF;

/// Pixel sizes computed from point sizes are multiples of this
pub const PIXEL_SIZE_QUANTUM: u32 = 1;
