// this_file: crates/fontres/src/lib.rs

//! Font resolution engine
//!
//! Turns partial [`FontSpec`]s into concrete entities by consulting the
//! registered [`FontDriver`]s in priority order, memoizes the answers per
//! display, substitutes generic families when a named family is missing,
//! and keeps one reference-counted object per opened (entity, size, frame).
//!
//! ```ignore
//! use std::sync::Arc;
//! use fontres::{Config, FontContext, FontSpec, Frame};
//!
//! let ctx = FontContext::new(Config::from_env());
//! ctx.register_driver(Arc::new(fontres_sfnt::SfntDriver::new(ctx.config())));
//!
//! let frame = Frame::default();
//! let spec = FontSpec::family("monospace").with_pixel_size(14);
//! let entity = ctx.resolve(&spec, &frame).into_iter().next();
//! ```

pub mod cache;
pub mod context;
pub mod generic;
pub mod lifecycle;
mod resolve;

pub use cache::{CacheKey, CacheStats, EntityCache};
pub use context::FontContext;
pub use generic::{GenericFamilyCache, GenericSlot};
pub use lifecycle::{FontHandle, ObjectKey, ObjectTable, Release};
pub use resolve::filter_by_size;

pub use fontres_core::{
    font_match_p, parse_font_name, Config, DisplayId, DrawTarget, Extra, FontDriver, FontEntity,
    FontError, FontMetrics, FontSize, FontSpec, Frame, FrameId, GenericFamily, GlyphCode,
    ObjectMetrics, OtfSpec, Registry, Slant, Spacing, Weight, Width, INVALID_CODE,
};

/// Re-export of the shared vocabulary crate
pub use fontres_core as core;
