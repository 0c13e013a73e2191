// this_file: crates/fontres-core/src/matching.rs

//! The engine's own spec/entity compatibility predicate
//!
//! Used to re-filter generic-family substitutes, where the backend's answer
//! was computed for a different query. Only populated spec fields are
//! checked. Coverage constraints pass when the entity carries no repertory,
//! since the driver could not tell.

use crate::coverage::registry_chars;
use crate::entity::FontEntity;
use crate::pattern::Pattern;
use crate::props::Registry;
use crate::spec::FontSpec;

/// Resolution used to turn point sizes into pixels when no frame is known
pub const DEFAULT_DPI: f32 = 96.0;

/// Whether `entity` satisfies every populated field of `spec`
pub fn font_match_p(spec: &FontSpec, entity: &FontEntity) -> bool {
    font_match_at(spec, entity, DEFAULT_DPI)
}

/// [`font_match_p`] with point sizes resolved at `dpi`
///
/// Style properties carried by a name override count as populated fields,
/// as do OpenType requirements when the entity knows its layout tables. A
/// name that does not parse matches nothing.
pub fn font_match_at(spec: &FontSpec, entity: &FontEntity, dpi: f32) -> bool {
    if let Some(driver_type) = &spec.driver_type {
        if driver_type != entity.driver_type() {
            return false;
        }
    }
    let Ok(pattern) = Pattern::from_spec(spec, dpi) else {
        return false;
    };
    if !pattern.accepts_foundry(entity.foundry()) {
        return false;
    }
    if let Some(family) = &spec.family {
        if !entity.has_family(family) {
            return false;
        }
    }
    if let Some(adstyle) = &spec.adstyle {
        if !entity
            .adstyle()
            .is_some_and(|a| a.eq_ignore_ascii_case(adstyle))
        {
            return false;
        }
    }
    if let Some(registry) = &spec.registry {
        if !registry_matches(registry, entity) {
            return false;
        }
    }
    if !pattern.accepts_style(entity.weight(), entity.slant(), entity.width())
        || !pattern.accepts_spacing(entity.spacing())
    {
        return false;
    }
    if let Some(pixels) = pattern.pixel_size {
        if !entity.is_scalable() && entity.pixel_size() != pixels {
            return false;
        }
    }
    if let Some(otf) = entity.otf() {
        if !pattern.accepts_otf(otf) {
            return false;
        }
    }
    entity
        .repertory()
        .map_or(true, |repertory| pattern.accepts_repertory(repertory))
}

fn registry_matches(wanted: &Registry, entity: &FontEntity) -> bool {
    let have = entity.registry();
    if have == wanted || (have.is_unicode() && wanted.is_unicode()) {
        return true;
    }
    // A Unicode font can serve a Latin-1 request if it covers the basic set
    match (registry_chars(wanted), entity.repertory()) {
        (Some(chars), Some(repertory)) if have.is_unicode() => repertory.covers(chars),
        (Some(_), None) => have.is_unicode(),
        _ => false,
    }
}
