// this_file: crates/fontres/src/resolve.rs

//! Resolution of one spec against one driver
//!
//! The driver lists exact matches. When that finds nothing for a named
//! family, the engine substitutes the entities of the family's generic
//! (`mono` → `monospace`, `Courier` → `monospace`, ...) and re-checks them
//! against the rest of the spec with its own predicate. Finally, bitmap
//! entities of another pixel size are dropped. Order is the driver's.

use std::sync::Arc;

use fontres_core::matching::font_match_at;
use fontres_core::{DisplayId, FontDriver, FontEntity, FontSpec, GenericFamily, InputBlocker};

use crate::generic::GenericFamilyCache;

/// Entities found for one driver
///
/// `complete` is false when a generic-family fallback could not be built,
/// in which case the answer must not be memoized.
pub(crate) struct Resolution {
    pub entities: Vec<Arc<FontEntity>>,
    pub complete: bool,
}

pub(crate) struct Resolver<'a> {
    pub generic: &'a GenericFamilyCache,
    pub blocker: &'a InputBlocker,
    pub dpi: f32,
}

impl Resolver<'_> {
    pub fn resolve(
        &self,
        driver: &dyn FontDriver,
        display: DisplayId,
        spec: &FontSpec,
    ) -> Resolution {
        let listed = {
            let _input = self.blocker.block();
            driver.list(display, spec)
        };

        let (entities, complete) = match &spec.family {
            Some(family) if listed.is_empty() => {
                match self.generic_fallback(driver, display, spec, family) {
                    Some(found) => (found, true),
                    None => (Vec::new(), false),
                }
            }
            _ => (listed, true),
        };

        Resolution {
            entities: filter_by_size(entities, spec.pixel_size(self.dpi)),
            complete,
        }
    }

    fn generic_fallback(
        &self,
        driver: &dyn FontDriver,
        display: DisplayId,
        spec: &FontSpec,
        family: &str,
    ) -> Option<Vec<Arc<FontEntity>>> {
        let Some(generic) = GenericFamily::classify(family) else {
            return Some(Vec::new());
        };
        log::debug!(
            "no {} font for family {family:?}; trying generic {generic}",
            driver.driver_type()
        );

        let candidates = {
            let _input = self.blocker.block();
            self.generic.get_or_build(display, driver, generic)
        };
        let candidates = match candidates {
            Ok(list) => list,
            Err(err) => {
                log::warn!("generic family {generic} unavailable: {err}");
                return None;
            }
        };

        let mut relaxed = spec.clone();
        relaxed.family = None;
        Some(
            candidates
                .iter()
                .filter(|entity| font_match_at(&relaxed, entity, self.dpi))
                .cloned()
                .collect(),
        )
    }
}

/// Keeps scalable entities and those of exactly `pixel_size`
pub fn filter_by_size(
    entities: Vec<Arc<FontEntity>>,
    pixel_size: Option<u32>,
) -> Vec<Arc<FontEntity>> {
    match pixel_size {
        Some(size) if size > 0 => entities
            .into_iter()
            .filter(|e| e.is_scalable() || e.pixel_size() == size)
            .collect(),
        _ => entities,
    }
}
