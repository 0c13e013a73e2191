// this_file: crates/fontres/src/generic.rs

//! Generic-family substitution lists
//!
//! For each (display, driver cache, generic family) the engine remembers
//! every entity of the concrete families the driver associates with that
//! generic. A slot is built on first use and kept until the caches are
//! flushed. A build that fails is not stored, so the next query retries; a
//! build that finds nothing is stored as an empty list.

use std::collections::HashMap;
use std::sync::Arc;

use fontres_core::{BuildError, DisplayId, FontDriver, FontEntity, GenericFamily};
use parking_lot::RwLock;

type SlotKey = (DisplayId, String, GenericFamily);

/// State of one generic family's entity list
#[derive(Debug, Clone)]
pub enum GenericSlot {
    NotYetListed,
    Listed(Arc<[Arc<FontEntity>]>),
}

#[derive(Default)]
pub struct GenericFamilyCache {
    slots: RwLock<HashMap<SlotKey, Arc<[Arc<FontEntity>]>>>,
}

impl GenericFamilyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, display: DisplayId, cache: &str, generic: GenericFamily) -> GenericSlot {
        match self
            .slots
            .read()
            .get(&(display, cache.to_string(), generic))
        {
            Some(list) => GenericSlot::Listed(list.clone()),
            None => GenericSlot::NotYetListed,
        }
    }

    /// The slot's list, building it with `driver` when not yet listed
    pub fn get_or_build(
        &self,
        display: DisplayId,
        driver: &dyn FontDriver,
        generic: GenericFamily,
    ) -> Result<Arc<[Arc<FontEntity>]>, BuildError> {
        let cache = driver.get_cache().to_string();
        if let GenericSlot::Listed(list) = self.slot(display, &cache, generic) {
            return Ok(list);
        }

        let list: Arc<[Arc<FontEntity>]> = build_generic_list(driver, display, generic)?.into();
        log::debug!(
            "listed {} entities for generic family {} on {}",
            list.len(),
            generic,
            driver.driver_type()
        );
        self.slots
            .write()
            .insert((display, cache, generic), list.clone());
        Ok(list)
    }

    pub fn flush(&self, display: DisplayId) -> Vec<Arc<FontEntity>> {
        let mut slots = self.slots.write();
        let keys: Vec<SlotKey> = slots.keys().filter(|k| k.0 == display).cloned().collect();
        keys.into_iter()
            .filter_map(|k| slots.remove(&k))
            .flat_map(|list| list.iter().cloned().collect::<Vec<_>>())
            .collect()
    }

    pub fn flush_all(&self) -> Vec<Arc<FontEntity>> {
        std::mem::take(&mut *self.slots.write())
            .into_values()
            .flat_map(|list| list.iter().cloned().collect::<Vec<_>>())
            .collect()
    }
}

/// Lists every concrete member family of `generic`, in the driver's order
///
/// The generic's own name is skipped. Any listing failure abandons the
/// whole build rather than returning a partial list.
pub fn build_generic_list(
    driver: &dyn FontDriver,
    display: DisplayId,
    generic: GenericFamily,
) -> Result<Vec<Arc<FontEntity>>, BuildError> {
    let mut entities: Vec<Arc<FontEntity>> = Vec::new();
    for family in driver.generic_family_members(generic) {
        if family.eq_ignore_ascii_case(generic.as_str()) {
            continue;
        }
        let listed = driver
            .list_family_members(display, &family)
            .map_err(|err| BuildError::Listing {
                family: family.clone(),
                reason: err.to_string(),
            })?;
        for entity in listed {
            if !entities.iter().any(|e| e.id() == entity.id()) {
                entities.push(entity);
            }
        }
    }
    Ok(entities)
}
