// this_file: crates/fontres/src/context.rs

//! The font subsystem context
//!
//! One [`FontContext`] is created at startup and held by whoever drives
//! redisplay. It owns the driver registry, the per-display entity cache,
//! the generic-family lists and the table of open fonts. Every call into a
//! driver happens under the context's input block.

use std::collections::HashSet;
use std::sync::Arc;

use fontres_core::{
    BackendInitFailure, Config, ConfigError, DisplayId, DrawTarget, DriverError, FontBitmap,
    FontDriver, FontEntity, FontMetrics, FontSpec, Frame, GlyphCode, GlyphOutline, InputBlocker,
    OtfCapability, OtfSpec, ResourceError, ShapedGlyph, INVALID_CODE,
};
use parking_lot::RwLock;

use crate::cache::{CacheKey, CacheStats, EntityCache};
use crate::generic::GenericFamilyCache;
use crate::lifecycle::{FontHandle, ObjectKey, ObjectTable, Release};
use crate::resolve::Resolver;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DriverState {
    Uninitialized,
    Ready,
    Failed(String),
}

struct DriverSlot {
    driver: Arc<dyn FontDriver>,
    state: DriverState,
}

/// Process-wide font subsystem state
pub struct FontContext {
    config: Config,
    drivers: RwLock<Vec<DriverSlot>>,
    sort_order: RwLock<Vec<String>>,
    entities: EntityCache,
    generic: GenericFamilyCache,
    objects: ObjectTable,
    blocker: InputBlocker,
}

impl FontContext {
    pub fn new(config: Config) -> Self {
        let sort_order = config.sort_order.clone();
        Self {
            config,
            drivers: RwLock::new(Vec::new()),
            sort_order: RwLock::new(sort_order),
            entities: EntityCache::new(),
            generic: GenericFamilyCache::new(),
            objects: ObjectTable::new(),
            blocker: InputBlocker::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The guard every driver call runs under
    pub fn input_blocker(&self) -> &InputBlocker {
        &self.blocker
    }

    /// Adds a driver after those already registered
    ///
    /// A second driver with the same type replaces the first.
    pub fn register_driver(&self, driver: Arc<dyn FontDriver>) {
        let mut drivers = self.drivers.write();
        let slot = DriverSlot {
            driver,
            state: DriverState::Uninitialized,
        };
        match drivers
            .iter_mut()
            .find(|s| s.driver.driver_type() == slot.driver.driver_type())
        {
            Some(existing) => {
                log::warn!("replacing driver {}", slot.driver.driver_type());
                *existing = slot;
            }
            None => drivers.push(slot),
        }
    }

    /// Registered driver types, in consultation order
    pub fn driver_types(&self) -> Vec<String> {
        self.ordered_drivers(None)
            .iter()
            .map(|d| d.driver_type().to_string())
            .collect()
    }

    /// Puts the named drivers first, in the given order
    pub fn set_sort_order(&self, order: &[&str]) -> Result<(), ConfigError> {
        let drivers = self.drivers.read();
        if let Some(unknown) = order
            .iter()
            .find(|name| !drivers.iter().any(|s| s.driver.driver_type() == **name))
        {
            return Err(ConfigError::UnknownDriver(unknown.to_string()));
        }
        *self.sort_order.write() = order.iter().map(|s| s.to_string()).collect();
        Ok(())
    }

    /// Runs pending one-time driver initialization, returning the failures
    pub fn init_drivers(&self) -> Vec<BackendInitFailure> {
        let pending: Vec<Arc<dyn FontDriver>> = self
            .drivers
            .read()
            .iter()
            .filter(|s| s.state == DriverState::Uninitialized)
            .map(|s| s.driver.clone())
            .collect();

        let mut failures = Vec::new();
        for driver in pending {
            let result = {
                let _input = self.blocker.block();
                driver.init()
            };
            let state = match result {
                Ok(()) => {
                    log::info!("font driver {} ready", driver.driver_type());
                    DriverState::Ready
                }
                Err(err) => {
                    log::warn!("font driver {} disabled: {err}", driver.driver_type());
                    let state = DriverState::Failed(err.reason.clone());
                    failures.push(err);
                    state
                }
            };
            if let Some(slot) = self
                .drivers
                .write()
                .iter_mut()
                .find(|s| Arc::ptr_eq(&s.driver, &driver))
            {
                slot.state = state;
            }
        }
        failures
    }

    /// Ready drivers in sort order, restricted to `driver_type` when given
    fn ordered_drivers(&self, driver_type: Option<&str>) -> Vec<Arc<dyn FontDriver>> {
        self.init_drivers();
        let drivers = self.drivers.read();
        let order = self.sort_order.read();

        let mut ready: Vec<(usize, Arc<dyn FontDriver>)> = drivers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == DriverState::Ready)
            .filter(|(_, s)| driver_type.map_or(true, |t| s.driver.driver_type() == t))
            .map(|(i, s)| {
                let rank = order
                    .iter()
                    .position(|name| name == s.driver.driver_type())
                    .unwrap_or(order.len() + i);
                (rank, s.driver.clone())
            })
            .collect();
        ready.sort_by_key(|(rank, _)| *rank);
        ready.into_iter().map(|(_, d)| d).collect()
    }

    fn driver_for(&self, driver_type: &str) -> Option<Arc<dyn FontDriver>> {
        self.ordered_drivers(Some(driver_type)).into_iter().next()
    }

    fn resolver(&self, frame: &Frame) -> Resolver<'_> {
        Resolver {
            generic: &self.generic,
            blocker: &self.blocker,
            dpi: frame.resolution,
        }
    }

    /// Every entity matching `spec`, drivers in sort order
    pub fn resolve(&self, spec: &FontSpec, frame: &Frame) -> Vec<Arc<FontEntity>> {
        self.resolve_limited(spec, frame, 0)
    }

    /// [`FontContext::resolve`] keeping at most `max_results` (0 = all)
    pub fn resolve_limited(
        &self,
        spec: &FontSpec,
        frame: &Frame,
        max_results: usize,
    ) -> Vec<Arc<FontEntity>> {
        let resolver = self.resolver(frame);
        let mut result: Vec<Arc<FontEntity>> = Vec::new();

        for driver in self.ordered_drivers(spec.driver_type.as_deref()) {
            let key = CacheKey {
                cache: driver.get_cache().to_string(),
                spec: spec.clone(),
                max_results,
            };
            let entities = match self.entities.get(frame.display, &key) {
                Some(hit) => hit,
                None => {
                    let mut found = resolver.resolve(driver.as_ref(), frame.display, spec);
                    if max_results > 0 {
                        found.entities.truncate(max_results);
                    }
                    if found.complete {
                        self.entities.insert(frame.display, key, found.entities)
                    } else {
                        found.entities.into()
                    }
                }
            };
            result.extend(entities.iter().cloned());
            if max_results > 0 && result.len() >= max_results {
                result.truncate(max_results);
                break;
            }
        }
        result
    }

    /// The first driver's own best match for `spec`
    pub fn match_font(&self, spec: &FontSpec, frame: &Frame) -> Option<Arc<FontEntity>> {
        self.ordered_drivers(spec.driver_type.as_deref())
            .into_iter()
            .find_map(|driver| {
                let _input = self.blocker.block();
                driver.match_font(frame.display, spec)
            })
    }

    /// Installed family names across all drivers, sorted and deduplicated
    pub fn list_families(&self, frame: &Frame) -> Vec<String> {
        let mut families: Vec<String> = self
            .ordered_drivers(None)
            .iter()
            .flat_map(|driver| {
                let _input = self.blocker.block();
                driver.list_family(frame.display)
            })
            .collect();
        families.sort_by_key(|f| f.to_lowercase());
        families.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        families
    }

    /// Opens `entity` at `pixel_size` for `frame`, reusing an open object
    ///
    /// Size 0 on a scalable entity means the configured default size; a
    /// bitmap entity always opens at its own size.
    pub fn open(
        &self,
        entity: &Arc<FontEntity>,
        pixel_size: u32,
        frame: &Frame,
    ) -> Result<FontHandle, ResourceError> {
        let pixel_size = if !entity.is_scalable() {
            entity.pixel_size()
        } else if pixel_size == 0 {
            self.config.default_pixel_size
        } else {
            pixel_size
        };
        let key = ObjectKey {
            entity: entity.id(),
            pixel_size,
            frame: frame.id,
        };
        if let Some(handle) = self.objects.retain(&key) {
            return Ok(handle);
        }

        let driver = self
            .driver_for(entity.driver_type())
            .ok_or_else(|| ResourceError::DriverUnavailable(entity.driver_type().to_string()))?;
        let font = {
            let _input = self.blocker.block();
            driver.open(frame, entity, pixel_size)
        }
        .map_err(|err| {
            log::debug!("cannot open {entity} at {pixel_size}px: {err}");
            err
        })?;

        let (handle, duplicate) = self.objects.insert(font, frame);
        if let Some(duplicate) = duplicate {
            let _input = self.blocker.block();
            driver.close(frame, &duplicate);
        }
        Ok(handle)
    }

    /// Drops one reference; the driver closes the font with the last one
    pub fn close(&self, handle: &FontHandle, frame: &Frame) {
        match self.objects.release(handle) {
            Release::Shared(_) => {}
            Release::Last(object) => match self.driver_for(object.driver_type()) {
                Some(driver) => {
                    let _input = self.blocker.block();
                    driver.close(frame, &object);
                }
                None => log::warn!("no driver {} to close font", object.driver_type()),
            },
            Release::Unknown => log::warn!("closing a font that is not open: {handle:?}"),
        }
    }

    pub fn refcount(&self, handle: &FontHandle) -> usize {
        self.objects.refcount(&handle.key())
    }

    pub fn open_font_count(&self) -> usize {
        self.objects.len()
    }

    fn with_font_driver<T>(
        &self,
        handle: &FontHandle,
        missing: T,
        f: impl FnOnce(&dyn FontDriver) -> T,
    ) -> T {
        match self.driver_for(handle.driver_type()) {
            Some(driver) => {
                let _input = self.blocker.block();
                f(driver.as_ref())
            }
            None => missing,
        }
    }

    /// Glyph for `c`, or [`INVALID_CODE`]
    pub fn encode(&self, handle: &FontHandle, c: char) -> GlyphCode {
        self.with_font_driver(handle, INVALID_CODE, |d| d.encode_char(handle, c))
    }

    pub fn encode_str(&self, handle: &FontHandle, text: &str) -> Vec<GlyphCode> {
        self.with_font_driver(handle, vec![INVALID_CODE; text.chars().count()], |d| {
            fontres_core::driver::encode_str(d, handle, text)
        })
    }

    /// Total advance and bounding box of `glyphs`
    pub fn metrics(&self, handle: &FontHandle, glyphs: &[GlyphCode]) -> (i32, FontMetrics) {
        let metrics = self.with_font_driver(handle, FontMetrics::default(), |d| {
            d.text_extents(handle, glyphs)
        });
        (metrics.width, metrics)
    }

    /// [`FontContext::metrics`] over `glyphs[range]`, for partial reshaping
    pub fn metrics_range(
        &self,
        handle: &FontHandle,
        glyphs: &[GlyphCode],
        range: std::ops::Range<usize>,
    ) -> (i32, FontMetrics) {
        let end = range.end.min(glyphs.len());
        let start = range.start.min(end);
        self.metrics(handle, &glyphs[start..end])
    }

    /// Whether `entity` can display `c`, opening it briefly when the
    /// driver cannot tell from the entity alone
    pub fn has_char(&self, entity: &Arc<FontEntity>, c: char, frame: &Frame) -> bool {
        let Some(driver) = self.driver_for(entity.driver_type()) else {
            return false;
        };
        let known = {
            let _input = self.blocker.block();
            driver.has_char(entity, c)
        };
        if let Some(answer) = known {
            return answer;
        }
        match self.open(entity, 0, frame) {
            Ok(handle) => {
                let found = self.encode(&handle, c) != INVALID_CODE;
                self.close(&handle, frame);
                found
            }
            Err(_) => false,
        }
    }

    pub fn draw(
        &self,
        handle: &FontHandle,
        glyphs: &[GlyphCode],
        x: i32,
        y: i32,
        with_background: bool,
        target: &mut dyn DrawTarget,
    ) -> Result<i32, DriverError> {
        self.with_font_driver(
            handle,
            Err(DriverError::unsupported(handle.driver_type(), "draw")),
            |d| d.draw(handle, glyphs, x, y, with_background, target),
        )
    }

    pub fn glyph_bitmap(
        &self,
        handle: &FontHandle,
        glyph: GlyphCode,
        bits_per_pixel: u8,
    ) -> Result<FontBitmap, DriverError> {
        self.with_font_driver(
            handle,
            Err(DriverError::unsupported(handle.driver_type(), "get_bitmap")),
            |d| d.get_bitmap(handle, glyph, bits_per_pixel),
        )
    }

    pub fn glyph_outline(&self, handle: &FontHandle, glyph: GlyphCode) -> Option<GlyphOutline> {
        self.with_font_driver(handle, None, |d| d.get_outline(handle, glyph))
    }

    pub fn anchor_point(
        &self,
        handle: &FontHandle,
        glyph: GlyphCode,
        index: u32,
    ) -> Option<(i32, i32)> {
        self.with_font_driver(handle, None, |d| d.anchor_point(handle, glyph, index))
    }

    pub fn otf_capability(&self, handle: &FontHandle) -> Option<OtfCapability> {
        self.with_font_driver(handle, None, |d| d.otf_capability(handle))
    }

    pub fn otf_drive(
        &self,
        handle: &FontHandle,
        text: &str,
        spec: &OtfSpec,
    ) -> Result<Vec<ShapedGlyph>, DriverError> {
        self.with_font_driver(
            handle,
            Err(DriverError::unsupported(handle.driver_type(), "otf_drive")),
            |d| d.otf_drive(handle, text, spec),
        )
    }

    /// Forgets every cached query of `display`
    pub fn flush_caches(&self, display: DisplayId) {
        let mut dropped = self.entities.flush(display);
        dropped.extend(self.generic.flush(display));
        self.free_entities(dropped);
    }

    /// Forgets every cached query, after a font configuration change
    pub fn flush_all_caches(&self) {
        let mut dropped = self.entities.flush_all();
        dropped.extend(self.generic.flush_all());
        self.free_entities(dropped);
    }

    fn free_entities(&self, entities: Vec<Arc<FontEntity>>) {
        let mut seen = HashSet::new();
        let unique: Vec<_> = entities
            .into_iter()
            .filter(|e| seen.insert(e.id()))
            .collect();
        log::debug!("releasing {} cached entities", unique.len());
        for entity in unique {
            if let Some(driver) = self.driver_for(entity.driver_type()) {
                let _input = self.blocker.block();
                driver.free_entity(&entity);
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.entities.stats()
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for FontContext {
    fn drop(&mut self) {
        let leftover = self.objects.drain();
        if !leftover.is_empty() {
            log::debug!("closing {} fonts still open at shutdown", leftover.len());
        }
        for (handle, frame) in leftover {
            if let Some(driver) = self.driver_for(handle.driver_type()) {
                let _input = self.blocker.block();
                driver.close(&frame, &handle);
            }
        }
    }
}
