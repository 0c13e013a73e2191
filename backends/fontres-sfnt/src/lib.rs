// this_file: backends/fontres-sfnt/src/lib.rs

//! TrueType/OpenType font driver
//!
//! Discovers faces with fontdb, reads metrics and outlines with skrifa,
//! rasterizes with zeno and applies OpenType layout with harfrust. Every
//! face is scalable, so entities carry pixel size 0 and open at any size.
//!
//! Open fonts share one mapping of their file per (path, face index); the
//! mapping is released when the last size of the face is closed.

pub mod face;
pub mod metrics;
pub mod probe;
pub mod raster;
pub mod scan;
pub mod shape;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use fontres_core::{
    BackendInitFailure, Config, DisplayId, DriverError, EntityPayload, FontBitmap, FontDriver,
    FontEntity, FontMetrics, FontObject, FontSpec, Frame, GenericFamily, GlyphCode, GlyphOutline,
    OtfCapability, OtfSpec, Pattern, Registry, ResourceError, ShapedGlyph, Slant, Weight, Width,
    INVALID_CODE,
};
use parking_lot::Mutex;

pub use face::{FaceTable, SharedFace};
pub use metrics::SfntFont;
pub use probe::FaceProbe;
pub use scan::{Catalog, FaceKey, FaceRecord, ScanOptions};

/// Type tag of entities this driver creates
pub const DRIVER_TYPE: &str = "sfnt";

pub struct SfntDriver {
    options: ScanOptions,
    dpi: f32,
    catalog: OnceLock<Arc<Catalog>>,
    probes: Mutex<HashMap<fontdb::ID, Arc<FaceProbe>>>,
    entities: Mutex<HashMap<fontdb::ID, Arc<FontEntity>>>,
    faces: FaceTable,
}

impl SfntDriver {
    /// A driver that scans the configured directories on first use
    pub fn new(config: &Config) -> Self {
        Self {
            options: ScanOptions::from_config(config),
            dpi: config.dpi,
            catalog: OnceLock::new(),
            probes: Mutex::new(HashMap::new()),
            entities: Mutex::new(HashMap::new()),
            faces: FaceTable::new(),
        }
    }

    /// A driver over an already populated database
    pub fn from_database(db: &fontdb::Database) -> Self {
        Self::with_catalog(Catalog::from_database(db))
    }

    /// A driver over faces discovered elsewhere
    pub fn with_catalog(catalog: Catalog) -> Self {
        let driver = Self::new(&Config::default().without_system_fonts());
        let _ = driver.catalog.set(Arc::new(catalog));
        driver
    }

    fn catalog(&self) -> &Arc<Catalog> {
        self.catalog
            .get_or_init(|| Arc::new(Catalog::scan(&self.options)))
    }

    /// Faces currently mapped by open fonts
    pub fn loaded_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn face_users(&self, key: &FaceKey) -> usize {
        self.faces.users(key)
    }

    fn probe(&self, record: &FaceRecord) -> Arc<FaceProbe> {
        if let Some(probe) = self.probes.lock().get(&record.id) {
            return probe.clone();
        }
        let probe = match SharedFace::load(record) {
            Ok(face) => FaceProbe::of(&face),
            Err(err) => {
                log::debug!("cannot probe {}: {err}", record.origin());
                FaceProbe::default()
            }
        };
        self.probes
            .lock()
            .entry(record.id)
            .or_insert_with(|| Arc::new(probe))
            .clone()
    }

    fn entity_for(&self, record: &Arc<FaceRecord>, probe: &FaceProbe) -> Arc<FontEntity> {
        self.entities
            .lock()
            .entry(record.id)
            .or_insert_with(|| {
                let mut builder = FontEntity::builder(DRIVER_TYPE, record.family())
                    .aliases(record.families.iter().skip(1).cloned())
                    .registry(Registry::Iso10646_1)
                    .weight(record.weight)
                    .slant(record.slant)
                    .width(record.width)
                    .spacing(record.spacing)
                    .repertory(probe.repertory.clone())
                    .otf(Arc::new(probe.otf.clone()))
                    .payload(EntityPayload::new(record.clone()));
                if let Some(foundry) = &probe.foundry {
                    builder = builder.foundry(foundry.clone());
                }
                Arc::new(builder.build())
            })
            .clone()
    }

    fn record_of(entity: &FontEntity) -> Option<&Arc<FaceRecord>> {
        if entity.driver_type() != DRIVER_TYPE {
            return None;
        }
        entity.payload().get::<Arc<FaceRecord>>()
    }

    fn instance(font: &FontObject) -> Option<&SfntFont> {
        font.driver_data::<SfntFont>()
    }

    fn instance_or_closed(font: &FontObject) -> Result<&SfntFont, DriverError> {
        Self::instance(font).ok_or(DriverError::Closed)
    }

    fn registry_supported(spec: &FontSpec) -> bool {
        match &spec.registry {
            None => true,
            Some(registry) => registry.is_unicode() || *registry == Registry::Iso8859_1,
        }
    }

    fn candidates(&self, spec: &FontSpec) -> Vec<Arc<FontEntity>> {
        if spec.adstyle.is_some() || !Self::registry_supported(spec) {
            return Vec::new();
        }
        let pattern = match Pattern::from_spec(spec, self.dpi) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::debug!("unusable font name in {spec:?}: {err}");
                return Vec::new();
            }
        };

        let catalog = self.catalog().clone();
        catalog
            .faces()
            .iter()
            .filter(|record| {
                pattern.accepts_family(&record.families)
                    && pattern.accepts_style(record.weight, record.slant, record.width)
                    && pattern.accepts_spacing(record.spacing)
                    && pattern.style.as_deref().map_or(true, |s| record.has_style(s))
            })
            .filter_map(|record| {
                let probe = self.probe(record);
                let accepted = pattern.accepts_foundry(probe.foundry.as_deref())
                    && pattern.accepts_repertory(&probe.repertory)
                    && pattern.accepts_otf(&probe.otf);
                accepted.then(|| self.entity_for(record, &probe))
            })
            .collect()
    }
}

/// Ordering key for [`FontDriver::match_font`]; smaller is closer
///
/// Unset style fields prefer the regular roman normal-width face.
fn distance(spec: &FontSpec, entity: &FontEntity) -> (u16, bool, u16, u16) {
    let slant = spec.slant.unwrap_or(Slant::ROMAN);
    let weight = spec.weight.unwrap_or(Weight::REGULAR);
    let width = spec.width.unwrap_or(Width::NORMAL);
    (
        slant.0.abs_diff(entity.slant().0),
        spec.spacing.is_some_and(|s| s != entity.spacing()),
        weight.0.abs_diff(entity.weight().0),
        width.0.abs_diff(entity.width().0),
    )
}

impl FontDriver for SfntDriver {
    fn driver_type(&self) -> &str {
        DRIVER_TYPE
    }

    fn init(&self) -> Result<(), BackendInitFailure> {
        if self.catalog().is_empty() {
            return Err(BackendInitFailure::new(DRIVER_TYPE, "no usable font files found"));
        }
        Ok(())
    }

    fn list(&self, _display: DisplayId, spec: &FontSpec) -> Vec<Arc<FontEntity>> {
        let found = self.candidates(spec);
        log::debug!("sfnt list {:?}: {} entities", spec.family, found.len());
        found
    }

    fn match_font(&self, _display: DisplayId, spec: &FontSpec) -> Option<Arc<FontEntity>> {
        // Style fields rank candidates instead of excluding them
        let relaxed = FontSpec {
            weight: None,
            slant: None,
            width: None,
            spacing: None,
            ..spec.clone()
        };
        self.candidates(&relaxed)
            .into_iter()
            .min_by_key(|entity| distance(spec, entity))
    }

    fn list_family(&self, _display: DisplayId) -> Vec<String> {
        self.catalog().families()
    }

    fn generic_family_members(&self, generic: GenericFamily) -> Vec<String> {
        let mut members: Vec<String> = self
            .catalog()
            .generic_family(generic)
            .map(str::to_string)
            .into_iter()
            .collect();
        for &name in generic.default_members() {
            if !members.iter().any(|m| m.eq_ignore_ascii_case(name)) {
                members.push(name.to_string());
            }
        }
        members
    }

    fn free_entity(&self, entity: &FontEntity) {
        if let Some(record) = Self::record_of(entity) {
            let mut entities = self.entities.lock();
            if entities.get(&record.id).is_some_and(|e| e.id() == entity.id()) {
                entities.remove(&record.id);
            }
        }
    }

    fn open(
        &self,
        frame: &Frame,
        entity: &Arc<FontEntity>,
        pixel_size: u32,
    ) -> Result<FontObject, ResourceError> {
        let record = Self::record_of(entity).ok_or_else(|| ResourceError::ForeignEntity {
            entity: entity.to_string(),
            driver: DRIVER_TYPE.to_string(),
        })?;
        let face = self.faces.acquire(record)?;
        let font = SfntFont::new(face, record.key(), pixel_size, entity.spacing());
        log::debug!("opened {} at {pixel_size}px", record.origin());
        Ok(FontObject::new(
            entity.clone(),
            pixel_size,
            frame.id,
            *font.metrics(),
            font,
        ))
    }

    fn close(&self, _frame: &Frame, font: &FontObject) {
        match Self::instance(font) {
            Some(instance) => self.faces.release(instance.key()),
            None => log::warn!("close of a font this driver did not open"),
        }
    }

    fn encode_char(&self, font: &FontObject, c: char) -> GlyphCode {
        Self::instance(font)
            .and_then(|f| f.encode(c))
            .unwrap_or(INVALID_CODE)
    }

    fn text_extents(&self, font: &FontObject, glyphs: &[GlyphCode]) -> FontMetrics {
        Self::instance(font)
            .map(|f| f.text_extents(glyphs))
            .unwrap_or_default()
    }

    fn get_bitmap(
        &self,
        font: &FontObject,
        glyph: GlyphCode,
        bits_per_pixel: u8,
    ) -> Result<FontBitmap, DriverError> {
        raster::bitmap(Self::instance_or_closed(font)?, glyph, bits_per_pixel)
    }

    fn get_outline(&self, font: &FontObject, glyph: GlyphCode) -> Option<GlyphOutline> {
        let instance = Self::instance(font)?;
        raster::outline(instance, glyph)
            .map_err(|err| log::debug!("no outline: {err}"))
            .ok()
    }

    fn anchor_point(&self, font: &FontObject, glyph: GlyphCode, index: u32) -> Option<(i32, i32)> {
        raster::anchor_point(Self::instance(font)?, glyph, index)
    }

    fn otf_capability(&self, font: &FontObject) -> Option<OtfCapability> {
        let record = Self::record_of(font.entity())?;
        let otf = self.probe(record).otf.clone();
        (!otf.is_empty()).then_some(otf)
    }

    fn otf_drive(
        &self,
        font: &FontObject,
        text: &str,
        spec: &OtfSpec,
    ) -> Result<Vec<ShapedGlyph>, DriverError> {
        shape::shape(Self::instance_or_closed(font)?, text, spec)
    }
}

impl Default for SfntDriver {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
