// this_file: crates/fontres/tests/common/mod.rs

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use fontres::core::{
    font_match_p, BackendInitFailure, DisplayId, DriverError, FontDriver, FontEntity,
    FontMetrics, FontObject, FontSpec, Frame, GenericFamily, GlyphCode, ObjectMetrics, Registry,
    Repertory, ResourceError, Slant, Spacing, Weight, INVALID_CODE,
};

pub const ADVANCE: i32 = 7;

/// In-memory driver with call counters
pub struct MockDriver {
    name: String,
    entities: Vec<Arc<FontEntity>>,
    fail_init: bool,
    pub fail_members: AtomicBool,
    pub init_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub member_calls: AtomicUsize,
    pub open_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    /// Display of every frame passed to `close`
    pub closed_on: Mutex<Vec<DisplayId>>,
    pub freed: AtomicUsize,
}

pub fn latin1() -> Arc<Repertory> {
    Arc::new(Repertory::from_ranges([(0x20, 0x7E), (0xA0, 0xFF)]))
}

pub fn ascii() -> Arc<Repertory> {
    Arc::new(Repertory::from_ranges([(0x20, 0x7E)]))
}

impl MockDriver {
    pub fn new(name: &str) -> Self {
        Self::with_entities(name, |name| {
            vec![
                FontEntity::builder(name, "Courier New")
                    .foundry("Monotype")
                    .spacing(Spacing::Mono)
                    .repertory(latin1())
                    .build(),
                FontEntity::builder(name, "Courier New")
                    .foundry("Monotype")
                    .weight(Weight::BOLD)
                    .spacing(Spacing::Mono)
                    .repertory(latin1())
                    .build(),
                FontEntity::builder(name, "Monaco")
                    .foundry("Apple")
                    .spacing(Spacing::Mono)
                    .repertory(ascii())
                    .build(),
                FontEntity::builder(name, "Monaco")
                    .foundry("Apple")
                    .spacing(Spacing::Mono)
                    .pixel_size(10)
                    .repertory(latin1())
                    .build(),
                FontEntity::builder(name, "Helvetica")
                    .foundry("Adobe")
                    .repertory(latin1())
                    .build(),
                FontEntity::builder(name, "Helvetica")
                    .foundry("Adobe")
                    .slant(Slant::ITALIC)
                    .repertory(latin1())
                    .build(),
                FontEntity::builder(name, "Fixed")
                    .registry(Registry::Iso8859_1)
                    .spacing(Spacing::Charcell)
                    .pixel_size(13)
                    .build(),
            ]
        })
    }

    pub fn with_entities(name: &str, make: impl FnOnce(&str) -> Vec<FontEntity>) -> Self {
        Self {
            name: name.to_string(),
            entities: make(name).into_iter().map(Arc::new).collect(),
            fail_init: false,
            fail_members: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            member_calls: AtomicUsize::new(0),
            open_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            closed_on: Mutex::new(Vec::new()),
            freed: AtomicUsize::new(0),
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn entities(&self) -> &[Arc<FontEntity>] {
        &self.entities
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl FontDriver for MockDriver {
    fn driver_type(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), BackendInitFailure> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(BackendInitFailure::new(&self.name, "no font server"));
        }
        Ok(())
    }

    fn list(&self, _display: DisplayId, spec: &FontSpec) -> Vec<Arc<FontEntity>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.entities
            .iter()
            .filter(|e| font_match_p(spec, e))
            .cloned()
            .collect()
    }

    fn match_font(&self, display: DisplayId, spec: &FontSpec) -> Option<Arc<FontEntity>> {
        self.list(display, spec).into_iter().next()
    }

    fn list_family(&self, _display: DisplayId) -> Vec<String> {
        let mut families: Vec<String> =
            self.entities.iter().map(|e| e.family().to_string()).collect();
        families.dedup();
        families
    }

    fn generic_family_members(&self, generic: GenericFamily) -> Vec<String> {
        match generic {
            GenericFamily::Monospace => vec![
                "monospace".into(),
                "Courier New".into(),
                "Monaco".into(),
            ],
            GenericFamily::SansSerif => vec!["Helvetica".into()],
            GenericFamily::Serif => Vec::new(),
        }
    }

    fn list_family_members(
        &self,
        display: DisplayId,
        family: &str,
    ) -> Result<Vec<Arc<FontEntity>>, DriverError> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_members.load(Ordering::SeqCst) {
            return Err(DriverError::InvalidFont(format!("cannot list {family}")));
        }
        Ok(self.list(display, &FontSpec::family(family)))
    }

    fn free_entity(&self, _entity: &FontEntity) {
        self.freed.fetch_add(1, Ordering::SeqCst);
    }

    fn open(
        &self,
        frame: &Frame,
        entity: &Arc<FontEntity>,
        pixel_size: u32,
    ) -> Result<FontObject, ResourceError> {
        if !self.entities.iter().any(|e| e.id() == entity.id()) {
            return Err(ResourceError::ForeignEntity {
                entity: entity.to_string(),
                driver: self.name.clone(),
            });
        }
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        let size = pixel_size as i32;
        let metrics = ObjectMetrics {
            ascent: size * 4 / 5,
            descent: size / 5,
            height: size,
            space_width: ADVANCE,
            average_width: ADVANCE,
            min_width: ADVANCE,
            default_ascent: size * 4 / 5,
            scalable: entity.is_scalable(),
            ..ObjectMetrics::default()
        };
        Ok(FontObject::new(entity.clone(), pixel_size, frame.id, metrics, ()))
    }

    fn close(&self, frame: &Frame, _font: &FontObject) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed_on.lock().push(frame.display);
    }

    fn encode_char(&self, font: &FontObject, c: char) -> GlyphCode {
        match font.entity().repertory() {
            Some(r) if r.contains(c as u32) => c as u32,
            None if c.is_ascii() => c as u32,
            _ => INVALID_CODE,
        }
    }

    fn text_extents(&self, font: &FontObject, glyphs: &[GlyphCode]) -> FontMetrics {
        let mut metrics = FontMetrics::default();
        if glyphs.is_empty() {
            return metrics;
        }
        let m = font.metrics();
        metrics.width = ADVANCE * glyphs.len() as i32;
        metrics.rbearing = metrics.width;
        metrics.ascent = m.ascent;
        metrics.descent = m.descent;
        metrics
    }
}

pub fn frame() -> Frame {
    Frame::default()
}
