// this_file: crates/fontres-core/src/entity.rs

//! Driver-produced font candidates

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::coverage::Repertory;
use crate::otf::OtfCapability;
use crate::props::{Registry, Slant, Spacing, Weight, Width};

/// Connection to a display; caches are partitioned by it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

/// A window on some display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

/// What a driver needs to know about the frame it works for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub id: FrameId,
    pub display: DisplayId,
    /// Dots per inch used to convert point sizes
    pub resolution: f32,
}

impl Frame {
    pub fn new(id: u32, display: u32) -> Self {
        Self {
            id: FrameId(id),
            display: DisplayId(display),
            resolution: 96.0,
        }
    }

    pub fn with_resolution(mut self, dpi: f32) -> Self {
        self.resolution = dpi;
        self
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new(0, 0)
    }
}

/// Process-unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        EntityId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Driver-private data attached to an entity
///
/// The engine never looks inside; the owning driver downcasts it back.
#[derive(Clone, Default)]
pub struct EntityPayload(Option<Arc<dyn Any + Send + Sync>>);

impl EntityPayload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for EntityPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("EntityPayload(..)"),
            None => f.write_str("EntityPayload(empty)"),
        }
    }
}

/// A fully specified font a driver can open
///
/// Built only by drivers (through [`FontEntity::builder`]) and read-only
/// afterwards. `pixel_size == 0` marks a scalable font.
#[derive(Debug, Clone)]
pub struct FontEntity {
    id: EntityId,
    driver_type: String,
    foundry: Option<String>,
    family: String,
    /// Other names of the family, e.g. localized ones
    aliases: Vec<String>,
    adstyle: Option<String>,
    registry: Registry,
    weight: Weight,
    slant: Slant,
    width: Width,
    pixel_size: u32,
    spacing: Spacing,
    repertory: Option<Arc<Repertory>>,
    /// Layout tables, when the driver read them at listing time
    otf: Option<Arc<OtfCapability>>,
    frame: Option<FrameId>,
    payload: EntityPayload,
}

impl FontEntity {
    pub fn builder(driver_type: impl Into<String>, family: impl Into<String>) -> EntityBuilder {
        EntityBuilder {
            entity: FontEntity {
                id: EntityId(0),
                driver_type: driver_type.into(),
                foundry: None,
                family: family.into(),
                aliases: Vec::new(),
                adstyle: None,
                registry: Registry::default(),
                weight: Weight::default(),
                slant: Slant::default(),
                width: Width::default(),
                pixel_size: 0,
                spacing: Spacing::default(),
                repertory: None,
                otf: None,
                frame: None,
                payload: EntityPayload::default(),
            },
        }
    }

    /// Copies this entity under another driver type with a fresh id
    pub fn retag(&self, driver_type: impl Into<String>, payload: EntityPayload) -> FontEntity {
        FontEntity {
            id: EntityId::next(),
            driver_type: driver_type.into(),
            payload,
            ..self.clone()
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn driver_type(&self) -> &str {
        &self.driver_type
    }

    pub fn foundry(&self) -> Option<&str> {
        self.foundry.as_deref()
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether `name` is the family or one of its aliases, ignoring case
    pub fn has_family(&self, name: &str) -> bool {
        self.family.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    pub fn adstyle(&self) -> Option<&str> {
        self.adstyle.as_deref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn slant(&self) -> Slant {
        self.slant
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn is_scalable(&self) -> bool {
        self.pixel_size == 0
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn repertory(&self) -> Option<&Repertory> {
        self.repertory.as_deref()
    }

    pub fn otf(&self) -> Option<&OtfCapability> {
        self.otf.as_deref()
    }

    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    pub fn payload(&self) -> &EntityPayload {
        &self.payload
    }
}

impl fmt::Display for FontEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "-{}-{}-{}-{}-{}-{}-{}-{}",
            self.foundry.as_deref().unwrap_or("*"),
            self.family,
            self.weight.name().unwrap_or("*"),
            self.slant.name().unwrap_or("*"),
            self.width.name().unwrap_or("*"),
            self.adstyle.as_deref().unwrap_or(""),
            self.pixel_size,
            self.registry,
        )
    }
}

pub struct EntityBuilder {
    entity: FontEntity,
}

impl EntityBuilder {
    pub fn foundry(mut self, foundry: impl Into<String>) -> Self {
        self.entity.foundry = Some(foundry.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn adstyle(mut self, adstyle: impl Into<String>) -> Self {
        self.entity.adstyle = Some(adstyle.into());
        self
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.entity.registry = registry;
        self
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.entity.weight = weight;
        self
    }

    pub fn slant(mut self, slant: Slant) -> Self {
        self.entity.slant = slant;
        self
    }

    pub fn width(mut self, width: Width) -> Self {
        self.entity.width = width;
        self
    }

    pub fn pixel_size(mut self, pixel_size: u32) -> Self {
        self.entity.pixel_size = pixel_size;
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.entity.spacing = spacing;
        self
    }

    pub fn repertory(mut self, repertory: Arc<Repertory>) -> Self {
        self.entity.repertory = Some(repertory);
        self
    }

    pub fn otf(mut self, otf: Arc<OtfCapability>) -> Self {
        self.entity.otf = Some(otf);
        self
    }

    pub fn frame(mut self, frame: FrameId) -> Self {
        self.entity.frame = Some(frame);
        self
    }

    pub fn payload(mut self, payload: EntityPayload) -> Self {
        self.entity.payload = payload;
        self
    }

    pub fn build(self) -> FontEntity {
        FontEntity {
            id: EntityId::next(),
            ..self.entity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = FontEntity::builder("mock", "A").build();
        let b = FontEntity::builder("mock", "A").build();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn payload_downcasts_to_its_type() {
        let entity = FontEntity::builder("mock", "A")
            .payload(EntityPayload::new(42u32))
            .build();
        assert_eq!(entity.payload().get::<u32>(), Some(&42));
        assert_eq!(entity.payload().get::<String>(), None);
    }

    #[test]
    fn retag_keeps_properties() {
        let inner = FontEntity::builder("sfnt", "DejaVu Sans")
            .weight(Weight::BOLD)
            .build();
        let outer = inner.retag("canvas", EntityPayload::new(inner.id()));
        assert_eq!(outer.driver_type(), "canvas");
        assert_eq!(outer.family(), "DejaVu Sans");
        assert_eq!(outer.weight(), Weight::BOLD);
        assert_ne!(outer.id(), inner.id());
        assert_eq!(outer.payload().get::<EntityId>(), Some(&inner.id()));
    }

    #[test]
    fn aliases_answer_to_family_lookups() {
        let entity = FontEntity::builder("mock", "Noto Sans CJK JP")
            .aliases(["Noto Sans CJK JP Regular"])
            .build();
        assert!(entity.has_family("noto sans cjk jp"));
        assert!(entity.has_family("Noto Sans CJK JP Regular"));
        assert!(!entity.has_family("Noto Sans"));
        assert_eq!(entity.family(), "Noto Sans CJK JP");
    }

    #[test]
    fn display_uses_xlfd_shape() {
        let entity = FontEntity::builder("mock", "courier new")
            .weight(Weight::BOLD)
            .registry(Registry::Iso8859_1)
            .build();
        assert_eq!(
            entity.to_string(),
            "-*-courier new-bold-roman-normal--0-iso8859-1"
        );
    }
}
