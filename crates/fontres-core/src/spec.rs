// this_file: crates/fontres-core/src/spec.rs

//! Font requests
//!
//! A [`FontSpec`] is a query: every field is optional and unset fields act
//! as wildcards. Specs are consumed by drivers and the resolution engine,
//! never produced by them.

use crate::props::{Extra, FontSize, OtfSpec, Registry, Slant, Spacing, Weight, Width};

/// A partially specified font request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FontSpec {
    /// Restricts the request to one driver type
    pub driver_type: Option<String>,
    pub foundry: Option<String>,
    pub family: Option<String>,
    pub adstyle: Option<String>,
    pub registry: Option<Registry>,
    pub weight: Option<Weight>,
    pub slant: Option<Slant>,
    pub width: Option<Width>,
    pub size: Option<FontSize>,
    pub spacing: Option<Spacing>,
    pub extra: Vec<Extra>,
}

impl FontSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(family: impl Into<String>) -> Self {
        Self::new().with_family(family)
    }

    pub fn with_driver_type(mut self, driver_type: impl Into<String>) -> Self {
        self.driver_type = Some(driver_type.into());
        self
    }

    pub fn with_foundry(mut self, foundry: impl Into<String>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_adstyle(mut self, adstyle: impl Into<String>) -> Self {
        self.adstyle = Some(adstyle.into());
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_slant(mut self, slant: Slant) -> Self {
        self.slant = Some(slant);
        self
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_pixel_size(mut self, pixels: u32) -> Self {
        self.size = Some(FontSize::Pixels(pixels));
        self
    }

    pub fn with_point_size(mut self, points: f32) -> Self {
        self.size = Some(FontSize::Points(points));
        self
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Adds an extra constraint, replacing an earlier one of the same kind
    pub fn with_extra(mut self, extra: Extra) -> Self {
        let kind = std::mem::discriminant(&extra);
        self.extra.retain(|e| match (e, &extra) {
            (Extra::Other { key: a, .. }, Extra::Other { key: b, .. }) => a != b,
            _ => std::mem::discriminant(e) != kind,
        });
        self.extra.push(extra);
        self
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_extra(Extra::Name(name.into()))
    }

    pub fn with_lang(self, langs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.with_extra(Extra::Lang(langs.into_iter().map(Into::into).collect()))
    }

    pub fn with_script(self, script: impl Into<String>) -> Self {
        self.with_extra(Extra::Script(script.into()))
    }

    pub fn with_otf(self, otf: OtfSpec) -> Self {
        self.with_extra(Extra::Otf(otf))
    }

    /// Pixel size at `dpi`, `None` when no size (or size zero) was requested
    pub fn pixel_size(&self, dpi: f32) -> Option<u32> {
        let dpi = self.dpi().map(|d| d as f32).unwrap_or(dpi);
        self.size
            .map(|size| size.to_pixels(dpi))
            .filter(|&px| px > 0)
    }

    pub fn name(&self) -> Option<&str> {
        self.extra.iter().find_map(|e| match e {
            Extra::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn langs(&self) -> &[String] {
        self.extra
            .iter()
            .find_map(|e| match e {
                Extra::Lang(langs) => Some(langs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn script(&self) -> Option<&str> {
        self.extra.iter().find_map(|e| match e {
            Extra::Script(script) => Some(script.as_str()),
            _ => None,
        })
    }

    pub fn otf(&self) -> Option<&OtfSpec> {
        self.extra.iter().find_map(|e| match e {
            Extra::Otf(otf) => Some(otf),
            _ => None,
        })
    }

    pub fn dpi(&self) -> Option<u32> {
        self.extra.iter().find_map(|e| match e {
            Extra::Dpi(dpi) => Some(*dpi),
            _ => None,
        })
    }

    /// The registry requested, defaulting to the Unicode BMP
    pub fn registry_or_default(&self) -> Registry {
        self.registry.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let spec = FontSpec::family("Courier")
            .with_pixel_size(12)
            .with_registry(Registry::Iso8859_1)
            .with_weight(Weight::BOLD);
        assert_eq!(spec.family.as_deref(), Some("Courier"));
        assert_eq!(spec.pixel_size(96.0), Some(12));
        assert_eq!(spec.registry_or_default(), Registry::Iso8859_1);
        assert_eq!(FontSpec::new().registry_or_default(), Registry::UnicodeBmp);
    }

    #[test]
    fn zero_size_means_any() {
        assert_eq!(FontSpec::new().with_pixel_size(0).pixel_size(96.0), None);
        assert_eq!(FontSpec::new().pixel_size(96.0), None);
    }

    #[test]
    fn dpi_extra_overrides_display_resolution() {
        let spec = FontSpec::new()
            .with_point_size(12.0)
            .with_extra(Extra::Dpi(72));
        assert_eq!(spec.pixel_size(96.0), Some(12));
    }

    #[test]
    fn extras_replace_same_kind() {
        let spec = FontSpec::new()
            .with_name("Sans-10")
            .with_script("greek")
            .with_name("Mono-12");
        assert_eq!(spec.extra.len(), 2);
        assert_eq!(spec.name(), Some("Mono-12"));
        assert_eq!(spec.script(), Some("greek"));
    }

    #[test]
    fn other_extras_are_keyed() {
        let spec = FontSpec::new()
            .with_extra(Extra::Other {
                key: "a".into(),
                value: "1".into(),
            })
            .with_extra(Extra::Other {
                key: "b".into(),
                value: "2".into(),
            });
        assert_eq!(spec.extra.len(), 2);
    }
}
