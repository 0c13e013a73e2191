// this_file: crates/fontres-core/src/pattern.rs

//! Backend-neutral query patterns and fontconfig-style font names
//!
//! Drivers turn a [`FontSpec`] into a [`Pattern`] before enumerating their
//! fonts. Unset fields stay wildcards. A literal name in the spec's extra
//! list is parsed with [`parse_font_name`] and contributes its style
//! properties, while its family and size are ignored for listing; explicit
//! spec fields override whatever the name says.

use crate::coverage::{lang_chars, registry_chars, script_chars, Repertory};
use crate::error::ParseError;
use crate::otf::OtfCapability;
use crate::props::{FontSize, OtfSpec, Slant, Spacing, Weight, Width};
use crate::spec::FontSpec;

/// A parsed font name such as `DejaVu Sans Mono-12:weight=bold:italic`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontName {
    pub families: Vec<String>,
    /// Point size
    pub size: Option<f32>,
    pub pixel_size: Option<f32>,
    pub foundry: Option<String>,
    pub weight: Option<Weight>,
    pub slant: Option<Slant>,
    pub width: Option<Width>,
    pub spacing: Option<Spacing>,
    pub style: Option<String>,
    pub langs: Vec<String>,
    pub dpi: Option<f32>,
    pub other: Vec<(String, String)>,
}

impl FontName {
    /// The request this name describes on its own
    pub fn to_spec(&self) -> FontSpec {
        let mut spec = FontSpec::new();
        spec.family = self.families.first().cloned();
        spec.foundry = self.foundry.clone();
        spec.weight = self.weight;
        spec.slant = self.slant;
        spec.width = self.width;
        spec.spacing = self.spacing;
        spec.size = match (self.pixel_size, self.size) {
            (Some(px), _) => Some(FontSize::Pixels(px.round().max(0.0) as u32)),
            (None, Some(pt)) => Some(FontSize::Points(pt)),
            (None, None) => None,
        };
        if !self.langs.is_empty() {
            spec = spec.with_lang(self.langs.iter().cloned());
        }
        if let Some(dpi) = self.dpi {
            spec = spec.with_extra(crate::props::Extra::Dpi(dpi.round() as u32));
        }
        spec
    }
}

/// Splits on `sep` unless preceded by a backslash, removing the escapes
fn split_escaped(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c == sep => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Byte index of the last `-` not preceded by a backslash
fn last_unescaped_dash(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'-' && (i == 0 || bytes[i - 1] != b'\\'))
}

fn parse_number(key: &str, value: &str) -> Result<f32, ParseError> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| ParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn invalid(key: &str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_weight(value: &str) -> Result<Weight, ParseError> {
    if let Some(weight) = Weight::from_name(value) {
        return Ok(weight);
    }
    match parse_number("weight", value)? as u16 {
        80 => Ok(Weight::REGULAR),
        n => Ok(Weight(n)),
    }
}

fn parse_slant(value: &str) -> Result<Slant, ParseError> {
    match Slant::from_name(value) {
        Some(slant) => Ok(slant),
        None => Ok(Slant::from_fontconfig(parse_number("slant", value)? as u16)),
    }
}

fn parse_width(value: &str) -> Result<Width, ParseError> {
    match Width::from_name(value) {
        Some(width) => Ok(width),
        None => Ok(Width(parse_number("width", value)? as u16)),
    }
}

/// Parses the fontconfig name syntax
///
/// `families[-sizes][:key=value|:constant]...`; `\` escapes `-`, `:` and `,`.
pub fn parse_font_name(text: &str) -> Result<FontName, ParseError> {
    let mut segments = split_escaped_keep(text, ':').into_iter();
    let mut name = FontName::default();

    let head = segments.next().unwrap_or_default();
    let (families, sizes) = match last_unescaped_dash(&head) {
        Some(i) if head[i + 1..].split(',').all(|s| s.trim().parse::<f32>().is_ok()) => {
            (head[..i].to_string(), Some(head[i + 1..].to_string()))
        }
        _ => (head, None),
    };
    name.families = split_escaped(&families, ',')
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if let Some(sizes) = sizes {
        let first = sizes.split(',').next().unwrap_or_default();
        name.size = Some(
            first
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidSize(sizes.clone()))?,
        );
    }

    for segment in segments {
        let segment = unescape(&segment);
        if segment.is_empty() {
            continue;
        }
        match segment.split_once('=') {
            Some((key, value)) => apply_property(&mut name, key.trim(), value.trim())?,
            None => apply_constant(&mut name, segment.trim())?,
        }
    }
    Ok(name)
}

/// Like [`split_escaped`] but keeps escapes for the next splitting pass
fn split_escaped_keep(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c == sep => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn apply_property(name: &mut FontName, key: &str, value: &str) -> Result<(), ParseError> {
    let first = value.split(',').next().unwrap_or_default();
    match key.to_ascii_lowercase().as_str() {
        "family" => {
            name.families = value.split(',').map(|f| f.trim().to_string()).collect();
        }
        "foundry" => name.foundry = Some(first.to_string()),
        "weight" => name.weight = Some(parse_weight(first)?),
        "slant" => name.slant = Some(parse_slant(first)?),
        "width" => name.width = Some(parse_width(first)?),
        "spacing" => {
            name.spacing = Some(Spacing::from_name(first).ok_or_else(|| invalid(key, value))?)
        }
        "size" => name.size = Some(parse_number(key, first)?),
        "pixelsize" => name.pixel_size = Some(parse_number(key, first)?),
        "dpi" => name.dpi = Some(parse_number(key, first)?),
        "style" => name.style = Some(first.to_string()),
        "lang" => {
            name.langs = value
                .split(['|', ','])
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }
        _ => name.other.push((key.to_string(), value.to_string())),
    }
    Ok(())
}

fn apply_constant(name: &mut FontName, constant: &str) -> Result<(), ParseError> {
    if let Some(weight) = Weight::from_name(constant) {
        name.weight = Some(weight);
    } else if let Some(slant) = Slant::from_name(constant) {
        name.slant = Some(slant);
    } else if let Some(width) = Width::from_name(constant) {
        name.width = Some(width);
    } else if let Some(spacing) = Spacing::from_name(constant) {
        name.spacing = Some(spacing);
    } else {
        return Err(invalid("constant", constant));
    }
    Ok(())
}

/// A backend-neutral query built from a [`FontSpec`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pattern {
    /// A candidate must carry one of these family names
    pub families: Vec<String>,
    pub foundry: Option<String>,
    pub weight: Option<Weight>,
    pub slant: Option<Slant>,
    pub width: Option<Width>,
    pub spacing: Option<Spacing>,
    pub style: Option<String>,
    pub pixel_size: Option<u32>,
    /// Code points the font must map
    pub required_chars: Vec<u32>,
    pub otf: Option<OtfSpec>,
}

impl Pattern {
    /// Builds the query for `spec`, resolving point sizes at `dpi`
    ///
    /// Language and script constraints that have no known character table
    /// are dropped. The registry's basic charset takes precedence over the
    /// script's representative characters.
    pub fn from_spec(spec: &FontSpec, dpi: f32) -> Result<Pattern, ParseError> {
        let mut pattern = Pattern::default();

        if let Some(text) = spec.name() {
            let name = parse_font_name(text)?;
            pattern.foundry = name.foundry;
            pattern.weight = name.weight;
            pattern.slant = name.slant;
            pattern.width = name.width;
            pattern.spacing = name.spacing;
            pattern.style = name.style;
            for lang in &name.langs {
                pattern.add_lang(lang);
            }
        }

        if let Some(foundry) = &spec.foundry {
            pattern.foundry = Some(foundry.clone());
        }
        if let Some(family) = &spec.family {
            pattern.families = vec![family.clone()];
        }
        pattern.weight = spec.weight.or(pattern.weight);
        pattern.slant = spec.slant.or(pattern.slant);
        pattern.width = spec.width.or(pattern.width);
        pattern.spacing = spec.spacing.or(pattern.spacing);
        pattern.pixel_size = spec.pixel_size(dpi);

        let registry_set = spec
            .registry
            .as_ref()
            .and_then(registry_chars)
            .map(|chars| pattern.require(chars))
            .is_some();

        for lang in spec.langs() {
            pattern.add_lang(lang);
        }

        if let Some(script) = spec.script() {
            if !registry_set {
                match script_chars(script) {
                    Some(chars) => pattern.require(chars.iter().copied()),
                    None => log::debug!("dropping untranslatable script constraint {script}"),
                }
            }
        }

        pattern.otf = spec.otf().cloned();
        Ok(pattern)
    }

    fn add_lang(&mut self, lang: &str) {
        match lang_chars(lang) {
            Some(chars) => self.require(chars.iter().copied()),
            None => log::debug!("dropping language constraint {lang} with no known coverage"),
        }
    }

    fn require(&mut self, chars: impl IntoIterator<Item = u32>) {
        for cp in chars {
            if !self.required_chars.contains(&cp) {
                self.required_chars.push(cp);
            }
        }
    }

    pub fn accepts_family<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.families.is_empty()
            || self.families.iter().any(|wanted| {
                names
                    .iter()
                    .any(|name| name.as_ref().eq_ignore_ascii_case(wanted))
            })
    }

    pub fn accepts_foundry(&self, foundry: Option<&str>) -> bool {
        match (&self.foundry, foundry) {
            (None, _) => true,
            (Some(wanted), Some(found)) => wanted.eq_ignore_ascii_case(found.trim()),
            (Some(_), None) => false,
        }
    }

    pub fn accepts_style(&self, weight: Weight, slant: Slant, width: Width) -> bool {
        self.weight.map_or(true, |w| w == weight)
            && self.slant.map_or(true, |s| s == slant)
            && self.width.map_or(true, |w| w == width)
    }

    pub fn accepts_spacing(&self, spacing: Spacing) -> bool {
        self.spacing.map_or(true, |s| s == spacing)
    }

    /// Whether accepting a candidate needs its character repertory
    pub fn needs_repertory(&self) -> bool {
        !self.required_chars.is_empty()
    }

    pub fn accepts_repertory(&self, repertory: &Repertory) -> bool {
        repertory.covers(self.required_chars.iter().copied())
    }

    pub fn accepts_otf(&self, capability: &OtfCapability) -> bool {
        self.otf.as_ref().map_or(true, |otf| capability.satisfies(otf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{Extra, Registry};

    #[test]
    fn parses_family_and_size() {
        let name = parse_font_name("DejaVu Sans Mono-12").expect("valid name");
        assert_eq!(name.families, vec!["DejaVu Sans Mono"]);
        assert_eq!(name.size, Some(12.0));
    }

    #[test]
    fn parses_family_list_and_properties() {
        let name =
            parse_font_name("Courier New,Monaco-10.5:weight=bold:slant=italic:spacing=mono")
                .expect("valid name");
        assert_eq!(name.families, vec!["Courier New", "Monaco"]);
        assert_eq!(name.size, Some(10.5));
        assert_eq!(name.weight, Some(Weight::BOLD));
        assert_eq!(name.slant, Some(Slant::ITALIC));
        assert_eq!(name.spacing, Some(Spacing::Mono));
    }

    #[test]
    fn hyphenated_family_without_size() {
        let name = parse_font_name("Noto-Sans:bold").expect("valid name");
        assert_eq!(name.families, vec!["Noto-Sans"]);
        assert_eq!(name.size, None);
        assert_eq!(name.weight, Some(Weight::BOLD));
    }

    #[test]
    fn escapes_are_honoured() {
        let name = parse_font_name(r"Foo\-12\:x-9").expect("valid name");
        assert_eq!(name.families, vec!["Foo-12:x"]);
        assert_eq!(name.size, Some(9.0));
    }

    #[test]
    fn numeric_fontconfig_values() {
        let name = parse_font_name(":weight=80:slant=100:width=75:pixelsize=14")
            .expect("valid name");
        assert_eq!(name.weight, Some(Weight::REGULAR));
        assert_eq!(name.slant, Some(Slant::ITALIC));
        assert_eq!(name.width, Some(Width::CONDENSED));
        assert_eq!(name.pixel_size, Some(14.0));
        assert!(name.families.is_empty());
    }

    #[test]
    fn unknown_constant_is_an_error() {
        assert!(parse_font_name("Sans:wobbly").is_err());
        assert!(parse_font_name("Sans:weight=heavyish").is_err());
    }

    #[test]
    fn name_to_spec() {
        let spec = parse_font_name("Monaco-12:lang=ja")
            .expect("valid name")
            .to_spec();
        assert_eq!(spec.family.as_deref(), Some("Monaco"));
        assert_eq!(spec.size, Some(FontSize::Points(12.0)));
        assert_eq!(spec.langs(), &["ja".to_string()]);
    }

    #[test]
    fn name_override_ignores_family_and_size() {
        let spec = FontSpec::new()
            .with_name("Monaco-30:bold:italic")
            .with_slant(Slant::ROMAN);
        let pattern = Pattern::from_spec(&spec, 96.0).expect("valid name");
        assert!(pattern.families.is_empty());
        assert_eq!(pattern.pixel_size, None);
        assert_eq!(pattern.weight, Some(Weight::BOLD));
        assert_eq!(pattern.slant, Some(Slant::ROMAN));
    }

    #[test]
    fn registry_charset_beats_script() {
        let spec = FontSpec::new()
            .with_registry(Registry::Iso8859_1)
            .with_script("greek");
        let pattern = Pattern::from_spec(&spec, 96.0).expect("pattern");
        assert!(pattern.required_chars.contains(&0x41));
        assert!(!pattern.required_chars.contains(&0x3B1));
    }

    #[test]
    fn unknown_script_is_dropped() {
        let spec = FontSpec::new().with_script("klingon");
        let pattern = Pattern::from_spec(&spec, 96.0).expect("pattern");
        assert!(!pattern.needs_repertory());
    }

    #[test]
    fn lang_adds_representative_chars() {
        let spec = FontSpec::new().with_lang(["ru"]);
        let pattern = Pattern::from_spec(&spec, 96.0).expect("pattern");
        let cyrillic = Repertory::from_ranges([(0x400, 0x4FF)]);
        assert!(pattern.accepts_repertory(&cyrillic));
        assert!(!pattern.accepts_repertory(&Repertory::from_ranges([(0x20, 0x7E)])));
    }

    #[test]
    fn style_filters() {
        let spec = FontSpec::family("dejavu sans")
            .with_weight(Weight::BOLD)
            .with_extra(Extra::Dpi(72));
        let pattern = Pattern::from_spec(&spec, 96.0).expect("pattern");
        assert!(pattern.accepts_family(&["DejaVu Sans"]));
        assert!(!pattern.accepts_family(&["DejaVu Serif"]));
        assert!(pattern.accepts_style(Weight::BOLD, Slant::ROMAN, Width::NORMAL));
        assert!(!pattern.accepts_style(Weight::REGULAR, Slant::ROMAN, Width::NORMAL));
        assert!(pattern.accepts_foundry(None));
    }
}
