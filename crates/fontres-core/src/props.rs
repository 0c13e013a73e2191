// this_file: crates/fontres-core/src/props.rs

//! Font properties shared by specs and entities
//!
//! Numeric style values use the fontconfig scale, except that slant is
//! stored with a +100 offset so that roman is 100 and the regular weight
//! is folded onto 100. Symbolic names convert both ways.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ParseError;
use crate::PIXEL_SIZE_QUANTUM;

/// Character-set coverage tag of a font, from the XLFD registry-encoding pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Registry {
    Iso8859_1,
    Iso10646_1,
    #[default]
    UnicodeBmp,
    UnicodeSip,
    Other(String),
}

impl Registry {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "iso8859-1" | "iso-8859-1" | "latin-1" => Registry::Iso8859_1,
            "iso10646-1" | "iso10646" => Registry::Iso10646_1,
            "unicode-bmp" => Registry::UnicodeBmp,
            "unicode-sip" => Registry::UnicodeSip,
            other => Registry::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Registry::Iso8859_1 => "iso8859-1",
            Registry::Iso10646_1 => "iso10646-1",
            Registry::UnicodeBmp => "unicode-bmp",
            Registry::UnicodeSip => "unicode-sip",
            Registry::Other(name) => name,
        }
    }

    /// Registries whose code points are Unicode scalar values
    pub fn is_unicode(&self) -> bool {
        matches!(
            self,
            Registry::Iso10646_1 | Registry::UnicodeBmp | Registry::UnicodeSip
        )
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Registry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Registry::parse(s))
    }
}

/// Stroke weight on the fontconfig scale, regular folded onto 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weight(pub u16);

impl Weight {
    pub const THIN: Weight = Weight(0);
    pub const EXTRA_LIGHT: Weight = Weight(40);
    pub const LIGHT: Weight = Weight(50);
    pub const SEMI_LIGHT: Weight = Weight(55);
    pub const BOOK: Weight = Weight(75);
    pub const REGULAR: Weight = Weight(100);
    pub const DEMI_BOLD: Weight = Weight(180);
    pub const BOLD: Weight = Weight(200);
    pub const EXTRA_BOLD: Weight = Weight(205);
    pub const BLACK: Weight = Weight(210);

    const NAMES: &'static [(&'static str, Weight)] = &[
        ("thin", Weight::THIN),
        ("extralight", Weight::EXTRA_LIGHT),
        ("ultralight", Weight::EXTRA_LIGHT),
        ("light", Weight::LIGHT),
        ("semilight", Weight::SEMI_LIGHT),
        ("demilight", Weight::SEMI_LIGHT),
        ("book", Weight::BOOK),
        ("regular", Weight::REGULAR),
        ("normal", Weight::REGULAR),
        ("medium", Weight::REGULAR),
        ("demibold", Weight::DEMI_BOLD),
        ("semibold", Weight::DEMI_BOLD),
        ("bold", Weight::BOLD),
        ("extrabold", Weight::EXTRA_BOLD),
        ("ultrabold", Weight::EXTRA_BOLD),
        ("black", Weight::BLACK),
        ("heavy", Weight::BLACK),
    ];

    pub fn from_name(name: &str) -> Option<Weight> {
        let name = normalize_style_name(name);
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, w)| *w)
    }

    pub fn name(self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(_, w)| *w == self)
            .map(|(n, _)| *n)
    }

    /// Converts an OpenType `usWeightClass` (100..=900)
    pub fn from_opentype(class: u16) -> Weight {
        match class {
            0..=149 => Weight::THIN,
            150..=249 => Weight::EXTRA_LIGHT,
            250..=324 => Weight::LIGHT,
            325..=364 => Weight::SEMI_LIGHT,
            365..=389 => Weight::BOOK,
            390..=549 => Weight::REGULAR,
            550..=649 => Weight::DEMI_BOLD,
            650..=749 => Weight::BOLD,
            750..=849 => Weight::EXTRA_BOLD,
            _ => Weight::BLACK,
        }
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::REGULAR
    }
}

/// Slant as fontconfig slant + 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slant(pub u16);

impl Slant {
    pub const ROMAN: Slant = Slant(100);
    pub const ITALIC: Slant = Slant(200);
    pub const OBLIQUE: Slant = Slant(210);

    pub fn from_name(name: &str) -> Option<Slant> {
        match normalize_style_name(name).as_str() {
            "roman" | "normal" | "upright" | "r" => Some(Slant::ROMAN),
            "italic" | "i" => Some(Slant::ITALIC),
            "oblique" | "o" => Some(Slant::OBLIQUE),
            _ => None,
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Slant::ROMAN => Some("roman"),
            Slant::ITALIC => Some("italic"),
            Slant::OBLIQUE => Some("oblique"),
            _ => None,
        }
    }

    /// Converts a raw fontconfig slant value
    pub fn from_fontconfig(value: u16) -> Slant {
        Slant(value + 100)
    }
}

impl Default for Slant {
    fn default() -> Self {
        Slant::ROMAN
    }
}

/// Set width on the fontconfig scale (normal = 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Width(pub u16);

impl Width {
    pub const ULTRA_CONDENSED: Width = Width(50);
    pub const EXTRA_CONDENSED: Width = Width(63);
    pub const CONDENSED: Width = Width(75);
    pub const SEMI_CONDENSED: Width = Width(87);
    pub const NORMAL: Width = Width(100);
    pub const SEMI_EXPANDED: Width = Width(113);
    pub const EXPANDED: Width = Width(125);
    pub const EXTRA_EXPANDED: Width = Width(150);
    pub const ULTRA_EXPANDED: Width = Width(200);

    const NAMES: &'static [(&'static str, Width)] = &[
        ("ultracondensed", Width::ULTRA_CONDENSED),
        ("extracondensed", Width::EXTRA_CONDENSED),
        ("condensed", Width::CONDENSED),
        ("semicondensed", Width::SEMI_CONDENSED),
        ("normal", Width::NORMAL),
        ("medium", Width::NORMAL),
        ("semiexpanded", Width::SEMI_EXPANDED),
        ("expanded", Width::EXPANDED),
        ("extraexpanded", Width::EXTRA_EXPANDED),
        ("ultraexpanded", Width::ULTRA_EXPANDED),
    ];

    pub fn from_name(name: &str) -> Option<Width> {
        let name = normalize_style_name(name);
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, w)| *w)
    }

    pub fn name(self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(_, w)| *w == self)
            .map(|(n, _)| *n)
    }

    /// Converts an OpenType `usWidthClass` (1..=9)
    pub fn from_opentype(class: u16) -> Width {
        match class {
            0 | 1 => Width::ULTRA_CONDENSED,
            2 => Width::EXTRA_CONDENSED,
            3 => Width::CONDENSED,
            4 => Width::SEMI_CONDENSED,
            5 => Width::NORMAL,
            6 => Width::SEMI_EXPANDED,
            7 => Width::EXPANDED,
            8 => Width::EXTRA_EXPANDED,
            _ => Width::ULTRA_EXPANDED,
        }
    }
}

impl Default for Width {
    fn default() -> Self {
        Width::NORMAL
    }
}

fn normalize_style_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Character spacing class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Spacing {
    #[default]
    Proportional,
    Dual,
    Mono,
    Charcell,
}

impl Spacing {
    pub fn value(self) -> u16 {
        match self {
            Spacing::Proportional => 0,
            Spacing::Dual => 90,
            Spacing::Mono => 100,
            Spacing::Charcell => 110,
        }
    }

    pub fn from_value(value: u16) -> Option<Spacing> {
        match value {
            0 => Some(Spacing::Proportional),
            90 => Some(Spacing::Dual),
            100 => Some(Spacing::Mono),
            110 => Some(Spacing::Charcell),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Spacing> {
        match name.trim().to_ascii_lowercase().as_str() {
            "proportional" | "p" => Some(Spacing::Proportional),
            "dual" | "d" => Some(Spacing::Dual),
            "mono" | "m" => Some(Spacing::Mono),
            "charcell" | "c" => Some(Spacing::Charcell),
            other => other.parse().ok().and_then(Spacing::from_value),
        }
    }

    /// Everything except proportional has one advance for all glyphs
    pub fn is_fixed(self) -> bool {
        !matches!(self, Spacing::Proportional)
    }
}

/// Requested size: whole pixels or (fractional) points
#[derive(Debug, Clone, Copy)]
pub enum FontSize {
    Pixels(u32),
    Points(f32),
}

impl FontSize {
    /// Resolves to pixels at `dpi`; zero means "any size"
    pub fn to_pixels(self, dpi: f32) -> u32 {
        match self {
            FontSize::Pixels(px) => px,
            FontSize::Points(pt) => {
                let px = (pt * dpi / 72.0).round().max(0.0) as u32;
                px - px % PIXEL_SIZE_QUANTUM
            }
        }
    }

    pub fn is_any(self) -> bool {
        match self {
            FontSize::Pixels(px) => px == 0,
            FontSize::Points(pt) => pt <= 0.0,
        }
    }
}

impl PartialEq for FontSize {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FontSize::Pixels(a), FontSize::Pixels(b)) => a == b,
            (FontSize::Points(a), FontSize::Points(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for FontSize {}

impl Hash for FontSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            FontSize::Pixels(px) => {
                0u8.hash(state);
                px.hash(state);
            }
            FontSize::Points(pt) => {
                1u8.hash(state);
                pt.to_bits().hash(state);
            }
        }
    }
}

/// Four-byte OpenType tag (script, language system or feature)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OtfTag(pub [u8; 4]);

impl OtfTag {
    pub const DEFAULT_SCRIPT: OtfTag = OtfTag(*b"DFLT");

    pub const fn new(bytes: &[u8; 4]) -> Self {
        OtfTag(*bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// `DFLT`, the script every layout table may fall back to
impl Default for OtfTag {
    fn default() -> Self {
        OtfTag::DEFAULT_SCRIPT
    }
}

impl FromStr for OtfTag {
    type Err = ParseError;

    /// Short tags are padded with spaces, as in `"ss1"` → `"ss1 "`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !s.is_ascii() {
            return Err(ParseError::InvalidTag(s.to_string()));
        }
        let mut tag = [b' '; 4];
        tag[..bytes.len()].copy_from_slice(bytes);
        Ok(OtfTag(tag))
    }
}

impl fmt::Display for OtfTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for OtfTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OtfTag({self})")
    }
}

/// A requested OpenType feature; `~tag` turns it off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OtfFeature {
    pub tag: OtfTag,
    pub enabled: bool,
}

/// OpenType layout requirements: `script[.langsys][=gsub,...][+gpos,...]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OtfSpec {
    pub script: Option<OtfTag>,
    pub langsys: Option<OtfTag>,
    pub gsub: Vec<OtfFeature>,
    pub gpos: Vec<OtfFeature>,
}

impl OtfSpec {
    fn parse_features(list: &str) -> Result<Vec<OtfFeature>, ParseError> {
        list.split(',')
            .filter(|s| !s.is_empty())
            .map(|item| {
                let (enabled, name) = match item.strip_prefix('~') {
                    Some(rest) => (false, rest),
                    None => (true, item),
                };
                Ok(OtfFeature {
                    tag: name.parse()?,
                    enabled,
                })
            })
            .collect()
    }
}

impl FromStr for OtfSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, gpos) = match s.split_once('+') {
            Some((head, gpos)) => (head, Some(gpos)),
            None => (s, None),
        };
        let (head, gsub) = match head.split_once('=') {
            Some((head, gsub)) => (head, Some(gsub)),
            None => (head, None),
        };
        let (script, langsys) = match head.split_once('.') {
            Some((script, langsys)) => (script, Some(langsys)),
            None => (head, None),
        };
        Ok(OtfSpec {
            script: (!script.is_empty()).then(|| script.parse()).transpose()?,
            langsys: langsys
                .filter(|l| !l.is_empty())
                .map(str::parse)
                .transpose()?,
            gsub: gsub.map(Self::parse_features).transpose()?.unwrap_or_default(),
            gpos: gpos.map(Self::parse_features).transpose()?.unwrap_or_default(),
        })
    }
}

/// Auxiliary constraints carried in a spec's extra list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Extra {
    Otf(OtfSpec),
    /// Language tags whose characters the font must cover
    Lang(Vec<String>),
    /// A literal font name in fontconfig syntax
    Name(String),
    /// Script symbol such as `cyrillic` or `han`
    Script(String),
    Dpi(u32),
    Other { key: String, value: String },
}
