// this_file: crates/fontres-core/src/coverage.rs

//! Character coverage
//!
//! A [`Repertory`] is the set of code points a face maps to glyphs. The
//! tables below give representative characters for registries, scripts and
//! languages; a font "covers" a script when it maps all of them.

use crate::props::Registry;

/// Sorted, non-overlapping inclusive code point ranges
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Repertory {
    ranges: Vec<(u32, u32)>,
}

impl Repertory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from code points in any order; duplicates are fine
    pub fn from_codepoints(points: impl IntoIterator<Item = u32>) -> Self {
        let mut points: Vec<u32> = points.into_iter().collect();
        points.sort_unstable();
        points.dedup();

        let mut ranges: Vec<(u32, u32)> = Vec::new();
        for cp in points {
            match ranges.last_mut() {
                Some((_, end)) if end.checked_add(1) == Some(cp) => *end = cp,
                _ => ranges.push((cp, cp)),
            }
        }
        Self { ranges }
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self::from_codepoints(ranges.into_iter().flat_map(|(lo, hi)| lo..=hi))
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    std::cmp::Ordering::Less
                } else if lo > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn covers(&self, points: impl IntoIterator<Item = u32>) -> bool {
        points.into_iter().all(|cp| self.contains(cp))
    }

    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|(lo, hi)| (hi - lo + 1) as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }
}

/// The basic ISO-8859-1 set: printable ASCII and the Latin-1 letters
pub fn iso8859_1_basic() -> impl Iterator<Item = u32> + Clone {
    (0x20..0x7F).chain(0xC0..0x100)
}

/// Code points a font must map to serve `registry`, `None` when any font does
pub fn registry_chars(registry: &Registry) -> Option<Vec<u32>> {
    match registry {
        Registry::Iso8859_1 => Some(iso8859_1_basic().collect()),
        _ => None,
    }
}

const SCRIPT_CHARS: &[(&str, &[u32])] = &[
    ("latin", &[0x41, 0x61, 0xC0]),
    ("greek", &[0x3A9, 0x3B1]),
    ("cyrillic", &[0x42F, 0x44F]),
    ("armenian", &[0x531]),
    ("hebrew", &[0x5D0]),
    ("arabic", &[0x628]),
    ("syriac", &[0x710]),
    ("thaana", &[0x78C]),
    ("devanagari", &[0x915]),
    ("bengali", &[0x995]),
    ("gurmukhi", &[0xA15]),
    ("gujarati", &[0xA95]),
    ("oriya", &[0xB15]),
    ("tamil", &[0xB95]),
    ("telugu", &[0xC15]),
    ("kannada", &[0xC95]),
    ("malayalam", &[0xD15]),
    ("sinhala", &[0xD95]),
    ("thai", &[0xE17]),
    ("lao", &[0xEA5]),
    ("tibetan", &[0xF40]),
    ("myanmar", &[0x1000]),
    ("georgian", &[0x10D3]),
    ("hangul", &[0xD55C]),
    ("ethiopic", &[0x1208]),
    ("cherokee", &[0x13B6]),
    ("khmer", &[0x1780]),
    ("mongolian", &[0x1826]),
    ("kana", &[0x304B]),
    ("han", &[0x5B57]),
    ("symbol", &[0x201C, 0x2200, 0x2500]),
];

/// Representative characters of a script symbol
pub fn script_chars(script: &str) -> Option<&'static [u32]> {
    let script = script.to_ascii_lowercase();
    SCRIPT_CHARS
        .iter()
        .find(|(name, _)| *name == script)
        .map(|(_, chars)| *chars)
}

const LANG_SCRIPTS: &[(&str, &str)] = &[
    ("en", "latin"),
    ("fr", "latin"),
    ("de", "latin"),
    ("es", "latin"),
    ("it", "latin"),
    ("pt", "latin"),
    ("el", "greek"),
    ("ru", "cyrillic"),
    ("uk", "cyrillic"),
    ("bg", "cyrillic"),
    ("sr", "cyrillic"),
    ("hy", "armenian"),
    ("he", "hebrew"),
    ("ar", "arabic"),
    ("fa", "arabic"),
    ("hi", "devanagari"),
    ("bn", "bengali"),
    ("ta", "tamil"),
    ("th", "thai"),
    ("ka", "georgian"),
    ("km", "khmer"),
    ("ja", "kana"),
    ("ko", "hangul"),
    ("zh", "han"),
];

/// Representative characters for a language tag such as `ja` or `zh-cn`
pub fn lang_chars(lang: &str) -> Option<&'static [u32]> {
    let lang = lang.to_ascii_lowercase();
    let primary = lang.split(['-', '_']).next().unwrap_or_default();
    LANG_SCRIPTS
        .iter()
        .find(|(tag, _)| *tag == primary)
        .and_then(|(_, script)| script_chars(script))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_merge_adjacent_points() {
        let rep = Repertory::from_codepoints([0x43, 0x41, 0x42, 0x45, 0x42]);
        assert_eq!(rep.ranges(), &[(0x41, 0x43), (0x45, 0x45)]);
        assert_eq!(rep.len(), 4);
        assert!(rep.contains(0x42));
        assert!(!rep.contains(0x44));
        assert!(!rep.contains(0x46));
    }

    #[test]
    fn empty_repertory_contains_nothing() {
        let rep = Repertory::new();
        assert!(rep.is_empty());
        assert!(!rep.contains(0x20));
        assert!(rep.covers([]));
    }

    #[test]
    fn iso8859_1_basic_set() {
        let chars: Vec<u32> = iso8859_1_basic().collect();
        assert_eq!(chars.len(), 95 + 64);
        assert!(chars.contains(&0x7E));
        assert!(!chars.contains(&0x7F));
        assert!(!chars.contains(&0xA0));
        assert!(chars.contains(&0xFF));
        let latin1 = Repertory::from_ranges([(0x20, 0x7E), (0xA0, 0xFF)]);
        assert!(latin1.covers(iso8859_1_basic()));
    }

    #[test]
    fn registry_chars_only_for_latin1() {
        assert!(registry_chars(&Registry::Iso8859_1).is_some());
        assert!(registry_chars(&Registry::UnicodeBmp).is_none());
    }

    #[test]
    fn lang_tags_resolve_through_scripts() {
        assert_eq!(lang_chars("ja"), script_chars("kana"));
        assert_eq!(lang_chars("zh-CN"), script_chars("han"));
        assert_eq!(lang_chars("tlh"), None);
        assert_eq!(script_chars("Cyrillic"), Some(&[0x42F, 0x44F][..]));
    }
}
