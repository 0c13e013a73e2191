// this_file: crates/fontres-core/src/otf.rs

//! OpenType layout capability of an open font

use crate::props::{OtfFeature, OtfSpec, OtfTag};

/// Features reachable from one language system of a script
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtfLangSys {
    /// `None` for the script's default language system
    pub tag: Option<OtfTag>,
    pub features: Vec<OtfTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtfScript {
    pub tag: OtfTag,
    pub langsys: Vec<OtfLangSys>,
}

/// GSUB and GPOS script lists of a font
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtfCapability {
    pub gsub: Vec<OtfScript>,
    pub gpos: Vec<OtfScript>,
}

impl OtfCapability {
    pub fn is_empty(&self) -> bool {
        self.gsub.is_empty() && self.gpos.is_empty()
    }

    /// Whether the font's layout tables can serve `spec`
    ///
    /// The script (`DFLT` when none is named) must exist in the table of
    /// every requested feature list. Enabled features must be present and
    /// disabled ones absent in the selected language system. With no
    /// features at all, the script only has to appear in one table.
    pub fn satisfies(&self, spec: &OtfSpec) -> bool {
        let script = spec.script.unwrap_or(OtfTag::DEFAULT_SCRIPT);
        if spec.gsub.is_empty() && spec.gpos.is_empty() {
            return self.scripts().any(|tag| tag == script);
        }
        (spec.gsub.is_empty() || table_satisfies(&self.gsub, script, spec.langsys, &spec.gsub))
            && (spec.gpos.is_empty()
                || table_satisfies(&self.gpos, script, spec.langsys, &spec.gpos))
    }

    pub fn scripts(&self) -> impl Iterator<Item = OtfTag> + '_ {
        let mut seen = Vec::new();
        self.gsub
            .iter()
            .chain(self.gpos.iter())
            .map(|s| s.tag)
            .filter(move |tag| {
                if seen.contains(tag) {
                    false
                } else {
                    seen.push(*tag);
                    true
                }
            })
    }
}

fn table_satisfies(
    scripts: &[OtfScript],
    script: OtfTag,
    langsys: Option<OtfTag>,
    features: &[OtfFeature],
) -> bool {
    let Some(entry) = scripts.iter().find(|s| s.tag == script) else {
        return false;
    };
    let lang = entry
        .langsys
        .iter()
        .find(|l| langsys.is_some() && l.tag == langsys)
        .or_else(|| entry.langsys.iter().find(|l| l.tag.is_none()));
    match lang {
        Some(lang) => features
            .iter()
            .all(|f| lang.features.contains(&f.tag) == f.enabled),
        None => features.iter().all(|f| !f.enabled),
    }
}
