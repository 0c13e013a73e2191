// this_file: backends/fontres-sfnt/src/probe.rs

//! Facts about a face that need its tables
//!
//! Discovery only reads the name and OS/2 basics. Matching on foundry,
//! coverage or OpenType features needs more, so each face is probed once on
//! first use and the result kept with the driver.

use std::sync::Arc;

use fontres_core::{OtfCapability, OtfLangSys, OtfScript, OtfTag, Repertory};
use read_fonts::tables::layout::{FeatureList, ScriptList};
use read_fonts::types::Tag;
use read_fonts::{FontRef, TableProvider};
use skrifa::MetadataProvider;

use crate::face::SharedFace;

#[derive(Debug, Clone, Default)]
pub struct FaceProbe {
    /// OS/2 vendor id, trimmed
    pub foundry: Option<String>,
    pub repertory: Arc<Repertory>,
    pub otf: OtfCapability,
}

impl FaceProbe {
    pub fn of(face: &SharedFace) -> Self {
        match face.font() {
            Some(font) => Self::of_font(&font),
            None => Self::default(),
        }
    }

    pub fn of_font(font: &FontRef<'_>) -> Self {
        let foundry = font
            .os2()
            .ok()
            .map(|os2| tag_string(os2.ach_vend_id()))
            .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_graphic()));

        let repertory = Repertory::from_codepoints(font.charmap().mappings().map(|(cp, _)| cp));

        Self {
            foundry,
            repertory: Arc::new(repertory),
            otf: otf_capability(font),
        }
    }
}

fn tag_string(tag: Tag) -> String {
    tag.to_be_bytes()
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Script, language system and feature lists of GSUB and GPOS
pub fn otf_capability(font: &FontRef<'_>) -> OtfCapability {
    let gsub = font
        .gsub()
        .ok()
        .and_then(|t| Some(layout_scripts(&t.script_list().ok()?, &t.feature_list().ok()?)))
        .unwrap_or_default();
    let gpos = font
        .gpos()
        .ok()
        .and_then(|t| Some(layout_scripts(&t.script_list().ok()?, &t.feature_list().ok()?)))
        .unwrap_or_default();
    OtfCapability { gsub, gpos }
}

fn layout_scripts(scripts: &ScriptList<'_>, features: &FeatureList<'_>) -> Vec<OtfScript> {
    let feature_tags: Vec<OtfTag> = features
        .feature_records()
        .iter()
        .map(|r| OtfTag(r.feature_tag().to_be_bytes()))
        .collect();
    let features_of = |indices: &[read_fonts::types::BigEndian<u16>]| -> Vec<OtfTag> {
        let mut tags: Vec<OtfTag> = indices
            .iter()
            .filter_map(|i| feature_tags.get(i.get() as usize).copied())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    };

    scripts
        .script_records()
        .iter()
        .filter_map(|record| {
            let script = record.script(scripts.offset_data()).ok()?;
            let mut langsys = Vec::new();
            if let Some(Ok(default)) = script.default_lang_sys() {
                langsys.push(OtfLangSys {
                    tag: None,
                    features: features_of(default.feature_indices()),
                });
            }
            for lang in script.lang_sys_records() {
                if let Ok(sys) = lang.lang_sys(script.offset_data()) {
                    langsys.push(OtfLangSys {
                        tag: Some(OtfTag(lang.lang_sys_tag().to_be_bytes())),
                        features: features_of(sys.feature_indices()),
                    });
                }
            }
            Some(OtfScript {
                tag: OtfTag(record.script_tag().to_be_bytes()),
                langsys,
            })
        })
        .collect()
}
