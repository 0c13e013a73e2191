// this_file: backends/fontres-sfnt/src/scan.rs

//! Font discovery
//!
//! Scans system and configured directories once with fontdb and keeps a
//! flat, deterministically ordered list of faces.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use fontdb::{Database, FaceInfo, Family, Source, Style};
use fontres_core::{Config, GenericFamily, Slant, Spacing, Weight, Width};

/// Identity of a face's bytes; opens of the same key share them
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaceKey {
    File { path: PathBuf, index: u32 },
    Memory(fontdb::ID),
}

/// What discovery knows about one face without opening it
#[derive(Debug, Clone)]
pub struct FaceRecord {
    pub id: fontdb::ID,
    pub source: Source,
    pub index: u32,
    /// Family names, the preferred (English) one first
    pub families: Vec<String>,
    pub post_script_name: String,
    pub weight: Weight,
    pub slant: Slant,
    pub width: Width,
    pub spacing: Spacing,
}

impl FaceRecord {
    pub fn from_info(info: &FaceInfo) -> Self {
        Self {
            id: info.id,
            source: info.source.clone(),
            index: info.index,
            families: info.families.iter().map(|(name, _)| name.clone()).collect(),
            post_script_name: info.post_script_name.clone(),
            weight: Weight::from_opentype(info.weight.0),
            slant: match info.style {
                Style::Normal => Slant::ROMAN,
                Style::Italic => Slant::ITALIC,
                Style::Oblique => Slant::OBLIQUE,
            },
            width: Width::from_opentype(info.stretch.to_number()),
            spacing: if info.monospaced {
                Spacing::Mono
            } else {
                Spacing::Proportional
            },
        }
    }

    pub fn family(&self) -> &str {
        self.families
            .first()
            .map(String::as_str)
            .unwrap_or(&self.post_script_name)
    }

    pub fn key(&self) -> FaceKey {
        match &self.source {
            Source::File(path) | Source::SharedFile(path, _) => FaceKey::File {
                path: path.clone(),
                index: self.index,
            },
            Source::Binary(_) => FaceKey::Memory(self.id),
        }
    }

    /// Human-readable location for messages
    pub fn origin(&self) -> String {
        match &self.source {
            Source::File(path) | Source::SharedFile(path, _) => path.display().to_string(),
            Source::Binary(_) => format!("in-memory face {}", self.post_script_name),
        }
    }

    /// Whether the PostScript name carries `style`, e.g. "BoldOblique"
    pub fn has_style(&self, style: &str) -> bool {
        let wanted: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let suffix = self
            .post_script_name
            .rsplit_once('-')
            .map_or("regular", |(_, s)| s)
            .to_ascii_lowercase();
        suffix == wanted || (wanted == "regular" && suffix == "roman")
    }
}

/// Where to look for fonts
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub font_dirs: Vec<PathBuf>,
    pub load_system_fonts: bool,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            font_dirs: config.font_dirs.clone(),
            load_system_fonts: config.load_system_fonts,
        }
    }
}

/// Every face discovery found
#[derive(Debug, Default)]
pub struct Catalog {
    faces: Vec<Arc<FaceRecord>>,
    by_id: HashMap<fontdb::ID, usize>,
    /// The database's family for each generic name
    generics: HashMap<GenericFamily, String>,
}

impl Catalog {
    pub fn scan(options: &ScanOptions) -> Self {
        let mut db = Database::new();
        if options.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &options.font_dirs {
            let expanded = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref());
            if expanded.is_dir() {
                db.load_fonts_dir(&expanded);
            } else if expanded.is_file() {
                if let Err(err) = db.load_font_file(&expanded) {
                    log::warn!("skipping font {}: {err}", expanded.display());
                }
            } else {
                log::warn!("font directory {} does not exist", expanded.display());
            }
        }
        let catalog = Self::from_database(&db);
        log::info!(
            "found {} faces in {} families",
            catalog.len(),
            catalog.families().len()
        );
        catalog
    }

    pub fn from_database(db: &Database) -> Self {
        let mut catalog = Self::from_records(
            db.faces()
                .filter(|info| !info.families.is_empty())
                .map(FaceRecord::from_info),
        );
        catalog.generics = GenericFamily::ALL
            .iter()
            .map(|&generic| {
                let family = match generic {
                    GenericFamily::Serif => Family::Serif,
                    GenericFamily::SansSerif => Family::SansSerif,
                    GenericFamily::Monospace => Family::Monospace,
                };
                (generic, db.family_name(&family).to_string())
            })
            .collect();
        catalog
    }

    /// A catalog of `records`, sorted by family then style
    pub fn from_records(records: impl IntoIterator<Item = FaceRecord>) -> Self {
        let mut faces: Vec<Arc<FaceRecord>> = records.into_iter().map(Arc::new).collect();
        faces.sort_by(|a, b| {
            a.family()
                .to_lowercase()
                .cmp(&b.family().to_lowercase())
                .then(a.weight.cmp(&b.weight))
                .then(a.slant.cmp(&b.slant))
                .then(a.width.cmp(&b.width))
                .then(a.post_script_name.cmp(&b.post_script_name))
        });
        let by_id = faces.iter().enumerate().map(|(i, f)| (f.id, i)).collect();
        Self {
            faces,
            by_id,
            generics: HashMap::new(),
        }
    }

    /// Family the database substitutes for `generic`, if it was built from one
    pub fn generic_family(&self, generic: GenericFamily) -> Option<&str> {
        self.generics.get(&generic).map(String::as_str)
    }

    pub fn faces(&self) -> &[Arc<FaceRecord>] {
        &self.faces
    }

    pub fn get(&self, id: fontdb::ID) -> Option<&Arc<FaceRecord>> {
        self.by_id.get(&id).and_then(|&i| self.faces.get(i))
    }

    /// Preferred family names, sorted and deduplicated
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.faces.iter().map(|f| f.family().to_string()).collect();
        families.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        families
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
