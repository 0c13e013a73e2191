// this_file: backends/fontres-sfnt/src/face.rs

//! Font bytes and the table of faces shared between open fonts
//!
//! Opening the same file at several sizes maps it once. Each open font
//! holds one count on its face; the bytes are unmapped when the last size
//! is closed.

use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use fontres_core::ResourceError;
use memmap2::Mmap;
use parking_lot::Mutex;
use read_fonts::{FontRef, ReadError, TableProvider};

use crate::scan::{FaceKey, FaceRecord};

/// Raw font file contents, mapped or in memory
pub type FaceBytes = Arc<dyn AsRef<[u8]> + Send + Sync>;

/// Largest font file the driver maps
pub const MAX_FONT_SIZE: u64 = 64 * 1024 * 1024;

/// One face of a font file, loaded and validated
pub struct SharedFace {
    bytes: FaceBytes,
    index: u32,
    origin: String,
    units_per_em: u16,
}

impl SharedFace {
    /// Loads the face `record` describes and checks that it parses
    pub fn load(record: &FaceRecord) -> Result<Self, ResourceError> {
        let bytes = load_source(&record.source)?;
        let origin = record.origin();
        let units_per_em = {
            let font = parse((*bytes).as_ref(), record.index, &origin)?;
            font.head()
                .map(|head| head.units_per_em())
                .map_err(|err| ResourceError::InvalidData {
                    origin: origin.clone(),
                    reason: format!("head table: {err}"),
                })?
        };
        Ok(Self {
            bytes,
            index: record.index,
            origin,
            units_per_em,
        })
    }

    pub fn data(&self) -> &[u8] {
        (*self.bytes).as_ref()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Parsed view of the face; cannot fail after [`SharedFace::load`]
    pub fn font(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data(), self.index).ok()
    }
}

fn parse<'a>(data: &'a [u8], index: u32, origin: &str) -> Result<FontRef<'a>, ResourceError> {
    FontRef::from_index(data, index).map_err(|err| match err {
        ReadError::InvalidCollectionIndex(_) => ResourceError::FaceIndex {
            origin: origin.to_string(),
            index,
        },
        other => ResourceError::InvalidData {
            origin: origin.to_string(),
            reason: other.to_string(),
        },
    })
}

/// Bytes behind a fontdb source; files are memory-mapped
pub fn load_source(source: &fontdb::Source) -> Result<FaceBytes, ResourceError> {
    match source {
        fontdb::Source::Binary(data) => Ok(data.clone()),
        fontdb::Source::SharedFile(_, data) => Ok(data.clone()),
        fontdb::Source::File(path) => map_file(path),
    }
}

fn map_file(path: &Path) -> Result<FaceBytes, ResourceError> {
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ResourceError::FileMissing {
            path: path.to_path_buf(),
        },
        _ => ResourceError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        },
    })?;

    let len = file
        .metadata()
        .map_err(|err| ResourceError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        })?
        .len();
    if len > MAX_FONT_SIZE {
        return Err(ResourceError::InvalidData {
            origin: path.display().to_string(),
            reason: format!("file is {len} bytes, limit is {MAX_FONT_SIZE}"),
        });
    }

    // Fonts rewritten on disk while mapped are not supported
    #[allow(unsafe_code)]
    let map = unsafe { Mmap::map(&file) }.map_err(|err| ResourceError::Unreadable {
        path: path.to_path_buf(),
        source: err,
    })?;
    let bytes: FaceBytes = Arc::new(map);
    Ok(bytes)
}

struct FaceSlot {
    face: Arc<SharedFace>,
    users: usize,
}

/// Reference-counted faces keyed by file and index
#[derive(Default)]
pub struct FaceTable {
    faces: Mutex<HashMap<FaceKey, FaceSlot>>,
}

impl FaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded face for `record`, loading it on first use
    pub fn acquire(&self, record: &FaceRecord) -> Result<Arc<SharedFace>, ResourceError> {
        let key = record.key();
        let mut faces = self.faces.lock();
        if let Some(slot) = faces.get_mut(&key) {
            slot.users += 1;
            return Ok(slot.face.clone());
        }
        let face = Arc::new(SharedFace::load(record)?);
        log::debug!("loaded face {} #{}", face.origin(), face.index());
        faces.insert(
            key,
            FaceSlot {
                face: face.clone(),
                users: 1,
            },
        );
        Ok(face)
    }

    /// Drops one user; the face is unloaded with the last
    pub fn release(&self, key: &FaceKey) {
        let mut faces = self.faces.lock();
        let last = match faces.get_mut(key) {
            Some(slot) => {
                slot.users = slot.users.saturating_sub(1);
                slot.users == 0
            }
            None => {
                log::warn!("releasing face {key:?} that is not loaded");
                false
            }
        };
        if last {
            faces.remove(key);
            log::debug!("unloaded face {key:?}");
        }
    }

    pub fn users(&self, key: &FaceKey) -> usize {
        self.faces.lock().get(key).map_or(0, |slot| slot.users)
    }

    pub fn len(&self) -> usize {
        self.faces.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.lock().is_empty()
    }
}
