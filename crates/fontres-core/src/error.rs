// this_file: crates/fontres-core/src/error.rs

//! Error types for fontres
//!
//! Most driver operations report failure as values (an empty list, `None`,
//! or [`crate::INVALID_CODE`]). The types here cover the cases where the
//! caller needs to know why: opening a font, initializing a backend,
//! building a generic-family list, and the optional device operations.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FontError>;

/// Main error type for fontres
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Font resource unavailable: {0}")]
    Resource(#[from] ResourceError),

    #[error("Backend initialization failed: {0}")]
    BackendInit(#[from] BackendInitFailure),

    #[error("Generic family list failed: {0}")]
    Build(#[from] BuildError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Font name parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No driver registered for type {0}")]
    UnknownDriver(String),
}

/// A matched entity could not be realized as an open font
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Font file missing: {}", path.display())]
    FileMissing { path: PathBuf },

    #[error("Failed to read font file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data in {origin}: {reason}")]
    InvalidData { origin: String, reason: String },

    #[error("Face index {index} not present in {origin}")]
    FaceIndex { origin: String, index: u32 },

    #[error("Entity {entity} does not carry a payload for driver {driver}")]
    ForeignEntity { entity: String, driver: String },

    #[error("Driver {0} is not available")]
    DriverUnavailable(String),
}

/// One-time backend setup failed; only that driver stops participating
#[derive(Debug, Error)]
#[error("driver {driver}: {reason}")]
pub struct BackendInitFailure {
    pub driver: String,
    pub reason: String,
}

impl BackendInitFailure {
    pub fn new(driver: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            reason: reason.into(),
        }
    }
}

/// Building the entity list of a generic family failed midway
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("driver {driver} is not initialized")]
    NotInitialized { driver: String },

    #[error("listing family {family} failed: {reason}")]
    Listing { family: String, reason: String },
}

/// Errors from the optional driver operations
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{driver} does not support {operation}")]
    Unsupported {
        driver: String,
        operation: &'static str,
    },

    #[error("Unsupported bitmap depth: {0} bits per pixel")]
    UnsupportedDepth(u8),

    #[error("Glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("Font object is closed")]
    Closed,

    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    #[error("Shaping failed: {0}")]
    Shaping(String),

    #[error("Generic family build failed: {0}")]
    Build(#[from] BuildError),
}

impl DriverError {
    pub fn unsupported(driver: &str, operation: &'static str) -> Self {
        Self::Unsupported {
            driver: driver.to_string(),
            operation,
        }
    }
}

/// Font name syntax errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid value {value:?} for property {key}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid OpenType tag: {0:?}")]
    InvalidTag(String),

    #[error("Unknown registry: {0}")]
    UnknownRegistry(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}")]
    InvalidValue { name: String, value: String },

    #[error("Unknown driver in sort order: {0}")]
    UnknownDriver(String),
}
