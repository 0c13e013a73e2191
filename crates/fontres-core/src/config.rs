// this_file: crates/fontres-core/src/config.rs

//! Font subsystem configuration
//!
//! Defaults suit an interactive editor; [`Config::from_env`] lets a user
//! adjust them without recompiling:
//!
//! ```bash
//! FONTRES_DRIVERS=canvas,sfnt FONTRES_FONT_DIRS=~/fonts ./my_app
//! ```
//!
//! | Variable | Effect |
//! |---|---|
//! | `FONTRES_DRIVERS` | Comma-separated driver sort order |
//! | `FONTRES_FONT_DIRS` | Extra font directories (platform path separator) |
//! | `FONTRES_NO_SYSTEM_FONTS` | `1`/`true` skips the system font directories |
//! | `FONTRES_DEFAULT_PIXEL_SIZE` | Size used when a scalable font is opened at 0 |
//! | `FONTRES_DPI` | Resolution for point sizes |

use std::path::PathBuf;

use crate::error::ConfigError;

pub const ENV_DRIVERS: &str = "FONTRES_DRIVERS";
pub const ENV_FONT_DIRS: &str = "FONTRES_FONT_DIRS";
pub const ENV_NO_SYSTEM_FONTS: &str = "FONTRES_NO_SYSTEM_FONTS";
pub const ENV_DEFAULT_PIXEL_SIZE: &str = "FONTRES_DEFAULT_PIXEL_SIZE";
pub const ENV_DPI: &str = "FONTRES_DPI";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Driver types in priority order; unnamed drivers follow in registration order
    pub sort_order: Vec<String>,
    pub font_dirs: Vec<PathBuf>,
    pub load_system_fonts: bool,
    pub default_pixel_size: u32,
    pub dpi: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_order: Vec::new(),
            font_dirs: Vec::new(),
            load_system_fonts: true,
            default_pixel_size: 12,
            dpi: 96.0,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    /// Defaults overridden by the `FONTRES_*` environment
    ///
    /// Invalid values are logged and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(value) = lookup(ENV_DRIVERS) {
            config.sort_order = parse_sort_order(&value);
            log::info!("driver sort order from {ENV_DRIVERS}: {:?}", config.sort_order);
        }
        if let Some(value) = lookup(ENV_FONT_DIRS) {
            config.font_dirs = std::env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Some(value) = lookup(ENV_NO_SYSTEM_FONTS) {
            config.load_system_fonts = !is_truthy(&value);
        }
        if let Some(value) = lookup(ENV_DEFAULT_PIXEL_SIZE) {
            match parse_pixel_size(&value) {
                Ok(size) => config.default_pixel_size = size,
                Err(err) => log::warn!("{err}; keeping {}", config.default_pixel_size),
            }
        }
        if let Some(value) = lookup(ENV_DPI) {
            match value.trim().parse::<f32>() {
                Ok(dpi) if dpi > 0.0 => config.dpi = dpi,
                _ => log::warn!("ignoring invalid {ENV_DPI}={value:?}"),
            }
        }
        config
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    pub fn without_system_fonts(mut self) -> Self {
        self.load_system_fonts = false;
        self
    }

    pub fn with_sort_order(mut self, order: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sort_order = order.into_iter().map(Into::into).collect();
        self
    }
}

fn parse_sort_order(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_pixel_size(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&size| size > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: ENV_DEFAULT_PIXEL_SIZE.to_string(),
            value: value.to_string(),
        })
}
