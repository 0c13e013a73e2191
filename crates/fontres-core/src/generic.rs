// this_file: crates/fontres-core/src/generic.rs

//! Generic font families and the concrete families behind them

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
}

impl GenericFamily {
    pub const ALL: [GenericFamily; 3] = [
        GenericFamily::Serif,
        GenericFamily::SansSerif,
        GenericFamily::Monospace,
    ];

    /// Recognizes generic names, folding the `mono`/`sans` aliases
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" => Some(GenericFamily::Serif),
            "sans-serif" | "sans serif" | "sans" => Some(GenericFamily::SansSerif),
            "monospace" | "mono" => Some(GenericFamily::Monospace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenericFamily::Serif => "serif",
            GenericFamily::SansSerif => "sans-serif",
            GenericFamily::Monospace => "monospace",
        }
    }

    /// Concrete families commonly installed for this generic, most preferred first
    pub fn default_members(self) -> &'static [&'static str] {
        match self {
            GenericFamily::Serif => &[
                "Times New Roman",
                "Times",
                "DejaVu Serif",
                "Liberation Serif",
                "Noto Serif",
                "Georgia",
            ],
            GenericFamily::SansSerif => &[
                "Helvetica",
                "Arial",
                "DejaVu Sans",
                "Liberation Sans",
                "Noto Sans",
                "Verdana",
            ],
            GenericFamily::Monospace => &[
                "Courier New",
                "Courier",
                "Monaco",
                "Consolas",
                "Menlo",
                "DejaVu Sans Mono",
                "Liberation Mono",
                "Noto Sans Mono",
            ],
        }
    }

    /// The generic a family name stands for, either directly or as a
    /// well-known member (`Courier` is a monospace face)
    pub fn classify(family: &str) -> Option<Self> {
        GenericFamily::parse(family).or_else(|| {
            GenericFamily::ALL.into_iter().find(|generic| {
                generic
                    .default_members()
                    .iter()
                    .any(|member| member.eq_ignore_ascii_case(family.trim()))
            })
        })
    }
}

impl fmt::Display for GenericFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
