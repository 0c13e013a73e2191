// this_file: crates/fontres-cli/src/cli.rs

//! Argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// fontres - find, match, measure and draw fonts
#[derive(Parser, Debug)]
#[command(name = "fontres")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Extra font directory or file (repeatable)
    #[arg(long = "font-dir", global = true)]
    pub font_dirs: Vec<PathBuf>,

    /// Only use fonts from --font-dir
    #[arg(long, global = true)]
    pub no_system_fonts: bool,

    /// Driver consulted first: sfnt or canvas
    #[arg(long, global = true)]
    pub driver: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every font matching a name such as "DejaVu Sans:bold"
    #[command(alias = "ls")]
    List {
        /// Font name; all fonts when omitted
        spec: Option<String>,
    },

    /// Show the single closest font
    Match {
        spec: Option<String>,
    },

    /// List family names
    Families,

    /// Print the extents of a text run
    Extents(TextArgs),

    /// Draw a text run to a PGM image
    #[command(alias = "r")]
    Render {
        #[command(flatten)]
        text: TextArgs,

        /// Output file
        #[arg(short = 'o', long = "output", default_value = "out.pgm")]
        output: PathBuf,

        /// Blank border in pixels
        #[arg(long, default_value_t = 4)]
        padding: u32,
    },
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Font name
    #[arg(short = 'f', long = "font")]
    pub font: String,

    /// Pixel size; the name's size or the configured default when omitted
    #[arg(short = 's', long = "size")]
    pub size: Option<u32>,

    pub text: String,
}
