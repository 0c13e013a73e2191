// this_file: crates/fontres-cli/src/main.rs

//! fontres command-line front end

mod cli;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fontres::{parse_font_name, Config, FontContext, FontEntity, FontSpec, Frame, INVALID_CODE};
use fontres_canvas::{CanvasDriver, Pixmap};
use fontres_sfnt::SfntDriver;

use cli::{Cli, Commands, GlobalArgs, TextArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    let context = build_context(&cli.global)?;
    let frame = Frame::new(1, 0).with_resolution(context.config().dpi);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List { spec } => {
            let spec = parse_spec(spec.as_deref())?;
            for entity in context.resolve(&spec, &frame) {
                writeln!(out, "{entity}")?;
            }
        }
        Commands::Match { spec } => {
            let spec = parse_spec(spec.as_deref())?;
            match context.match_font(&spec, &frame) {
                Some(entity) => writeln!(out, "{entity}")?,
                None => bail!("no font matches"),
            }
        }
        Commands::Families => {
            for family in context.list_families(&frame) {
                writeln!(out, "{family}")?;
            }
        }
        Commands::Extents(args) => {
            let spec = parse_spec(Some(&args.font))?;
            let entity = pick(&context, &spec, &frame)?;
            let (advance, m, ascent, descent) = measure(&context, &entity, &args, &frame)?;
            writeln!(out, "font: {entity}")?;
            writeln!(
                out,
                "width={advance} lbearing={} rbearing={} ascent={} descent={} line-ascent={ascent} line-descent={descent}",
                m.lbearing, m.rbearing, m.ascent, m.descent
            )?;
        }
        Commands::Render {
            text,
            output,
            padding,
        } => {
            let mut spec = parse_spec(Some(&text.font))?;
            spec.driver_type = Some(fontres_canvas::DRIVER_TYPE.to_string());
            let entity = pick(&context, &spec, &frame)?;
            let pixmap = render(&context, &entity, &text, padding, &frame)?;
            std::fs::write(&output, pixmap.to_pgm())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!(
                "wrote {}x{} image to {}",
                pixmap.width(),
                pixmap.height(),
                output.display()
            );
        }
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn build_context(args: &GlobalArgs) -> Result<FontContext> {
    let mut config = Config::from_env();
    config.font_dirs.extend(args.font_dirs.iter().cloned());
    if args.no_system_fonts {
        config.load_system_fonts = false;
    }

    let sfnt = Arc::new(SfntDriver::new(&config));
    let context = FontContext::new(config);
    context.register_driver(sfnt.clone());
    context.register_driver(Arc::new(CanvasDriver::new(sfnt)));
    if let Some(driver) = &args.driver {
        context
            .set_sort_order(&[driver.as_str()])
            .context("Invalid --driver")?;
    }
    for failure in context.init_drivers() {
        log::warn!("{failure}");
    }
    Ok(context)
}

fn parse_spec(text: Option<&str>) -> Result<FontSpec> {
    match text {
        None => Ok(FontSpec::new()),
        Some(text) => Ok(parse_font_name(text)
            .with_context(|| format!("Invalid font name {text:?}"))?
            .to_spec()),
    }
}

fn pick(context: &FontContext, spec: &FontSpec, frame: &Frame) -> Result<Arc<FontEntity>> {
    context
        .resolve_limited(spec, frame, 1)
        .into_iter()
        .next()
        .or_else(|| context.match_font(spec, frame))
        .context("No font matches")
}

fn pixel_size(context: &FontContext, entity: &FontEntity, args: &TextArgs) -> Result<u32> {
    if let Some(size) = args.size {
        return Ok(size);
    }
    let name = parse_font_name(&args.font)?;
    let dpi = context.config().dpi;
    Ok(name
        .to_spec()
        .pixel_size(dpi)
        .unwrap_or_else(|| entity.pixel_size()))
}

/// Advance, ink box and the font's line ascent and descent
fn measure(
    context: &FontContext,
    entity: &Arc<FontEntity>,
    args: &TextArgs,
    frame: &Frame,
) -> Result<(i32, fontres::FontMetrics, i32, i32)> {
    let size = pixel_size(context, entity, args)?;
    let handle = context.open(entity, size, frame)?;
    let glyphs = context.encode_str(&handle, &args.text);
    warn_missing(&glyphs);
    let (advance, metrics) = context.metrics(&handle, &glyphs);
    let line = *handle.metrics();
    context.close(&handle, frame);
    Ok((advance, metrics, line.ascent, line.descent))
}

fn render(
    context: &FontContext,
    entity: &Arc<FontEntity>,
    args: &TextArgs,
    padding: u32,
    frame: &Frame,
) -> Result<Pixmap> {
    let size = pixel_size(context, entity, args)?;
    let handle = context.open(entity, size, frame)?;
    let glyphs = context.encode_str(&handle, &args.text);
    warn_missing(&glyphs);

    let (advance, _) = context.metrics(&handle, &glyphs);
    let line = *handle.metrics();
    let pad = padding as i32;
    let width = (advance + 2 * pad).max(1) as u32;
    let height = (line.ascent + line.descent + 2 * pad).max(1) as u32;

    let mut pixmap = Pixmap::new(width, height);
    let drawn = context.draw(&handle, &glyphs, pad, pad + line.ascent, true, &mut pixmap);
    context.close(&handle, frame);
    drawn?;
    Ok(pixmap)
}

fn warn_missing(glyphs: &[fontres::GlyphCode]) {
    let missing = glyphs.iter().filter(|&&g| g == INVALID_CODE).count();
    if missing > 0 {
        log::warn!("{missing} characters have no glyph in the selected font");
    }
}
