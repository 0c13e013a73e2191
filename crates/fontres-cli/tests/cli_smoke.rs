// this_file: crates/fontres-cli/tests/cli_smoke.rs

//! Runs the built binary against the DejaVu fonts when they are installed

use std::path::PathBuf;
use std::process::{Command, Output};

fn font_dir() -> Option<PathBuf> {
    let dir = std::env::var_os("FONTRES_TEST_FONT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/usr/share/fonts/truetype/dejavu"));
    if dir.join("DejaVuSans.ttf").is_file() {
        Some(dir)
    } else {
        eprintln!("DejaVu fonts not found, skipping");
        None
    }
}

fn temp_output(ext: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("fontres_test_{}_{nanos}.{ext}", std::process::id()))
}

fn fontres(dir: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fontres"))
        .arg("--no-system-fonts")
        .arg("--font-dir")
        .arg(dir)
        .args(args)
        .env_remove("FONTRES_DRIVERS")
        .env_remove("FONTRES_FONT_DIRS")
        .output()
        .expect("run fontres")
}

#[test]
fn test_families_when_dir_given_then_lists_dejavu() {
    let Some(dir) = font_dir() else { return };
    let output = fontres(&dir, &["families"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l == "DejaVu Sans"));
}

#[test]
fn test_match_when_bold_requested_then_prints_bold_entity() {
    let Some(dir) = font_dir() else { return };
    let output = fontres(&dir, &["match", "DejaVu Sans:weight=bold"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DejaVu Sans-bold"));
}

#[test]
fn test_match_when_name_malformed_then_fails() {
    let Some(dir) = font_dir() else { return };
    let output = fontres(&dir, &["match", "DejaVu Sans:weight=enormous"]);
    assert!(!output.status.success());
}

#[test]
fn test_extents_when_text_given_then_reports_width() {
    let Some(dir) = font_dir() else { return };
    let output = fontres(&dir, &["extents", "--font", "DejaVu Sans", "--size", "20", "Hello"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("width="));
    assert!(!stdout.contains("width=0 "));
}

#[test]
fn test_render_when_output_given_then_writes_pgm() {
    let Some(dir) = font_dir() else { return };
    let path = temp_output("pgm");
    let output = fontres(
        &dir,
        &[
            "render",
            "--font",
            "DejaVu Sans Mono",
            "--size",
            "16",
            "-o",
            path.to_str().expect("utf-8 temp path"),
            "Hi",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let image = std::fs::read(&path).expect("image written");
    assert!(image.starts_with(b"P5\n"));
    let data_start = image
        .iter()
        .enumerate()
        .filter(|(_, &b)| b == b'\n')
        .nth(2)
        .map(|(i, _)| i + 1)
        .expect("PGM header");
    assert!(image[data_start..].iter().any(|&b| b < 255));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_help_when_requested_then_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_fontres"))
        .arg("--help")
        .output()
        .expect("run fontres --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["list", "match", "families", "extents", "render"] {
        assert!(stdout.contains(command), "help mentions {command}");
    }
}
