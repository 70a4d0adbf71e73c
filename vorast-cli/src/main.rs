//! Voronoi diagram CLI
//!
//! Scatters random seeds over an image, colors every pixel by its nearest
//! seed and writes the result as a binary PPM (or PNG).
//!
//! ## YAML config file
//!
//! ```yaml
//! width: 1920
//! height: 1080
//! seeds: 100
//! radius: 5
//! show_seeds: true
//! palette: correlated   # random | correlated | hue
//! seed: 42
//! background: "#000000"
//! marker_color: "#ffffff"
//! output: /tmp/voronoi.ppm
//! ```
//!
//! Run with: `vorast --config voronoi.yaml`
//!
//! Flags given on the command line override the file:
//!
//!   vorast --config voronoi.yaml -n 500 --format png -o cells.png

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use vorast_core::{ClassifyMode, Color, OutputFormat, PaletteStrategy, PixelBuffer, RenderConfig};

const DEFAULT_OUTPUT: &str = "/tmp/voronoi.ppm";

/// YAML config file format (every key optional)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    output: Option<PathBuf>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    seeds: Option<usize>,
    #[serde(default)]
    radius: Option<u32>,
    #[serde(default)]
    show_seeds: Option<bool>,
    #[serde(default)]
    palette: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    marker_color: Option<String>,
}

fn load_config(path: &PathBuf) -> anyhow::Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))
}

#[derive(Parser, Debug)]
#[command(name = "vorast")]
#[command(about = "Render random Voronoi diagrams", long_about = None)]
struct Args {
    /// Output file path [default: /tmp/voronoi.ppm]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: ppm | png [default: from the output extension, else ppm]
    #[arg(short, long)]
    format: Option<String>,

    /// Image width in pixels [default: 800]
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels [default: 600]
    #[arg(long)]
    height: Option<u32>,

    /// Number of seeds (cells) [default: 10]
    #[arg(short = 'n', long)]
    seeds: Option<usize>,

    /// Seed marker radius in pixels [default: 5]
    #[arg(long)]
    radius: Option<u32>,

    /// Draw a disc at each seed position
    #[arg(long)]
    show_seeds: bool,

    /// Palette strategy: random | correlated | hue [default: random]
    #[arg(short, long)]
    palette: Option<String>,

    /// Random seed for reproducibility [default: current UNIX time]
    #[arg(long)]
    seed: Option<u64>,

    /// Background color painted before classification [default: #000000]
    #[arg(long)]
    background: Option<String>,

    /// Seed marker color [default: #ffffff]
    #[arg(long)]
    marker_color: Option<String>,

    /// Classify on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Fully resolved run settings
#[derive(Debug)]
struct Settings {
    render: RenderConfig,
    output: PathBuf,
    format: OutputFormat,
    seed: u64,
}

fn parse_color(value: Option<&String>, default: Color) -> anyhow::Result<Color> {
    value
        .map(|s| s.parse::<Color>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))
        .map(|c| c.unwrap_or(default))
}

/// Merge CLI flags over config-file values over built-in defaults.
fn resolve_settings(
    args: &Args,
    file: &FileConfig,
    clock_seed: impl FnOnce() -> u64,
) -> anyhow::Result<Settings> {
    let defaults = RenderConfig::default();

    let strategy = args
        .palette
        .as_ref()
        .or(file.palette.as_ref())
        .map(|s| s.parse::<PaletteStrategy>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or(defaults.strategy);
    let background = parse_color(
        args.background.as_ref().or(file.background.as_ref()),
        defaults.background,
    )
    .context("invalid background color")?;
    let marker_color = parse_color(
        args.marker_color.as_ref().or(file.marker_color.as_ref()),
        defaults.marker_color,
    )
    .context("invalid marker color")?;

    let mode = if args.sequential {
        ClassifyMode::Sequential
    } else {
        defaults.mode
    };

    let render = RenderConfig {
        width: args.width.or(file.width).unwrap_or(defaults.width),
        height: args.height.or(file.height).unwrap_or(defaults.height),
        seed_count: args.seeds.or(file.seeds).unwrap_or(defaults.seed_count),
        marker_radius: args.radius.or(file.radius).unwrap_or(defaults.marker_radius),
        show_seeds: args.show_seeds || file.show_seeds.unwrap_or(defaults.show_seeds),
        strategy,
        background,
        marker_color,
        mode,
    };
    render.validate()?;

    let output = args
        .output
        .clone()
        .or_else(|| file.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let format = args
        .format
        .as_ref()
        .or(file.format.as_ref())
        .map(|s| s.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or_else(|| OutputFormat::from_path(&output));
    let seed = args.seed.or(file.seed).unwrap_or_else(clock_seed);

    Ok(Settings { render, output, format, seed })
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file = args.config.as_ref().map(load_config).transpose()?.unwrap_or_default();
    let settings = resolve_settings(&args, &file, seed_from_clock)?;
    let config = &settings.render;

    println!("Image size: {}x{}", config.width, config.height);
    println!("Seeds: {} (palette: {})", config.seed_count, config.strategy);
    println!("Using seed: {}", settings.seed);
    if config.show_seeds {
        println!("Seed markers: radius {} in {}", config.marker_radius, config.marker_color);
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let pixel_count = config.width as u64 * config.height as u64;
    progress.set_message(format!("Classifying {} pixels", pixel_count));
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let buffer = vorast_core::render(config, &mut rng)?;
    let render_time = start.elapsed();

    progress.set_message(format!("Writing {:?}", settings.output));
    if let Err(e) = write_output(&buffer, &settings.output, settings.format) {
        progress.abandon_with_message("Write failed");
        return Err(e);
    }
    progress.finish_with_message("Done");

    println!("Output saved to: {:?}", settings.output);
    println!(
        "Render time: {:.1} ms ({:.1} ms total)",
        render_time.as_secs_f64() * 1000.0,
        start.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(())
}

/// Open `path` and encode into it.
///
/// A file that cannot be opened is left alone; only a file this run created
/// or truncated is removed when the write fails.
fn write_output(buffer: &PixelBuffer, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to open {:?} for writing", path))?;
    if let Err(e) = vorast_core::write_image(buffer, BufWriter::new(file), format) {
        if let Err(rm) = std::fs::remove_file(path) {
            eprintln!("Warning: could not remove partial output {:?}: {}", path, rm);
        }
        return Err(e).with_context(|| format!("failed to write {:?}", path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["vorast"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let s = resolve_settings(&args(&[]), &FileConfig::default(), || 77).unwrap();
        assert_eq!(s.render, RenderConfig::default());
        assert_eq!(s.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(s.format, OutputFormat::Ppm);
        assert_eq!(s.seed, 77);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileConfig = serde_yaml::from_str(
            "width: 100\nheight: 50\nseeds: 3\npalette: hue\nseed: 5\nbackground: \"#102030\"\n",
        )
        .unwrap();
        let s = resolve_settings(
            &args(&["--width", "40", "-p", "correlated", "--show-seeds"]),
            &file,
            || unreachable!(),
        )
        .unwrap();

        assert_eq!(s.render.width, 40);
        assert_eq!(s.render.height, 50);
        assert_eq!(s.render.seed_count, 3);
        assert_eq!(s.render.strategy, PaletteStrategy::HueCorrelated);
        assert_eq!(s.render.background, Color::from_rgb(0x10, 0x20, 0x30));
        assert!(s.render.show_seeds);
        assert_eq!(s.seed, 5);
    }

    #[test]
    fn test_sequential_flag() {
        let s = resolve_settings(&args(&["--sequential"]), &FileConfig::default(), || 0).unwrap();
        assert_eq!(s.render.mode, ClassifyMode::Sequential);
    }

    #[test]
    fn test_rejects_bad_values() {
        let file = FileConfig::default();
        assert!(resolve_settings(&args(&["-n", "0"]), &file, || 0).is_err());
        assert!(resolve_settings(&args(&["--width", "0"]), &file, || 0).is_err());
        assert!(resolve_settings(&args(&["-p", "plaid"]), &file, || 0).is_err());
        assert!(resolve_settings(&args(&["-f", "bmp"]), &file, || 0).is_err());
        assert!(resolve_settings(&args(&["--marker-color", "white"]), &file, || 0).is_err());
    }

    #[test]
    fn test_format_follows_output_extension() {
        let file = FileConfig::default();
        let s = resolve_settings(&args(&["-o", "cells.png"]), &file, || 0).unwrap();
        assert_eq!(s.format, OutputFormat::Png);

        let s = resolve_settings(&args(&["-o", "cells.png", "-f", "ppm"]), &file, || 0).unwrap();
        assert_eq!(s.format, OutputFormat::Ppm);

        let file: FileConfig = serde_yaml::from_str("output: /tmp/cells.PNG\n").unwrap();
        let s = resolve_settings(&args(&[]), &file, || 0).unwrap();
        assert_eq!(s.format, OutputFormat::Png);
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vorast-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_unopenable_output_is_kept() {
        let path = temp_path("readonly.ppm");
        std::fs::write(&path, b"keep me").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();

        // Privileged users can open read-only files; nothing to check then
        let writable = std::fs::OpenOptions::new().write(true).open(&path).is_ok();
        let result = write_output(&PixelBuffer::new(1, 1, Color::RED), &path, OutputFormat::Ppm);
        let contents = std::fs::read(&path).ok();

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(false);
        std::fs::set_permissions(&path, perms).unwrap();
        std::fs::remove_file(&path).ok();

        if writable {
            eprintln!("skipping: {:?} is writable despite read-only mode", path);
            return;
        }
        assert!(result.is_err());
        assert_eq!(contents.as_deref(), Some(&b"keep me"[..]));
    }

    #[test]
    fn test_output_into_missing_dir_fails_cleanly() {
        let path = temp_path("no-such-dir").join("out.ppm");
        let err = write_output(&PixelBuffer::new(1, 1, Color::RED), &path, OutputFormat::Ppm)
            .unwrap_err();
        assert!(err.to_string().contains("failed to open"), "{}", err);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_output_replaces_existing_file() {
        let path = temp_path("replace.png");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();
        write_output(&PixelBuffer::new(3, 2, Color::WHITE), &path, OutputFormat::Png).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_unknown_config_key() {
        assert!(serde_yaml::from_str::<FileConfig>("colour: red\n").is_err());
    }
}
