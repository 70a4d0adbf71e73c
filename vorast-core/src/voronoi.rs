//! End-to-end rendering: seeds, palette, cells, markers, output.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::str::FromStr;

use rand::Rng;

use crate::{
    generate_palette, generate_seeds, write_ppm, ClassifyMode, Color, PaletteStrategy,
    PixelBuffer, Rasterizer, Result, VoronoiError,
};

/// Everything a single render needs, fixed before it starts
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub seed_count: usize,
    /// Seed marker radius in pixels
    pub marker_radius: u32,
    /// Draw seed markers over the cells
    pub show_seeds: bool,
    pub strategy: PaletteStrategy,
    pub background: Color,
    pub marker_color: Color,
    pub mode: ClassifyMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed_count: 10,
            marker_radius: 5,
            show_seeds: false,
            strategy: PaletteStrategy::default(),
            background: Color::BLACK,
            marker_color: Color::WHITE,
            mode: ClassifyMode::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(VoronoiError::InvalidConfig(format!(
                "image size {}x{} exceeds {}",
                self.width,
                self.height,
                i32::MAX
            )));
        }
        if self.seed_count == 0 {
            return Err(VoronoiError::InvalidConfig("seed count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Render one Voronoi image.
///
/// Draws the palette first and the seed positions second from `rng`, then
/// runs fill → classify → (optional) markers on a fresh buffer.
pub fn render<R: Rng + ?Sized>(config: &RenderConfig, rng: &mut R) -> Result<PixelBuffer> {
    config.validate()?;

    let palette = generate_palette(config.seed_count, config.strategy, rng);
    let seeds = generate_seeds(config.seed_count, config.width, config.height, rng);

    let mut rasterizer = Rasterizer::with_mode(config.width, config.height, config.mode);
    rasterizer.fill(config.background);
    rasterizer.classify_voronoi(&seeds, &palette)?;
    if config.show_seeds {
        rasterizer.stamp_seeds(&seeds, config.marker_radius, config.marker_color);
    }

    Ok(rasterizer.into_buffer())
}

/// Output file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Ppm,
    Png,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ppm" => Ok(Self::Ppm),
            "png" => Ok(Self::Png),
            _ => Err(format!("unknown output format '{}' (expected ppm | png)", s)),
        }
    }
}

impl OutputFormat {
    /// Pick the format from a file extension (`.png` → PNG, anything else PPM)
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Ppm,
        }
    }
}

/// Encode `buffer` into an already-open sink, flushing before returning
pub fn write_image<W: Write + Seek>(
    buffer: &PixelBuffer,
    mut sink: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Ppm => write_ppm(buffer, sink),
        OutputFormat::Png => {
            buffer.to_image().write_to(&mut sink, image::ImageFormat::Png)?;
            sink.flush()?;
            Ok(())
        }
    }
}

/// Create (or truncate) `path` and write `buffer` in the requested format
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let file = File::create(path)?;
    write_image(buffer, BufWriter::new(file), format)
}
