//! Core Voronoi rasterization library.
//!
//! Seeds are scattered uniformly over a fixed-size pixel buffer, each seed
//! gets a palette color, and every pixel takes the color of its nearest seed
//! (brute force, optionally Rayon-parallelized over rows). The finished
//! buffer is written as a binary PPM (P6) or PNG.

mod color;
mod palette;
mod ppm;
mod raster;
mod site;
mod voronoi;

pub use color::{hsl_to_rgb, hsv_to_rgb, Color};
pub use palette::{generate_palette, PaletteStrategy};
pub use ppm::{encode_ppm, save_ppm, write_ppm};
pub use raster::{ClassifyMode, PixelBuffer, Rasterizer};
pub use site::{generate_seeds, Point};
pub use voronoi::{render, save, write_image, OutputFormat, RenderConfig};

/// RGB color tuple
pub type Rgb = [u8; 3];

/// Error type for Voronoi operations
#[derive(Debug, thiserror::Error)]
pub enum VoronoiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No seeds provided")]
    NoSeeds,

    #[error("Palette has {colors} colors for {seeds} seeds")]
    PaletteMismatch { seeds: usize, colors: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
