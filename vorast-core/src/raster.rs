//! Pixel buffer and brute-force Voronoi rasterization.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Color, Point, Result, VoronoiError};

/// Fixed-size row-major buffer of opaque colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Allocate a `width` × `height` buffer filled with `color`
    pub fn new(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    /// Pixels in row-major order, top to bottom
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    /// Flatten to packed RGB bytes (alpha dropped)
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgb()).collect()
    }

    /// Render to an image::RgbImage
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixels[self.index(x, y)].to_rgb())
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// How the nearest-seed pass walks the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// One row after another on the calling thread
    Sequential,
    /// Rows spread over the Rayon pool (falls back to sequential when the
    /// `parallel` feature is off)
    Parallel,
}

impl Default for ClassifyMode {
    fn default() -> Self {
        if cfg!(feature = "parallel") {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Owns a pixel buffer and paints Voronoi cells and seed markers into it
#[derive(Debug)]
pub struct Rasterizer {
    buffer: PixelBuffer,
    mode: ClassifyMode,
}

impl Rasterizer {
    /// New black buffer using the default classification mode
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_mode(width, height, ClassifyMode::default())
    }

    pub fn with_mode(width: u32, height: u32, mode: ClassifyMode) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height, Color::BLACK),
            mode,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Hand the finished buffer over to the encoder
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        self.buffer.pixels.fill(color);
    }

    /// Color every pixel with the palette entry of its nearest seed.
    ///
    /// Distances are compared squared; on equal distance the lower seed index
    /// wins. Cost is O(width · height · seeds).
    pub fn classify_voronoi(&mut self, seeds: &[Point], palette: &[Color]) -> Result<()> {
        if seeds.is_empty() {
            return Err(VoronoiError::NoSeeds);
        }
        if palette.len() != seeds.len() {
            return Err(VoronoiError::PaletteMismatch {
                seeds: seeds.len(),
                colors: palette.len(),
            });
        }
        if self.buffer.pixels.is_empty() {
            return Ok(());
        }

        let width = self.buffer.width as usize;
        let classify_row = |(y, row): (usize, &mut [Color])| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let p = Point::new(x as i32, y as i32);
                *pixel = palette[nearest_seed(&p, seeds)];
            }
        };

        match self.mode {
            #[cfg(feature = "parallel")]
            ClassifyMode::Parallel => self
                .buffer
                .pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(classify_row),
            _ => self
                .buffer
                .pixels
                .chunks_mut(width)
                .enumerate()
                .for_each(classify_row),
        }
        Ok(())
    }

    /// Paint an open disc: pixels with squared distance strictly below
    /// `radius²`, scanned over [cx-r, cx+r) × [cy-r, cy+r) clipped to the
    /// buffer. A zero radius paints nothing.
    pub fn stamp_disc(&mut self, center: Point, radius: u32, color: Color) {
        let r = radius as i64;
        let r_sq = r * r;
        let (cx, cy) = (center.x as i64, center.y as i64);

        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.buffer.width as i64);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.buffer.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy < r_sq {
                    self.buffer.put(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Mark every seed with a disc of the same radius and color
    pub fn stamp_seeds(&mut self, seeds: &[Point], radius: u32, color: Color) {
        for &seed in seeds {
            self.stamp_disc(seed, radius, color);
        }
    }
}

/// Index of the nearest seed; strict `<` keeps the first seed on ties
#[inline]
fn nearest_seed(p: &Point, seeds: &[Point]) -> usize {
    let mut nearest = 0;
    let mut min_dist = p.dist_sq(&seeds[0]);
    for (i, seed) in seeds.iter().enumerate().skip(1) {
        let dist = p.dist_sq(seed);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }
    nearest
}
