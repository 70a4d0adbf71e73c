//! Per-seed palette generation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::color::{hsl_to_rgb, hsv_to_rgb, Color};

/// Hue-correlated jitter around the shared base hue ([0, 1) scale)
const HUE_JITTER: f32 = 0.05;
const SATURATION_CENTER: f32 = 0.3;
const SATURATION_JITTER: f32 = 0.2;
const LIGHTNESS_CENTER: f32 = 0.5;
const LIGHTNESS_JITTER: f32 = 0.2;

/// Fixed HSV saturation/value (percent) for independent hues
const HSV_SATURATION: f32 = 50.0;
const HSV_VALUE: f32 = 95.0;

/// How palette colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteStrategy {
    /// Three uniform random channel bytes per seed
    #[default]
    IndependentRandom,
    /// Small HSL perturbations around one shared random hue
    HueCorrelated,
    /// A random HSV hue per seed at fixed saturation and value
    IndependentHue,
}

impl FromStr for PaletteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::IndependentRandom),
            "correlated" => Ok(Self::HueCorrelated),
            "hue" => Ok(Self::IndependentHue),
            _ => Err(format!(
                "unknown palette strategy '{}' (expected random | correlated | hue)",
                s
            )),
        }
    }
}

impl fmt::Display for PaletteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IndependentRandom => "random",
            Self::HueCorrelated => "correlated",
            Self::IndependentHue => "hue",
        };
        f.write_str(name)
    }
}

/// Generate `count` colors, one per seed, all with the same strategy.
pub fn generate_palette<R: Rng + ?Sized>(
    count: usize,
    strategy: PaletteStrategy,
    rng: &mut R,
) -> Vec<Color> {
    match strategy {
        PaletteStrategy::IndependentRandom => (0..count)
            .map(|_| Color::from_rgb(rng.gen(), rng.gen(), rng.gen()))
            .collect(),
        PaletteStrategy::HueCorrelated => {
            let base_hue: f32 = rng.gen_range(0.0..1.0);
            (0..count)
                .map(|_| {
                    let h = (base_hue + rng.gen_range(-HUE_JITTER..=HUE_JITTER)).rem_euclid(1.0);
                    let s = (SATURATION_CENTER
                        + rng.gen_range(-SATURATION_JITTER..=SATURATION_JITTER))
                    .clamp(0.0, 1.0);
                    let l = (LIGHTNESS_CENTER
                        + rng.gen_range(-LIGHTNESS_JITTER..=LIGHTNESS_JITTER))
                    .clamp(0.0, 1.0);
                    hsl_to_rgb(h, s, l)
                })
                .collect()
        }
        PaletteStrategy::IndependentHue => (0..count)
            .map(|_| hsv_to_rgb(rng.gen_range(0.0..360.0), HSV_SATURATION, HSV_VALUE))
            .collect(),
    }
}
