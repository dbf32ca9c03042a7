/// Shepard's method (inverse-distance weighting) in color space.
///
/// The `nearest` closest palette colors each get weight `1 / d^power`, with
/// `d` the plain Euclidean distance. High `power` approaches a hard
/// nearest-color snap, low `power` approaches a flat average of the
/// candidates.
use crate::color::Color;
use crate::distance::{find_n_closest_into, Candidate};
use crate::palette::Palette;

/// Weighted per-channel average, rounded, alpha forced opaque.
///
/// Mismatched or empty inputs return [`Color::TRANSPARENT`]. A total weight of
/// exactly zero returns the first color as is.
pub fn blend(colors: &[Color], weights: &[f64]) -> Color {
    if colors.is_empty() || colors.len() != weights.len() {
        return Color::TRANSPARENT;
    }

    let mut sum = [0.0f64; 3];
    let mut total_weight = 0.0;
    for (c, &w) in colors.iter().zip(weights) {
        sum[0] += c.r as f64 * w;
        sum[1] += c.g as f64 * w;
        sum[2] += c.b as f64 * w;
        total_weight += w;
    }

    if total_weight == 0.0 {
        return colors[0];
    }

    let channel = |s: f64| (s / total_weight).round().clamp(0.0, 255.0) as u8;
    Color::rgb(channel(sum[0]), channel(sum[1]), channel(sum[2]))
}

/// Recolor one color against `palette`.
pub fn shepards_method(color: Color, palette: &Palette, nearest: usize, power: f64) -> Color {
    let mut scratch = ShepardScratch::default();
    scratch.apply(color, palette, nearest, power)
}

/// Reusable buffers for [`shepards_method`], one per worker.
#[derive(Debug, Default)]
pub struct ShepardScratch {
    candidates: Vec<Candidate>,
    colors: Vec<Color>,
    weights: Vec<f64>,
}

impl ShepardScratch {
    pub fn apply(&mut self, color: Color, palette: &Palette, nearest: usize, power: f64) -> Color {
        if palette.is_empty() {
            return color;
        }

        find_n_closest_into(color, palette, nearest, &mut self.candidates);
        let closest = &self.candidates;
        let Some(first) = closest.first() else {
            // nearest == 0 leaves nothing to blend
            return color;
        };
        if closest.len() == 1 || first.distance == 0.0 {
            return first.color;
        }

        self.colors.clear();
        self.weights.clear();
        let mut total_weight = 0.0;
        for c in closest {
            if c.distance == 0.0 {
                return c.color;
            }
            let weight = 1.0 / c.distance.sqrt().powf(power);
            self.colors.push(c.color);
            self.weights.push(weight);
            total_weight += weight;
        }

        if total_weight == 0.0 {
            return first.color;
        }
        blend(&self.colors, &self.weights)
    }
}
