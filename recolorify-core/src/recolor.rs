/// Per-pixel recolor policy.
///
/// Order per pixel:
///
/// - alpha == 0 -> transparent, nothing else computed
/// - empty palette -> unchanged
/// - farther than `max_distance` from every palette color -> unchanged
/// - otherwise luminosity, then Shepard blend
///
/// The distance threshold looks at the source color, not the
/// luminosity-adjusted one.
use crate::color::Color;
use crate::distance::nearest_distance;
use crate::palette::Palette;
use crate::params::RecolorParams;
use crate::shepard::ShepardScratch;

/// Scale RGB by `factor`, clamped to 0..=255 and rounded. Alpha is kept.
pub fn apply_luminosity(c: Color, factor: f64) -> Color {
    let scale = |v: u8| (v as f64 * factor).clamp(0.0, 255.0).round() as u8;
    Color::rgba(scale(c.r), scale(c.g), scale(c.b), c.a)
}

/// Applies the policy to a stream of pixels, reusing its scratch buffers.
///
/// One per worker; it is cheap to build and not meant to be shared.
pub struct PixelRecolorer<'a> {
    palette: &'a Palette,
    params: &'a RecolorParams,
    max_distance_sq: Option<f64>,
    scratch: ShepardScratch,
}

impl<'a> PixelRecolorer<'a> {
    pub fn new(palette: &'a Palette, params: &'a RecolorParams) -> Self {
        Self {
            palette,
            params,
            max_distance_sq: params.max_distance_sq(),
            scratch: ShepardScratch::default(),
        }
    }

    pub fn recolor(&mut self, c: Color) -> Color {
        if c.is_transparent() {
            return Color::TRANSPARENT;
        }
        if self.palette.is_empty() {
            return c;
        }
        if let Some(limit) = self.max_distance_sq {
            if nearest_distance(c, self.palette) > limit {
                return c;
            }
        }

        let adjusted = apply_luminosity(c, self.params.luminosity);
        self.scratch
            .apply(adjusted, self.palette, self.params.nearest, self.params.power)
    }
}

/// One-off version of [`PixelRecolorer::recolor`].
pub fn recolor_pixel(c: Color, palette: &Palette, params: &RecolorParams) -> Color {
    PixelRecolorer::new(palette, params).recolor(c)
}
