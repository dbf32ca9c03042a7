/// Squared RGB distance and nearest-candidate search over a palette.
///
/// Distances are only ever compared with each other (or with a squared
/// threshold), so the square root is never taken here.
use crate::color::Color;
use crate::palette::Palette;

/// A palette color together with its squared distance to the query color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub distance: f64,
    pub color: Color,
}

/// Sum of squared red, green and blue differences. Alpha is ignored.
#[inline]
pub fn squared_distance(a: Color, b: Color) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    dr * dr + dg * dg + db * db
}

/// Smallest squared distance from `color` to any palette entry.
///
/// An empty palette yields `f64::INFINITY`. Callers applying a distance
/// threshold must treat that as "never exceeded".
pub fn nearest_distance(color: Color, palette: &Palette) -> f64 {
    palette
        .iter()
        .map(|&p| squared_distance(color, p))
        .fold(f64::INFINITY, f64::min)
}

/// The `n` palette entries closest to `color`, nearest first.
///
/// Ties keep palette order. Returns `min(n, palette.len())` candidates.
pub fn find_n_closest(color: Color, palette: &Palette, n: usize) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(palette.len());
    find_n_closest_into(color, palette, n, &mut out);
    out
}

/// Same as [`find_n_closest`] but reuses `out` to avoid a per-pixel allocation.
pub fn find_n_closest_into(color: Color, palette: &Palette, n: usize, out: &mut Vec<Candidate>) {
    out.clear();
    out.extend(palette.iter().map(|&p| Candidate {
        distance: squared_distance(color, p),
        color: p,
    }));
    // sort_by is stable, which keeps equal distances in palette order
    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    out.truncate(n);
}
