/// Whole-image recolor:
/// decode -> normalize to RGBA8 -> split rows into bands -> per-pixel policy
/// on each band in parallel -> join -> encode PNG
use std::borrow::Cow;
use std::io::Cursor;
use std::ops::Range;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::color::{normalize_image, normalize_premultiplied_rgba, Color};
use crate::error::{RecolorError, Result};
use crate::palette::Palette;
use crate::params::RecolorParams;
use crate::recolor::PixelRecolorer;

/// Number of workers for an image `height` rows tall.
///
/// Never more workers than rows and never zero, even for an empty image.
pub fn worker_count(available: usize, height: u32) -> usize {
    available.min(height as usize).max(1)
}

/// Row range each worker owns.
///
/// Bands are `ceil(height / workers)` rows; the last one may be short and
/// trailing workers may get an empty range. Together they cover
/// `0..height` exactly once.
pub fn row_bands(height: u32, workers: usize) -> Vec<Range<u32>> {
    let workers = worker_count(workers, height);
    let rows_per_worker = height.div_ceil(workers as u32);
    (0..workers as u32)
        .map(|i| {
            let start = (i * rows_per_worker).min(height);
            let end = (start + rows_per_worker).min(height);
            start..end
        })
        .collect()
}

/// Threads the dispatcher may use: the rayon pool size, or 1 when built
/// without the `parallel` feature.
pub fn available_parallelism() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Recolor a canonical RGBA8 image using every available worker.
pub fn recolor_rgba(src: &RgbaImage, palette: &Palette, params: &RecolorParams) -> RgbaImage {
    recolor_with_workers(src, palette, params, available_parallelism())
}

/// Recolor with an explicit worker budget.
///
/// Output does not depend on `workers`; only the band split does.
pub fn recolor_with_workers(
    src: &RgbaImage,
    palette: &Palette,
    params: &RecolorParams,
    workers: usize,
) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let bands = row_bands(height, workers);
    let stride = width as usize * 4;
    debug!(
        "recoloring {}x{} with {} palette colors: {} workers, {} rows per band",
        width,
        height,
        palette.len(),
        bands.len(),
        bands[0].len()
    );

    let jobs = split_bands(&mut out, src.as_raw(), stride, &bands);
    let work = |(index, (band_out, band_in)): (usize, (&mut [u8], &[u8]))| {
        recolor_band(band_in, band_out, palette, params);
        trace!("band {} done ({} rows)", index, band_out.len() / stride);
    };

    #[cfg(feature = "parallel")]
    jobs.into_par_iter().enumerate().for_each(work);

    #[cfg(not(feature = "parallel"))]
    jobs.into_iter().enumerate().for_each(work);

    out
}

/// Cut `dst` into one disjoint byte slice per row band and pair each with
/// the matching rows of `src`.
fn split_bands<'d, 's>(
    dst: &'d mut [u8],
    src: &'s [u8],
    stride: usize,
    bands: &[Range<u32>],
) -> Vec<(&'d mut [u8], &'s [u8])> {
    let mut rest = dst;
    bands
        .iter()
        .map(|band| {
            let start = band.start as usize * stride;
            let len = band.len() * stride;
            let (band_out, tail) = std::mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            (band_out, &src[start..start + len])
        })
        .collect()
}

/// Apply the per-pixel policy to one band, row-major.
fn recolor_band(src: &[u8], dst: &mut [u8], palette: &Palette, params: &RecolorParams) {
    let mut recolorer = PixelRecolorer::new(palette, params);
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let c = recolorer.recolor(Color::rgba(s[0], s[1], s[2], s[3]));
        d.copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }
}

/// Recolor any decoded image. Non-RGBA8 inputs are converted first.
pub fn recolor_image(img: &DynamicImage, palette: &Palette, params: &RecolorParams) -> RgbaImage {
    let rgba: Cow<'_, RgbaImage> = normalize_image(img);
    recolor_rgba(&rgba, palette, params)
}

/// Recolor a raw RGBA8 buffer, e.g. canvas pixel data.
///
/// Set `premultiplied` when the color channels are already scaled by alpha.
pub fn recolor_raw_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    premultiplied: bool,
    palette: &Palette,
    params: &RecolorParams,
) -> Result<RgbaImage> {
    let mismatch = || RecolorError::DimensionMismatch {
        len: data.len(),
        width,
        height,
    };
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(mismatch)?;
    if data.len() != expected {
        return Err(mismatch());
    }

    let mut buf = data.to_vec();
    if premultiplied {
        normalize_premultiplied_rgba(&mut buf);
    }
    let src = RgbaImage::from_raw(width, height, buf).ok_or_else(mismatch)?;
    Ok(recolor_rgba(&src, palette, params))
}

/// Encode as PNG. Lossless, so recolored pixels survive byte for byte.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

/// Decode an encoded image (PNG, JPEG, WebP, ...), recolor it, return PNG bytes.
pub fn recolor_bytes(bytes: &[u8], palette: &Palette, params: &RecolorParams) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let result = recolor_image(&img, palette, params);
    encode_png(&result)
}

/// Recolor one image file and write the result as PNG.
pub fn recolor_file(
    input_path: &Path,
    output_path: &Path,
    palette: &Palette,
    params: &RecolorParams,
) -> Result<()> {
    let img = image::open(input_path)?;
    let result = recolor_image(&img, palette, params);
    result.save_with_format(output_path, ImageFormat::Png)?;
    Ok(())
}
