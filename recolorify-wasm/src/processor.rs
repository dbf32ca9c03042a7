use recolorify_core::pipeline::{encode_png, recolor_image, recolor_raw_rgba};
use wasm_bindgen::prelude::*;

use crate::params::{Palette, RecolorParams};
use crate::utils::{console_log, js_error};

/// Main image processor for recolorify.
#[wasm_bindgen]
pub struct RecolorProcessor;

#[wasm_bindgen]
impl RecolorProcessor {
    /// Recolor an encoded image.
    ///
    /// # Arguments
    /// * `image_bytes` - Input image as byte array (PNG, JPEG, WebP, etc.)
    /// * `params` - Tuning parameters
    /// * `palette` - Palette to recolor with
    ///
    /// # Returns
    /// PNG-encoded image bytes
    #[wasm_bindgen(js_name = processImage)]
    pub fn process_image(
        image_bytes: &[u8],
        params: &RecolorParams,
        palette: &Palette,
    ) -> Result<Vec<u8>, JsValue> {
        let img = image::load_from_memory(image_bytes)
            .map_err(|e| js_error("Failed to load image", e))?;
        console_log!(
            "recolorify: {}x{} against {} colors",
            img.width(),
            img.height(),
            palette.inner.len()
        );

        let result = recolor_image(&img, &palette.inner, &params.inner);

        // PNG keeps every recolored pixel exact
        encode_png(&result).map_err(|e| js_error("Failed to encode PNG", e))
    }

    /// Recolor raw RGBA pixels, e.g. from a canvas `ImageData`.
    ///
    /// Set `premultiplied` if the color channels are scaled by alpha.
    /// Returns straight (non-premultiplied) RGBA bytes of the same size.
    #[wasm_bindgen(js_name = processRgba)]
    pub fn process_rgba(
        data: &[u8],
        width: u32,
        height: u32,
        premultiplied: bool,
        params: &RecolorParams,
        palette: &Palette,
    ) -> Result<Vec<u8>, JsValue> {
        let result =
            recolor_raw_rgba(data, width, height, premultiplied, &palette.inner, &params.inner)
                .map_err(|e| js_error("Failed to process pixels", e))?;
        Ok(result.into_raw())
    }
}
