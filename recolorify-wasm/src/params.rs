use js_sys::Array;
use recolorify_core::palette::parse_palette_json;
use recolorify_core::Palette as CorePalette;
use recolorify_core::RecolorParams as CoreRecolorParams;
use wasm_bindgen::prelude::*;

use crate::utils::{console_log, js_error};

/// Tuning knobs for a recolor.
#[wasm_bindgen]
pub struct RecolorParams {
    pub(crate) inner: CoreRecolorParams,
}

#[wasm_bindgen]
impl RecolorParams {
    /// Create parameters from raw UI values. Out-of-range values fall back to
    /// their defaults; `max_distance <= 0` disables the threshold.
    #[wasm_bindgen(constructor)]
    pub fn new(luminosity: f64, nearest: i32, power: f64, max_distance: f64) -> Self {
        Self {
            inner: CoreRecolorParams::sanitized(
                Some(luminosity),
                Some(nearest as i64),
                Some(power),
                Some(max_distance),
            ),
        }
    }

    /// luminosity 1.0, nearest 30, power 4.0, no distance threshold.
    pub fn defaults() -> Self {
        Self {
            inner: CoreRecolorParams::default(),
        }
    }

    /// Named preset: balanced, soft, crisp or strict.
    #[wasm_bindgen(js_name = fromPreset)]
    pub fn from_preset(name: &str) -> Result<RecolorParams, JsValue> {
        CoreRecolorParams::from_preset(name)
            .map(|inner| Self { inner })
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preset '{}'", name)))
    }

    #[wasm_bindgen(getter)]
    pub fn luminosity(&self) -> f64 {
        self.inner.luminosity
    }

    #[wasm_bindgen(getter)]
    pub fn nearest(&self) -> u32 {
        self.inner.nearest as u32
    }

    #[wasm_bindgen(getter)]
    pub fn power(&self) -> f64 {
        self.inner.power
    }

    #[wasm_bindgen(getter, js_name = maxDistance)]
    pub fn max_distance(&self) -> f64 {
        self.inner.max_distance
    }
}

/// Palette of allowed output colors.
#[wasm_bindgen]
pub struct Palette {
    pub(crate) inner: CorePalette,
}

#[wasm_bindgen]
impl Palette {
    /// Build a palette from an array of hex strings. Any malformed entry is
    /// an error.
    #[wasm_bindgen(js_name = fromHexList)]
    pub fn from_hex_list(hexes: Array) -> Result<Palette, JsValue> {
        let entries = array_to_strings(&hexes)?;
        CorePalette::parse_hex_list(&entries)
            .map(|inner| Self { inner })
            .map_err(|e| js_error("Invalid palette", e))
    }

    /// Parse palette JSON (`["#RRGGBB"]` or `[{"hex": "#RRGGBB"}]`).
    ///
    /// With `skip_invalid`, malformed entries are dropped (and logged); the
    /// palette is still rejected if nothing valid remains.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(text: &str, skip_invalid: bool) -> Result<Palette, JsValue> {
        let entries = parse_palette_json(text).map_err(|e| js_error("Invalid palette", e))?;
        let inner = if skip_invalid {
            let (palette, rejected) = CorePalette::parse_hex_list_nonempty(&entries)
                .map_err(|e| js_error("Invalid palette", e))?;
            for e in &rejected {
                console_log!("skipping palette entry: {}", e);
            }
            palette
        } else {
            CorePalette::parse_hex_list(&entries).map_err(|e| js_error("Invalid palette", e))?
        };
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Colors as uppercase `#RRGGBB` strings.
    #[wasm_bindgen(js_name = toHexList)]
    pub fn to_hex_list(&self) -> Array {
        self.inner
            .to_hex_strings()
            .into_iter()
            .map(JsValue::from)
            .collect()
    }
}

fn array_to_strings(values: &Array) -> Result<Vec<String>, JsValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_string()
                .ok_or_else(|| JsValue::from_str(&format!("Palette entry {} is not a string", i)))
        })
        .collect()
}
