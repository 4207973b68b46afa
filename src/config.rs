//! Snowfall configuration

use crate::constants::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Debug, PartialEq)]
pub struct SnowOptions {
    pub count: usize,

    #[wasm_bindgen(getter_with_clone, js_name = colorDark)]
    pub color_dark: String,

    #[wasm_bindgen(getter_with_clone, js_name = colorLight)]
    pub color_light: String,

    #[wasm_bindgen(js_name = zIndex)]
    pub z_index: i32,
}

impl Default for SnowOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            color_dark: DEFAULT_COLOR_DARK.into(),
            color_light: DEFAULT_COLOR_LIGHT.into(),
            z_index: DEFAULT_Z_INDEX,
        }
    }
}

#[wasm_bindgen]
impl SnowOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnowOptions {
    /// Reads options from a JS object, falling back to defaults for anything
    /// missing or malformed.
    pub fn from_js(value: &JsValue) -> Self {
        let mut options = Self::default();
        options.apply(&OptionsPatch::from_js(value));
        options
    }

    /// Merges `patch` into these options. Returns what changed.
    pub fn apply(&mut self, patch: &OptionsPatch) -> Changes {
        let mut changes = Changes::default();

        if let Some(count) = patch.count {
            changes.count = count != self.count;
            self.count = count;
        }
        if let Some(color) = &patch.color_dark {
            self.color_dark = color.clone();
        }
        if let Some(color) = &patch.color_light {
            self.color_light = color.clone();
        }
        if let Some(z_index) = patch.z_index {
            changes.z_index = z_index != self.z_index;
            self.z_index = z_index;
        }

        changes
    }
}

/// Fields of an `apply` that need follow-up work from the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    pub count: bool,
    pub z_index: bool,
}

/// A partial update of [`SnowOptions`]. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionsPatch {
    pub count: Option<usize>,
    pub color_dark: Option<String>,
    pub color_light: Option<String>,
    pub z_index: Option<i32>,
}

impl OptionsPatch {
    pub fn count(count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::default()
        }
    }

    pub fn from_js(value: &JsValue) -> Self {
        let mut patch = Self::default();

        if !value.is_object() {
            // A bare number is shorthand for the particle count.
            if let Some(count) = value.as_f64() {
                patch.count = sanitize_count(count);
            }
            return patch;
        }

        let get = |key: &str| js_sys::Reflect::get(value, &key.into()).ok();

        macro_rules! extract_string {
            ($field:ident, $key:expr) => {
                if let Some(v) = get($key).filter(|v| !v.is_undefined()) {
                    match v.as_string() {
                        Some(s) => patch.$field = Some(s),
                        None => log::warn!("{LOG_PREFIX} ignoring non-string `{}`", $key),
                    }
                }
            };
        }

        if let Some(v) = get("count").filter(|v| !v.is_undefined()) {
            patch.count = v.as_f64().and_then(sanitize_count);
            if patch.count.is_none() {
                log::warn!("{LOG_PREFIX} ignoring invalid `count`: {v:?}");
            }
        }
        if let Some(v) = get("zIndex").filter(|v| !v.is_undefined()) {
            patch.z_index = v.as_f64().and_then(sanitize_z_index);
            if patch.z_index.is_none() {
                log::warn!("{LOG_PREFIX} ignoring invalid `zIndex`: {v:?}");
            }
        }
        extract_string!(color_dark, "colorDark");
        extract_string!(color_light, "colorLight");

        patch
    }
}

/// Negative counts clamp to zero, fractions truncate, non-finite values are
/// rejected.
pub fn sanitize_count(raw: f64) -> Option<usize> {
    if !raw.is_finite() {
        return None;
    }
    Some(raw.max(0.0).trunc() as usize)
}

pub fn sanitize_z_index(raw: f64) -> Option<i32> {
    raw.is_finite().then(|| raw.trunc() as i32)
}
