//! Canvas 2D render target

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::constants::LOG_PREFIX;
use crate::error::SnowError;
use crate::host::RenderTarget;

/// Full-viewport overlay that never intercepts input.
const OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("pointer-events", "none"),
];

pub struct CanvasTarget {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasTarget {
    /// Creates a styled `<canvas>` and appends it to `container`.
    pub fn attach(
        document: &Document,
        container: &HtmlElement,
        z_index: i32,
    ) -> Result<Self, SnowError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(SnowError::dom)?
            .dyn_into()
            .map_err(|el| SnowError::dom(el.into()))?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(SnowError::dom)?
            .ok_or(SnowError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| SnowError::ContextUnavailable)?;

        let style = canvas.style();
        for (name, value) in OVERLAY_STYLE {
            style.set_property(name, value).map_err(SnowError::dom)?;
        }
        style
            .set_property("z-index", &z_index.to_string())
            .map_err(SnowError::dom)?;

        container.append_child(&canvas).map_err(SnowError::dom)?;

        Ok(Self { canvas, ctx })
    }
}

impl RenderTarget for CanvasTarget {
    fn client_size(&self) -> (f64, f64) {
        (
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        )
    }

    fn pixel_size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_z_index(&mut self, z_index: i32) {
        if let Err(e) = self
            .canvas
            .style()
            .set_property("z-index", &z_index.to_string())
        {
            log::warn!("{LOG_PREFIX} failed to set z-index: {e:?}");
        }
    }

    fn clear(&mut self) {
        let (width, height) = self.pixel_size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        // Only fails on a negative radius.
        if self.ctx.arc(x, y, radius, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn detach(&mut self) {
        self.canvas.remove();
    }
}
