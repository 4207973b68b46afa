//! JS-facing engine class.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::browser::{
    AnimationFrameScheduler, BrowserEnvironment, ElementResizeSource, MathRandom,
};
use crate::config::{OptionsPatch, SnowOptions};
use crate::engine::SnowEngine;
use crate::error::SnowError;
use crate::host::Host;
use crate::renderer::CanvasTarget;

/// `new SnowEngine(container?, options?)`
///
/// `container` defaults to `document.body`. `options` is an object with any of
/// `count`, `colorDark`, `colorLight`, `zIndex`, or a bare particle count.
#[wasm_bindgen(js_name = SnowEngine)]
pub struct WebSnowEngine {
    engine: SnowEngine,
}

#[wasm_bindgen(js_class = SnowEngine)]
impl WebSnowEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Option<HtmlElement>,
        options: JsValue,
    ) -> Result<WebSnowEngine, JsValue> {
        let options = SnowOptions::from_js(&options);
        let engine = mount(container, options)?;
        Ok(Self { engine })
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    pub fn toggle(&self) {
        self.engine.toggle();
    }

    #[wasm_bindgen(js_name = updateOptions)]
    pub fn update_options(&self, options: JsValue) {
        self.engine.update_options(&OptionsPatch::from_js(&options));
    }

    pub fn destroy(&self) {
        self.engine.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn opacity(&self) -> f64 {
        self.engine.opacity()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.engine.is_running()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.engine.particle_count()
    }

    #[wasm_bindgen(getter)]
    pub fn options(&self) -> SnowOptions {
        self.engine.options()
    }
}

fn mount(container: Option<HtmlElement>, options: SnowOptions) -> Result<SnowEngine, SnowError> {
    let window = web_sys::window().ok_or(SnowError::NoWindow)?;
    let document = window.document().ok_or(SnowError::NoDocument)?;
    let container = match container {
        Some(container) => container,
        None => document.body().ok_or(SnowError::NoContainer)?,
    };

    let target = CanvasTarget::attach(&document, &container, options.z_index)?;
    let host = Host {
        target: Box::new(target),
        scheduler: Rc::new(AnimationFrameScheduler::new(window.clone())),
        environment: Rc::new(BrowserEnvironment::new(window)),
        resize: Box::new(ElementResizeSource::new(container.into())),
        random: Box::new(MathRandom),
    };

    Ok(SnowEngine::new(host, options))
}
