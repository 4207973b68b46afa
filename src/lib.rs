//! Snowdrift - ambient canvas snowfall in WASM
//!
//! The engine core (`engine`, `animation`, `particle`) only talks to the page
//! through the capabilities in `host`, so it runs and tests natively. The
//! browser side lives in `renderer`, `browser` and `bindings`.

use wasm_bindgen::prelude::*;

pub mod animation;
pub mod bindings;
pub mod browser;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod host;
pub mod particle;
pub mod renderer;

#[cfg(test)]
mod testing;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

pub use config::{OptionsPatch, SnowOptions};
pub use constants::*;
pub use engine::{LoopState, SnowEngine};
pub use error::SnowError;
pub use host::Host;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // The embedding page may already have installed a logger.
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("{LOG_PREFIX} WASM loaded v{}", version());
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
