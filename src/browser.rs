//! Browser implementations of the host capabilities.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Math;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, ResizeObserver, Window};

use crate::constants::*;
use crate::host::*;

/// A scheduled frame's JS closure plus whether it has already run.
type FrameSlot = (Rc<Cell<bool>>, Closure<dyn FnMut()>);

/// Frames driven by `requestAnimationFrame`.
///
/// Closures are owned here rather than leaked to JS, so a cancelled frame is
/// freed by `cancel` and a fired one on the next `request`.
pub struct AnimationFrameScheduler {
    window: Window,
    frames: RefCell<HashMap<i32, FrameSlot>>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            frames: RefCell::new(HashMap::new()),
        }
    }

    /// Closures still held, fired or not.
    pub fn retained(&self) -> usize {
        self.frames.borrow().len()
    }

    // A closure cannot be freed while it runs, so fired slots are swept on
    // the next request instead.
    fn sweep(&self) {
        self.frames.borrow_mut().retain(|_, (fired, _)| !fired.get());
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
        self.sweep();

        let fired = Rc::new(Cell::new(false));
        let done = fired.clone();
        let closure = Closure::<dyn FnMut()>::once(move || {
            callback();
            done.set(true);
        });

        match self.window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.frames.borrow_mut().insert(id, (fired, closure));
                Some(FrameHandle(id))
            }
            Err(e) => {
                log::error!("{LOG_PREFIX} requestAnimationFrame failed: {e:?}");
                None
            }
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("{LOG_PREFIX} cancelAnimationFrame failed: {e:?}");
        }
        self.frames.borrow_mut().remove(&handle.0);
        self.sweep();
    }
}

pub struct BrowserEnvironment {
    window: Window,
}

impl BrowserEnvironment {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn has_dark_mode_class(&self) -> bool {
        self.window
            .document()
            .and_then(|d| d.body())
            .is_some_and(|body| body.class_list().contains(DARK_MODE_CLASS))
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.window
            .match_media(DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }
}

impl Environment for BrowserEnvironment {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn is_dark_appearance(&self) -> bool {
        // The page's explicit class wins over the system preference.
        self.has_dark_mode_class() || self.prefers_dark_scheme()
    }
}

/// Watches an element's box with a `ResizeObserver`.
pub struct ElementResizeSource {
    element: Element,
}

impl ElementResizeSource {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ResizeSource for ElementResizeSource {
    fn observe(&mut self, mut callback: ResizeCallback) -> Box<dyn ResizeSubscription> {
        let closure = Closure::<dyn FnMut()>::new(move || callback());

        match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.element);
                Box::new(ResizeObservation {
                    observer: Some(observer),
                    _closure: Some(closure),
                })
            }
            Err(e) => {
                log::warn!("{LOG_PREFIX} ResizeObserver unavailable, size is fixed: {e:?}");
                Box::new(ResizeObservation {
                    observer: None,
                    _closure: None,
                })
            }
        }
    }
}

struct ResizeObservation {
    observer: Option<ResizeObserver>,
    // Must outlive the observer's registration.
    _closure: Option<Closure<dyn FnMut()>>,
}

impl ResizeSubscription for ResizeObservation {
    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self._closure = None;
    }
}

impl Drop for ResizeObservation {
    fn drop(&mut self) {
        self.disconnect();
    }
}

pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_f64(&mut self) -> f64 {
        Math::random()
    }
}
