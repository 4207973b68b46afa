//! Capabilities the engine needs from its host.
//!
//! The browser implementations live in `renderer` and `browser`. Tests plug in
//! deterministic fakes so the fade and motion state machine can be driven
//! frame by frame without a display.

use std::rc::Rc;

/// The surface particles are painted on.
pub trait RenderTarget {
    /// Laid-out size of the surface in CSS pixels.
    fn client_size(&self) -> (f64, f64);

    /// Drawing buffer size in device pixels.
    fn pixel_size(&self) -> (f64, f64);

    fn set_pixel_size(&mut self, width: u32, height: u32);

    fn set_z_index(&mut self, z_index: i32);

    fn clear(&mut self);

    fn set_global_alpha(&mut self, alpha: f64);

    fn set_fill_color(&mut self, color: &str);

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);

    /// Removes the surface from its container. Called once, on destroy.
    fn detach(&mut self);
}

/// Identifies a scheduled frame callback so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub type FrameCallback = Box<dyn FnOnce()>;

/// "Run this before the next repaint".
pub trait FrameScheduler {
    /// `None` when the host refused to schedule the callback.
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle>;

    fn cancel(&self, handle: FrameHandle);
}

pub trait Environment {
    /// Monotonic time in milliseconds.
    fn now(&self) -> f64;

    fn device_pixel_ratio(&self) -> f64;

    fn is_dark_appearance(&self) -> bool;
}

pub type ResizeCallback = Box<dyn FnMut()>;

pub trait ResizeSource {
    /// Starts delivering size-change notifications to `callback`.
    fn observe(&mut self, callback: ResizeCallback) -> Box<dyn ResizeSubscription>;
}

pub trait ResizeSubscription {
    /// Stops notifications. After this returns the callback never runs again.
    fn disconnect(&mut self);
}

/// Uniform samples in [0, 1).
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Everything an engine is built from.
pub struct Host {
    pub target: Box<dyn RenderTarget>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub environment: Rc<dyn Environment>,
    pub resize: Box<dyn ResizeSource>,
    pub random: Box<dyn RandomSource>,
}
