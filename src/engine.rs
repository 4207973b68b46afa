//! The animation engine: frame loop, fade state machine, resize handling and
//! teardown.
//!
//! State lives behind `Rc<RefCell<_>>`. Frame and resize callbacks only keep a
//! `Weak` to it, so a callback the host delivers late (after `destroy`, or
//! after the engine was dropped) finds nothing to act on.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::animation::{FrameInput, Snowfall};
use crate::config::{OptionsPatch, SnowOptions};
use crate::constants::LOG_PREFIX;
use crate::host::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Frame-loop bookkeeping. Lives outside the `RefCell` so a frame that finds
/// the engine state borrowed can still reschedule itself.
struct FrameLoop {
    scheduler: Rc<dyn FrameScheduler>,
    state: Cell<LoopState>,
    pending: Cell<Option<FrameHandle>>,
}

impl FrameLoop {
    /// Requests the next frame, going idle if the host refuses.
    fn request(self: &Rc<Self>, shared: &Weak<RefCell<Shared>>) {
        let frames = Rc::downgrade(self);
        let shared = shared.clone();
        let handle = self
            .scheduler
            .request(Box::new(move || run_frame(&shared, &frames)));

        self.pending.set(handle);
        if handle.is_none() {
            self.state.set(LoopState::Idle);
            log::warn!("{LOG_PREFIX} host refused to schedule a frame, loop suspended");
        }
    }

    fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.state.set(LoopState::Idle);
    }
}

struct Shared {
    snowfall: Snowfall,
    options: SnowOptions,
    target: Box<dyn RenderTarget>,
    environment: Rc<dyn Environment>,
    random: Box<dyn RandomSource>,
    frames: Rc<FrameLoop>,
    resize: Option<Box<dyn ResizeSubscription>>,
    destroyed: bool,
}

impl Shared {
    fn draw(&mut self, now: f64) {
        let color = if self.environment.is_dark_appearance() {
            &self.options.color_dark
        } else {
            &self.options.color_light
        };
        let input = FrameInput {
            now,
            pixel_ratio: self.environment.device_pixel_ratio(),
            color,
        };
        self.snowfall.draw(input, self.target.as_mut());
    }

    fn resize(&mut self) {
        let ratio = self.environment.device_pixel_ratio();
        let (width, height) = self.target.client_size();
        self.target
            .set_pixel_size((width * ratio) as u32, (height * ratio) as u32);
    }
}

/// Handle to a snowfall animation bound to one surface.
pub struct SnowEngine {
    shared: Rc<RefCell<Shared>>,
    frames: Rc<FrameLoop>,
}

impl SnowEngine {
    /// Builds the engine, sizes the target and subscribes to resizes. Nothing
    /// is drawn until [`start`](Self::start).
    pub fn new(host: Host, options: SnowOptions) -> Self {
        let Host {
            mut target,
            scheduler,
            environment,
            mut resize,
            mut random,
        } = host;

        target.set_z_index(options.z_index);
        let snowfall = Snowfall::new(options.count, random.as_mut());

        let frames = Rc::new(FrameLoop {
            scheduler,
            state: Cell::new(LoopState::Idle),
            pending: Cell::new(None),
        });
        let shared = Rc::new(RefCell::new(Shared {
            snowfall,
            options,
            target,
            environment,
            random,
            frames: frames.clone(),
            resize: None,
            destroyed: false,
        }));

        let weak = Rc::downgrade(&shared);
        let subscription = resize.observe(Box::new(move || on_resize(&weak)));
        {
            let mut state = shared.borrow_mut();
            state.resize = Some(subscription);
            state.resize();
            log::info!(
                "{LOG_PREFIX} engine created with {} particles",
                state.snowfall.particles().len()
            );
        }

        Self { shared, frames }
    }

    /// Fades in. Starts the frame loop if it is idle.
    pub fn start(&self) {
        {
            let mut state = self.shared.borrow_mut();
            if state.destroyed {
                log::warn!("{LOG_PREFIX} start() called on a destroyed engine");
                return;
            }
            state.snowfall.set_target_opacity(1.0);
            if self.frames.state.get() == LoopState::Running {
                return;
            }
            self.frames.state.set(LoopState::Running);
            let now = state.environment.now();
            state.snowfall.set_clock(now);
        }

        log::debug!("{LOG_PREFIX} frame loop started");
        run_frame(&Rc::downgrade(&self.shared), &Rc::downgrade(&self.frames));
    }

    /// Fades out. The loop idles by itself once fully transparent.
    pub fn stop(&self) {
        let mut state = self.shared.borrow_mut();
        if state.destroyed {
            log::warn!("{LOG_PREFIX} stop() called on a destroyed engine");
            return;
        }
        state.snowfall.set_target_opacity(0.0);
    }

    pub fn toggle(&self) {
        if self.target_opacity() == 0.0 {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Merges `patch` into the current options. A changed count replaces the
    /// particle set with fresh random particles.
    pub fn update_options(&self, patch: &OptionsPatch) {
        let mut state = self.shared.borrow_mut();
        if state.destroyed {
            log::warn!("{LOG_PREFIX} update_options() called on a destroyed engine");
            return;
        }

        let changes = state.options.apply(patch);
        let Shared {
            snowfall,
            options,
            target,
            random,
            ..
        } = &mut *state;

        if changes.count {
            snowfall.reseed(options.count, random.as_mut());
            log::debug!("{LOG_PREFIX} reallocated {} particles", options.count);
        }
        if changes.z_index {
            target.set_z_index(options.z_index);
        }
    }

    /// Releases the resize subscription, the pending frame and the render
    /// target. Further calls on this engine are no-ops.
    pub fn destroy(&self) {
        let mut state = self.shared.borrow_mut();
        if state.destroyed {
            return;
        }

        state.snowfall.set_target_opacity(0.0);
        if let Some(mut subscription) = state.resize.take() {
            subscription.disconnect();
        }
        self.frames.cancel();
        state.target.detach();
        state.destroyed = true;

        log::info!("{LOG_PREFIX} engine destroyed");
    }

    pub fn opacity(&self) -> f64 {
        self.shared.borrow().snowfall.opacity()
    }

    pub fn target_opacity(&self) -> f64 {
        self.shared.borrow().snowfall.target_opacity()
    }

    pub fn loop_state(&self) -> LoopState {
        self.frames.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.loop_state() == LoopState::Running
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.borrow().destroyed
    }

    pub fn particle_count(&self) -> usize {
        self.shared.borrow().snowfall.particles().len()
    }

    pub fn options(&self) -> SnowOptions {
        self.shared.borrow().options.clone()
    }

    #[cfg(test)]
    fn particles(&self) -> Vec<crate::particle::Particle> {
        self.shared.borrow().snowfall.particles().to_vec()
    }
}

impl Drop for SnowEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// One tick of the frame loop.
fn run_frame(shared: &Weak<RefCell<Shared>>, frames: &Weak<FrameLoop>) {
    let (Some(strong), Some(frames)) = (shared.upgrade(), frames.upgrade()) else {
        return;
    };

    frames.pending.set(None);
    if frames.state.get() == LoopState::Idle {
        return;
    }

    let Ok(mut state) = strong.try_borrow_mut() else {
        log::debug!("{LOG_PREFIX} engine busy, frame deferred");
        frames.request(shared);
        return;
    };
    if state.destroyed {
        return;
    }

    if state.snowfall.is_faded_out() {
        frames.state.set(LoopState::Idle);
        state.target.clear();
        log::debug!("{LOG_PREFIX} faded out, frame loop suspended");
        return;
    }

    let now = state.environment.now();
    state.draw(now);
    drop(state);

    frames.request(shared);
}

fn on_resize(weak: &Weak<RefCell<Shared>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut state) = shared.try_borrow_mut() else {
        log::debug!("{LOG_PREFIX} resize skipped: engine busy");
        return;
    };
    if state.destroyed {
        return;
    }

    state.resize();
    if state.frames.state.get() == LoopState::Running && state.snowfall.opacity() > 0.0 {
        let now = state.environment.now();
        state.draw(now);
    }
}
