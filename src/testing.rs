//! Deterministic host fakes for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::host::*;

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Resize(u32, u32),
    ZIndex(i32),
    Clear,
    Alpha(f64),
    Fill(String),
    Circle(f64, f64, f64),
    Detach,
}

#[derive(Debug, Default)]
struct TargetState {
    client: (f64, f64),
    pixels: (f64, f64),
    ops: Vec<Op>,
}

/// Records every call; clones share the same log.
#[derive(Clone, Debug)]
pub struct RecordingTarget {
    state: Rc<RefCell<TargetState>>,
}

impl RecordingTarget {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(TargetState {
                client: (width, height),
                pixels: (width, height),
                ops: Vec::new(),
            })),
        }
    }

    pub fn set_client_size(&self, width: f64, height: f64) {
        self.state.borrow_mut().client = (width, height);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn op_count(&self) -> usize {
        self.state.borrow().ops.len()
    }

    pub fn take_ops(&self) -> Vec<Op> {
        std::mem::take(&mut self.state.borrow_mut().ops)
    }

    pub fn circles(&self) -> Vec<(f64, f64, f64)> {
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match *op {
                Op::Circle(x, y, r) => Some((x, y, r)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, op: Op) {
        self.state.borrow_mut().ops.push(op);
    }
}

impl RenderTarget for RecordingTarget {
    fn client_size(&self) -> (f64, f64) {
        self.state.borrow().client
    }

    fn pixel_size(&self) -> (f64, f64) {
        self.state.borrow().pixels
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().pixels = (width as f64, height as f64);
        self.push(Op::Resize(width, height));
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.push(Op::ZIndex(z_index));
    }

    fn clear(&mut self) {
        self.push(Op::Clear);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(Op::Alpha(alpha));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.push(Op::Fill(color.to_string()));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.push(Op::Circle(x, y, radius));
    }

    fn detach(&mut self) {
        self.push(Op::Detach);
    }
}

/// Holds requested frames until the test fires them.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<i32>,
    pending: RefCell<BTreeMap<i32, FrameCallback>>,
    cancelled: RefCell<Vec<FrameHandle>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.cancelled.borrow().clone()
    }

    /// Runs every callback pending right now. Returns how many ran.
    pub fn fire(&self) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let ran = due.len();
        for (_, callback) in due {
            callback();
        }
        ran
    }

    /// Takes the pending callbacks out without running them, as if the host
    /// had already dequeued them.
    pub fn steal(&self) -> Vec<FrameCallback> {
        std::mem::take(&mut *self.pending.borrow_mut())
            .into_values()
            .collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.pending.borrow_mut().insert(id, callback);
        Some(FrameHandle(id))
    }

    fn cancel(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(&handle.0);
        self.cancelled.borrow_mut().push(handle);
    }
}

pub struct ManualEnvironment {
    pub now: Cell<f64>,
    pub pixel_ratio: Cell<f64>,
    pub dark: Cell<bool>,
}

impl ManualEnvironment {
    pub fn new() -> Self {
        Self {
            now: Cell::new(1000.0),
            pixel_ratio: Cell::new(1.0),
            dark: Cell::new(false),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Environment for ManualEnvironment {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio.get()
    }

    fn is_dark_appearance(&self) -> bool {
        self.dark.get()
    }
}

#[derive(Default)]
struct ResizeState {
    callback: Option<ResizeCallback>,
    connected: bool,
}

/// Resize source whose notifications are delivered by `notify`.
#[derive(Clone, Default)]
pub struct ManualResize {
    state: Rc<RefCell<ResizeState>>,
}

impl ManualResize {
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Delivers a notification even when disconnected, like a stale host
    /// event would. The subscription must have dropped the callback.
    pub fn notify(&self) {
        let callback = self.state.borrow_mut().callback.take();
        if let Some(mut callback) = callback {
            callback();
            let mut state = self.state.borrow_mut();
            if state.connected {
                state.callback = Some(callback);
            }
        }
    }
}

impl ResizeSource for ManualResize {
    fn observe(&mut self, callback: ResizeCallback) -> Box<dyn ResizeSubscription> {
        let mut state = self.state.borrow_mut();
        state.callback = Some(callback);
        state.connected = true;
        Box::new(ManualSubscription {
            state: self.state.clone(),
        })
    }
}

struct ManualSubscription {
    state: Rc<RefCell<ResizeState>>,
}

impl ResizeSubscription for ManualSubscription {
    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.connected = false;
        state.callback = None;
    }
}

/// A wired-up host plus handles to every fake.
pub struct Fixture {
    pub target: RecordingTarget,
    pub scheduler: Rc<ManualScheduler>,
    pub environment: Rc<ManualEnvironment>,
    pub resize: ManualResize,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            target: RecordingTarget::new(800.0, 600.0),
            scheduler: Rc::new(ManualScheduler::default()),
            environment: Rc::new(ManualEnvironment::new()),
            resize: ManualResize::default(),
        }
    }

    pub fn host(&self, seed: u64) -> Host {
        Host {
            target: Box::new(self.target.clone()),
            scheduler: self.scheduler.clone(),
            environment: self.environment.clone(),
            resize: Box::new(self.resize.clone()),
            random: Box::new(seeded(seed)),
        }
    }

    /// Advances the clock one reference frame and fires the pending frame.
    pub fn tick(&self) -> usize {
        self.environment.advance(16.0);
        self.scheduler.fire()
    }
}
