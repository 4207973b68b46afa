//! Snowflake particles

use std::f64::consts::TAU;

use crate::constants::*;
use crate::host::{RandomSource, RenderTarget};

/// One snowflake. Position is normalized to the surface so it survives
/// resizes; everything else is fixed at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub freqx: f64,
    pub freqy: f64,
    pub phasex: f64,
    pub phasey: f64,
    pub size: f64,
}

/// Per-frame values shared by every particle.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    /// Wall-clock time in milliseconds, drives the sway phase.
    pub now: f64,
    /// Elapsed time in reference frames, drives the drift.
    pub delta: f64,
}

impl Particle {
    pub fn spawn(rng: &mut dyn RandomSource) -> Self {
        let mut rand = || rng.next_f64();
        Self {
            x: rand(),
            y: rand(),
            vx: rand() - 0.5,
            vy: (1.0 + rand() * 10.0) / 10.0,
            freqx: MIN_FREQUENCY + rand() * FREQUENCY_SPREAD,
            freqy: MIN_FREQUENCY + rand() * FREQUENCY_SPREAD,
            size: MIN_SIZE + rand() * SIZE_SPREAD,
            phasex: rand() * TAU,
            phasey: rand() * TAU,
        }
    }

    /// Paints the flake at its swayed position, then advances and wraps it.
    pub fn step(&mut self, frame: &FrameContext, target: &mut dyn RenderTarget) {
        let (width, height) = (frame.width, frame.height);

        // Smaller flakes and larger surfaces mean slower normalized drift.
        let k = (2.0 * self.vx) / self.size / width;
        let l = (2.0 * self.vy) / self.size / height;

        let osc_x = (width / SWAY_DIVISOR) * (self.freqx * frame.now * l + self.phasex).sin();
        let osc_y = (height / SWAY_DIVISOR) * (self.freqy * frame.now * k + self.phasey).sin();

        target.fill_circle(
            self.x * width + osc_x,
            self.y * height + osc_y,
            self.size * frame.pixel_ratio,
        );

        self.x = wrap_unit(self.x + k * frame.delta);
        self.y = wrap_unit(self.y + l * frame.delta);
    }
}

/// Wraps `v` into [0, 1).
pub fn wrap_unit(v: f64) -> f64 {
    let wrapped = v.rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0.
    if wrapped.is_nan() || wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
