//! Snowfall simulation state: the particle set plus the opacity transition.

use crate::constants::*;
use crate::host::{RandomSource, RenderTarget};
use crate::particle::{FrameContext, Particle};

#[derive(Debug, Default)]
pub struct Snowfall {
    particles: Vec<Particle>,
    opacity: f64,
    target_opacity: f64,
    last_time: f64,
}

/// Host-derived inputs for a single frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub now: f64,
    pub pixel_ratio: f64,
    pub color: &'a str,
}

impl Snowfall {
    pub fn new(count: usize, rng: &mut dyn RandomSource) -> Self {
        let mut snowfall = Self::default();
        snowfall.reseed(count, rng);
        snowfall
    }

    /// Replaces the whole particle set.
    pub fn reseed(&mut self, count: usize, rng: &mut dyn RandomSource) {
        self.particles = (0..count).map(|_| Particle::spawn(rng)).collect();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn target_opacity(&self) -> f64 {
        self.target_opacity
    }

    pub fn set_target_opacity(&mut self, target: f64) {
        self.target_opacity = target;
    }

    /// Resets the frame clock so the next frame moves nothing.
    pub fn set_clock(&mut self, now: f64) {
        self.last_time = now;
    }

    /// Fully transparent with nothing left to fade in.
    pub fn is_faded_out(&self) -> bool {
        self.opacity.abs() < OPACITY_EPSILON && self.target_opacity == 0.0
    }

    /// Eases opacity, repaints the target and advances every particle.
    pub fn draw(&mut self, input: FrameInput<'_>, target: &mut dyn RenderTarget) {
        self.opacity += (self.target_opacity - self.opacity) * OPACITY_EASING;

        let (width, height) = target.pixel_size();
        let delta = (input.now - self.last_time) / FRAME_REFERENCE_MS;

        target.set_global_alpha(self.opacity);
        target.clear();
        target.set_fill_color(input.color);

        if width > 0.0 && height > 0.0 {
            let frame = FrameContext {
                width,
                height,
                pixel_ratio: input.pixel_ratio,
                now: input.now,
                delta,
            };
            for particle in &mut self.particles {
                particle.step(&frame, target);
            }
        }

        self.last_time = input.now;
    }
}
