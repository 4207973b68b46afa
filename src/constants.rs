//! Snowfall constants

// Defaults
pub const DEFAULT_PARTICLE_COUNT: usize = 2000;
pub const DEFAULT_COLOR_DARK: &str = "white";
pub const DEFAULT_COLOR_LIGHT: &str = "#add8e6";
pub const DEFAULT_Z_INDEX: i32 = 9999;

// Opacity transition
pub const OPACITY_EASING: f64 = 0.05;
pub const OPACITY_EPSILON: f64 = 1e-6;

// Motion
/// Reference frame length in milliseconds; `delta` is measured in these units.
pub const FRAME_REFERENCE_MS: f64 = 16.0;
/// Sway amplitude is the surface dimension divided by this.
pub const SWAY_DIVISOR: f64 = 200.0;

// Particle distributions
pub const MIN_FREQUENCY: f64 = 1.0;
pub const FREQUENCY_SPREAD: f64 = 5.0;
pub const MIN_SIZE: f64 = 0.1;
pub const SIZE_SPREAD: f64 = 1.4;

// Theme detection
pub const DARK_MODE_CLASS: &str = "dark-mode";
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub const LOG_PREFIX: &str = "[snowdrift]";
