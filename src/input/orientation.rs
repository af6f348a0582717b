//! # Orientation Engine
//!
//! Turns raw inertial samples into pointer motion and tilt.
//!
//! The two sensor streams never mix:
//!
//! - **Gyroscope** → relative pointer motion. Rates are negated and swapped
//!   for the landscape mounting (`dx = -rate_z`, `dy = -rate_x`), scaled by
//!   `sensitivity * gain`, then each axis below the dead zone is forced to 0.
//!   A sample with both axes at 0 produces no event.
//! - **Accelerometer** → absolute tilt. The latest gravity vector is kept and
//!   `steer = gy / 9.8`, `drive = gx / 9.8`, each clamped to `[-1, 1]`.
//!
//! Tilt uses the gravity vector alone with a fixed landscape mounting. There
//! is no magnetometer fusion and no smoothing, so a noisy accelerometer gives
//! a jittery tilt.

use crate::config::MotionConfig;
use crate::input::event::{AnalogSource, InputEvent};
use crate::input::joystick::clamp_unit;

/// Gravity magnitude used to normalize tilt (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.8;

/// Gyro rate to pointer delta gain.
pub const DEFAULT_GYRO_GAIN: f64 = 20.0;

/// Pointer deltas below this magnitude are dropped to zero.
pub const DEFAULT_DEAD_ZONE: f64 = 0.1;

/// Angular rates (rad/s) about the device X and Z axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroSample {
    pub rate_x: f64,
    pub rate_z: f64,
}

/// Accelerometer reading (m/s²) in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GravitySample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Normalized steering and drive derived from gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Left/right tilt in landscape, `[-1, 1]`.
    pub steer: f64,
    /// Forward/back tilt in landscape, `[-1, 1]`.
    pub drive: f64,
}

/// A sample from the platform sensor service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorReading {
    Gyroscope(GyroSample),
    Accelerometer(GravitySample),
}

/// Forces values smaller than `dead_zone` in magnitude to exactly zero.
///
/// Unlike a stick dead zone, the remaining range is not rescaled. NaN and
/// infinite values also become zero.
#[must_use]
pub fn apply_dead_zone(value: f64, dead_zone: f64) -> f64 {
    if !value.is_finite() || value.abs() < dead_zone {
        0.0
    } else {
        value
    }
}

/// Derives steering and drive from a gravity vector.
///
/// # Examples
///
/// ```
/// use remote_pad::input::orientation::{tilt_from_gravity, GravitySample};
///
/// let tilt = tilt_from_gravity(GravitySample { x: 4.9, y: 0.0, z: 8.5 });
/// assert!((tilt.drive - 0.5).abs() < 1e-9);
/// assert_eq!(tilt.steer, 0.0);
/// ```
#[must_use]
pub fn tilt_from_gravity(gravity: GravitySample) -> Tilt {
    Tilt {
        steer: clamp_unit(gravity.y / STANDARD_GRAVITY),
        drive: clamp_unit(gravity.x / STANDARD_GRAVITY),
    }
}

/// Per-device motion state: gyro tuning, tilt gating and the last gravity
/// vector.
#[derive(Debug, Clone)]
pub struct OrientationEngine {
    gyro_sensitivity: f64,
    gyro_gain: f64,
    dead_zone: f64,
    tilt_enabled: bool,
    tilt_sensitivity: f64,
    gravity: GravitySample,
}

impl Default for OrientationEngine {
    fn default() -> Self {
        Self {
            gyro_sensitivity: 1.0,
            gyro_gain: DEFAULT_GYRO_GAIN,
            dead_zone: DEFAULT_DEAD_ZONE,
            tilt_enabled: false,
            tilt_sensitivity: 1.0,
            gravity: GravitySample::default(),
        }
    }
}

impl OrientationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from the `[motion]` config section.
    #[must_use]
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            gyro_sensitivity: config.gyro_sensitivity,
            gyro_gain: config.gyro_gain,
            dead_zone: config.dead_zone,
            tilt_enabled: config.tilt_enabled,
            tilt_sensitivity: config.tilt_sensitivity,
            gravity: GravitySample::default(),
        }
    }

    #[must_use]
    pub fn gyro_sensitivity(&self) -> f64 {
        self.gyro_sensitivity
    }

    pub fn set_gyro_sensitivity(&mut self, sensitivity: f64) {
        self.gyro_sensitivity = sensitivity;
    }

    #[must_use]
    pub fn tilt_enabled(&self) -> bool {
        self.tilt_enabled
    }

    pub fn set_tilt_enabled(&mut self, enabled: bool) {
        self.tilt_enabled = enabled;
    }

    #[must_use]
    pub fn tilt_sensitivity(&self) -> f64 {
        self.tilt_sensitivity
    }

    pub fn set_tilt_sensitivity(&mut self, sensitivity: f64) {
        self.tilt_sensitivity = sensitivity;
    }

    /// Last gravity vector seen.
    #[must_use]
    pub fn gravity(&self) -> GravitySample {
        self.gravity
    }

    /// Tilt of the last gravity vector, before tilt sensitivity.
    #[must_use]
    pub fn tilt(&self) -> Tilt {
        tilt_from_gravity(self.gravity)
    }

    /// Pointer delta for a gyro sample, or `None` when both axes fall inside
    /// the dead zone.
    #[must_use]
    pub fn motion(&self, sample: GyroSample) -> Option<(f64, f64)> {
        let scale = self.gyro_sensitivity * self.gyro_gain;
        let dx = apply_dead_zone(-sample.rate_z * scale, self.dead_zone);
        let dy = apply_dead_zone(-sample.rate_x * scale, self.dead_zone);

        if dx == 0.0 && dy == 0.0 {
            None
        } else {
            Some((dx, dy))
        }
    }

    /// Gyro callback: pointer motion event, if any.
    #[must_use]
    pub fn on_gyroscope(&self, sample: GyroSample) -> Option<InputEvent> {
        self.motion(sample)
            .map(|(dx, dy)| InputEvent::PointerMotion { dx, dy })
    }

    /// Accelerometer callback: stores the gravity vector and, when tilt is
    /// enabled, returns a tilt analog event scaled by tilt sensitivity.
    pub fn on_accelerometer(&mut self, sample: GravitySample) -> Option<InputEvent> {
        self.gravity = sample;

        if !self.tilt_enabled {
            return None;
        }

        let tilt = self.tilt();
        Some(InputEvent::analog(
            AnalogSource::Tilt,
            clamp_unit(tilt.steer * self.tilt_sensitivity),
            clamp_unit(tilt.drive * self.tilt_sensitivity),
        ))
    }

    /// Dispatches a sensor reading to the matching callback.
    pub fn on_sensor(&mut self, reading: SensorReading) -> Option<InputEvent> {
        match reading {
            SensorReading::Gyroscope(sample) => self.on_gyroscope(sample),
            SensorReading::Accelerometer(sample) => self.on_accelerometer(sample),
        }
    }
}
