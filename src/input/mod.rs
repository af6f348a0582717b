//! # Input Module
//!
//! Producers that turn touch and sensor callbacks into [`event::InputEvent`]s.
//!
//! This module handles:
//! - Normalizing on-screen stick touches
//! - Emulating directional keys from the left stick
//! - Deriving pointer motion and tilt from inertial sensors
//! - Touchpad drags, taps and scroll strip gestures
//!
//! Everything here is synchronous and performs no I/O, so it can run
//! directly on UI or sensor callback threads.

pub mod emulation;
pub mod event;
pub mod joystick;
pub mod orientation;
pub mod touchpad;
