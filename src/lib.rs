//! # Remote Pad Library
//!
//! Turn a handheld device into a gamepad, touchpad and tilt controller for a
//! desktop receiver.
//!
//! Touch and sensor samples are normalized into typed input events, encoded
//! as one JSON object per UDP datagram and sent best-effort to the receiver
//! after a single handshake.

pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod logging;
pub mod session;
pub mod store;
pub mod transport;
pub mod wire;
