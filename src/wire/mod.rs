//! # Wire Protocol Module
//!
//! JSON-over-UDP message format shared by the controller and the receiver.
//!
//! This module handles:
//! - Message shapes and constants
//! - Encoding input events into datagrams
//! - Decoding datagrams on the receiver side

pub mod decoder;
pub mod encoder;
pub mod protocol;
