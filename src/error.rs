//! # Error Types
//!
//! Custom error types for Remote Pad using `thiserror`.

use std::time::Duration;

use thiserror::Error;

/// Main error type for Remote Pad
#[derive(Debug, Error)]
pub enum RemotePadError {
    /// No handshake reply arrived within the timeout
    #[error("Handshake timed out after {} ms", .0.as_millis())]
    HandshakeTimeout(Duration),

    /// Handshake abandoned by `disconnect()` or a newer `connect()`
    #[error("Handshake cancelled")]
    HandshakeCancelled,

    /// Socket bind/send/receive failure
    #[error("Socket error: {0}")]
    Socket(String),

    /// Unparseable or unresolvable peer address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Stick dimensions that leave the knob no room to travel
    #[error("Invalid stick geometry: {0}")]
    InvalidGeometry(String),

    /// Malformed wire message
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Remote Pad
pub type Result<T> = std::result::Result<T, RemotePadError>;
