//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{RemotePadError, Result};
use crate::transport::PeerAddress;

/// Main configuration structure
///
/// Every section is optional; missing sections use their defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub peer: PeerConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub sticks: StickConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub touchpad: TouchpadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Receiver address used when nothing has been saved yet
#[derive(Debug, Deserialize, Clone)]
pub struct PeerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Transport configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// On-screen stick configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StickConfig {
    #[serde(default = "default_sensitivity")]
    pub left_sensitivity: f64,

    #[serde(default = "default_sensitivity")]
    pub right_sensitivity: f64,

    #[serde(default = "default_knob_ratio")]
    pub knob_ratio: f64,
}

/// Gyroscope and tilt configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MotionConfig {
    #[serde(default = "default_sensitivity")]
    pub gyro_sensitivity: f64,

    #[serde(default = "default_gyro_gain")]
    pub gyro_gain: f64,

    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,

    #[serde(default)]
    pub tilt_enabled: bool,

    #[serde(default = "default_sensitivity")]
    pub tilt_sensitivity: f64,
}

/// Touchpad and scroll strip configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TouchpadConfig {
    #[serde(default = "default_touchpad_sensitivity")]
    pub sensitivity: f64,

    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,

    #[serde(default = "default_scroll_divisor")]
    pub scroll_divisor: f64,
}

/// Log output configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for daily-rolling log files; empty logs to stderr only
    #[serde(default)]
    pub directory: String,
}

// Default value functions
fn default_host() -> String { "192.168.1.100".to_string() }
fn default_port() -> u16 { 5005 }

fn default_handshake_timeout_ms() -> u64 { 2000 }
fn default_queue_capacity() -> usize { 256 }

fn default_sensitivity() -> f64 { 1.0 }
fn default_knob_ratio() -> f64 { 0.4 }

fn default_gyro_gain() -> f64 { 20.0 }
fn default_dead_zone() -> f64 { 0.1 }

fn default_touchpad_sensitivity() -> f64 { 1.5 }
fn default_scroll_threshold() -> f64 { 10.0 }
fn default_scroll_divisor() -> f64 { 5.0 }

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            handshake_timeout_ms: default_handshake_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            left_sensitivity: default_sensitivity(),
            right_sensitivity: default_sensitivity(),
            knob_ratio: default_knob_ratio(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            gyro_sensitivity: default_sensitivity(),
            gyro_gain: default_gyro_gain(),
            dead_zone: default_dead_zone(),
            tilt_enabled: false,
            tilt_sensitivity: default_sensitivity(),
        }
    }
}

impl Default for TouchpadConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_touchpad_sensitivity(),
            scroll_threshold: default_scroll_threshold(),
            scroll_divisor: default_scroll_divisor(),
        }
    }
}

impl PeerConfig {
    /// Configured peer as a validated address
    pub fn address(&self) -> Result<PeerAddress> {
        PeerAddress::new(self.host.clone(), self.port)
    }
}

impl TransportConfig {
    #[must_use]
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

/// Maps a 0-200 sensitivity slider to a multiplier, floored at 0.1
///
/// # Examples
///
/// ```
/// use remote_pad::config::sensitivity_from_slider;
///
/// assert_eq!(sensitivity_from_slider(150), 1.5);
/// assert_eq!(sensitivity_from_slider(0), 0.1);
/// ```
#[must_use]
pub fn sensitivity_from_slider(progress: u32) -> f64 {
    (f64::from(progress) / 100.0).max(0.1)
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use remote_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.peer.host.trim().is_empty() {
            return Err(invalid("peer host cannot be empty"));
        }

        if self.peer.port == 0 {
            return Err(invalid("peer port must be between 1 and 65535"));
        }

        if self.transport.handshake_timeout_ms == 0 || self.transport.handshake_timeout_ms > 10000 {
            return Err(invalid("handshake_timeout_ms must be between 1 and 10000"));
        }

        if self.transport.queue_capacity == 0 || self.transport.queue_capacity > 65536 {
            return Err(invalid("queue_capacity must be between 1 and 65536"));
        }

        // Sensitivities follow the 0.1-2.0 slider range
        for (name, value) in [
            ("left_sensitivity", self.sticks.left_sensitivity),
            ("right_sensitivity", self.sticks.right_sensitivity),
            ("gyro_sensitivity", self.motion.gyro_sensitivity),
            ("tilt_sensitivity", self.motion.tilt_sensitivity),
        ] {
            if !(0.1..=2.0).contains(&value) {
                return Err(invalid(format!("{} must be between 0.1 and 2.0", name)));
            }
        }

        if !(self.sticks.knob_ratio > 0.0 && self.sticks.knob_ratio < 1.0) {
            return Err(invalid("knob_ratio must be greater than 0.0 and less than 1.0"));
        }

        if !(self.motion.gyro_gain > 0.0) {
            return Err(invalid("gyro_gain must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.motion.dead_zone) {
            return Err(invalid("dead_zone must be between 0.0 and 1.0"));
        }

        for (name, value) in [
            ("touchpad sensitivity", self.touchpad.sensitivity),
            ("scroll_threshold", self.touchpad.scroll_threshold),
            ("scroll_divisor", self.touchpad.scroll_divisor),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(invalid(format!("{} must be greater than 0", name)));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl std::fmt::Display) -> RemotePadError {
    RemotePadError::Config(toml::de::Error::custom(message))
}
