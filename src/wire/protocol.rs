//! # Wire Protocol Constants and Types
//!
//! One UDP datagram carries one UTF-8 JSON object; the `type` field selects
//! the shape. There is no framing, sequencing or acknowledgement beyond the
//! initial handshake.
//!
//! | type | fields |
//! |------|--------|
//! | `handshake` | |
//! | `button` | `group`, `key`, `action` (`PRESS`/`RELEASE`) |
//! | `analog` | `source`, `x`, `y` |
//! | `mouse_motion` | `dx`, `dy` |
//! | `mouse_click` | `action` (`L`/`R`/`D`) |
//! | `mouse_scroll` | `amount` |
//! | `keyboard` | `key` |

use serde::{Deserialize, Serialize};

use crate::input::event::InputEvent;

/// Default receiver port
pub const DEFAULT_PORT: u16 = 5005;

/// Receive buffer size; every message fits in one datagram of this size
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Payload the reference receiver answers handshakes with (not checked by
/// the client)
pub const HANDSHAKE_ACK: &[u8] = b"ACK";

/// `action` field of a `button` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    #[serde(rename = "PRESS")]
    Press,
    #[serde(rename = "RELEASE")]
    Release,
}

impl ButtonAction {
    #[must_use]
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            ButtonAction::Press
        } else {
            ButtonAction::Release
        }
    }

    #[must_use]
    pub fn is_press(&self) -> bool {
        matches!(self, ButtonAction::Press)
    }
}

/// A message exactly as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    Handshake,
    Button {
        group: String,
        key: String,
        action: ButtonAction,
    },
    Analog {
        source: String,
        x: f64,
        y: f64,
    },
    MouseMotion {
        dx: f64,
        dy: f64,
    },
    MouseClick {
        action: String,
    },
    MouseScroll {
        amount: i32,
    },
    Keyboard {
        key: String,
    },
}

impl From<&InputEvent> for WireMessage {
    fn from(event: &InputEvent) -> Self {
        match event {
            InputEvent::Button {
                group,
                key,
                pressed,
            } => WireMessage::Button {
                group: group.as_str().to_string(),
                key: key.clone(),
                action: ButtonAction::from_pressed(*pressed),
            },
            InputEvent::Analog { source, x, y } => WireMessage::Analog {
                source: source.as_str().to_string(),
                x: *x,
                y: *y,
            },
            InputEvent::PointerMotion { dx, dy } => WireMessage::MouseMotion { dx: *dx, dy: *dy },
            InputEvent::PointerClick { button } => WireMessage::MouseClick {
                action: button.code().to_string(),
            },
            InputEvent::PointerScroll { amount } => WireMessage::MouseScroll { amount: *amount },
            InputEvent::KeyTap { key } => WireMessage::Keyboard { key: key.clone() },
        }
    }
}
