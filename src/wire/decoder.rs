//! # Message Decoder
//!
//! Receiver-side parsing of wire datagrams back into typed events.

use super::protocol::WireMessage;
use crate::error::{RemotePadError, Result};
use crate::input::event::{AnalogSource, ButtonGroup, ClickButton, InputEvent};

/// Decode one datagram payload
///
/// # Errors
///
/// Returns error if:
/// - Payload is not UTF-8 JSON
/// - `type` is missing or unknown
/// - A field is missing or has the wrong JSON type
pub fn decode_message(payload: &[u8]) -> Result<WireMessage> {
    serde_json::from_slice(payload)
        .map_err(|e| RemotePadError::Protocol(format!("Malformed message: {}", e)))
}

/// Convert a decoded message into an input event
///
/// Returns `Ok(None)` for the handshake, which carries no input.
///
/// # Errors
///
/// Returns error if a group, source or click code is unknown, or a
/// coordinate is not finite.
pub fn message_to_event(message: WireMessage) -> Result<Option<InputEvent>> {
    let event = match message {
        WireMessage::Handshake => return Ok(None),
        WireMessage::Button { group, key, action } => {
            let group = ButtonGroup::from_name(&group).ok_or_else(|| {
                RemotePadError::Protocol(format!("Unknown button group: {}", group))
            })?;
            InputEvent::button(group, key, action.is_press())
        }
        WireMessage::Analog { source, x, y } => {
            let source = AnalogSource::from_name(&source).ok_or_else(|| {
                RemotePadError::Protocol(format!("Unknown analog source: {}", source))
            })?;
            check_finite("x", x)?;
            check_finite("y", y)?;
            InputEvent::analog(source, x, y)
        }
        WireMessage::MouseMotion { dx, dy } => {
            check_finite("dx", dx)?;
            check_finite("dy", dy)?;
            InputEvent::PointerMotion { dx, dy }
        }
        WireMessage::MouseClick { action } => {
            let button = ClickButton::from_code(&action).ok_or_else(|| {
                RemotePadError::Protocol(format!("Unknown click action: {}", action))
            })?;
            InputEvent::PointerClick { button }
        }
        WireMessage::MouseScroll { amount } => InputEvent::PointerScroll { amount },
        WireMessage::Keyboard { key } => InputEvent::KeyTap { key },
    };

    Ok(Some(event))
}

/// Decode one datagram payload straight into an input event
pub fn decode_event(payload: &[u8]) -> Result<Option<InputEvent>> {
    message_to_event(decode_message(payload)?)
}

fn check_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RemotePadError::Protocol(format!("Field {} is not a finite number", field)))
    }
}
