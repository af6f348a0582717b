//! # Message Encoder
//!
//! Serializes input events into wire datagrams.

use bytes::Bytes;
use serde_json::json;

use super::protocol::WireMessage;
use crate::input::event::InputEvent;

/// Encode a wire message into one datagram payload
///
/// # Examples
///
/// ```
/// use remote_pad::wire::encoder::encode_message;
/// use remote_pad::wire::protocol::WireMessage;
///
/// let payload = encode_message(&WireMessage::Handshake);
/// assert_eq!(&payload[..], br#"{"type":"handshake"}"#);
/// ```
pub fn encode_message(message: &WireMessage) -> Bytes {
    // Building a `Value` cannot fail for these shapes; non-finite numbers become null
    Bytes::from(json!(message).to_string())
}

/// Encode an input event into one datagram payload
///
/// # Examples
///
/// ```
/// use remote_pad::input::event::InputEvent;
/// use remote_pad::wire::encoder::encode_event;
///
/// let payload = encode_event(&InputEvent::PointerScroll { amount: -3 });
/// let value: serde_json::Value = serde_json::from_slice(&payload)?;
/// assert_eq!(value["type"], "mouse_scroll");
/// assert_eq!(value["amount"], -3);
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn encode_event(event: &InputEvent) -> Bytes {
    encode_message(&WireMessage::from(event))
}

/// Encode the handshake request
pub fn encode_handshake() -> Bytes {
    encode_message(&WireMessage::Handshake)
}
