//! # Input Events
//!
//! Typed input events produced by the sticks, buttons, sensors and touchpad.
//!
//! Every variant maps to exactly one wire message shape (see
//! [`crate::wire::protocol::WireMessage`]). Events are plain values: a
//! producer builds one and the encoder consumes it.

use std::fmt;

/// Button group, sent as the `group` field of a `button` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonGroup {
    /// D-pad arrows
    Dpad,
    /// Face buttons (triangle, square, circle, cross)
    Action,
    /// L1 / R1
    Shoulder,
    /// Start / select
    System,
    /// Keys synthesized from the left stick
    Keyboard,
}

impl ButtonGroup {
    /// Wire name of the group.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonGroup::Dpad => "dpad",
            ButtonGroup::Action => "action",
            ButtonGroup::Shoulder => "shoulder",
            ButtonGroup::System => "system",
            ButtonGroup::Keyboard => "keyboard",
        }
    }

    /// Parses a wire name back into a group.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dpad" => Some(ButtonGroup::Dpad),
            "action" => Some(ButtonGroup::Action),
            "shoulder" => Some(ButtonGroup::Shoulder),
            "system" => Some(ButtonGroup::System),
            "keyboard" => Some(ButtonGroup::Keyboard),
            _ => None,
        }
    }
}

impl fmt::Display for ButtonGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of an analog event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogSource {
    LeftStick,
    RightStick,
    Tilt,
}

impl AnalogSource {
    /// Wire name of the source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalogSource::LeftStick => "left_stick",
            AnalogSource::RightStick => "right_stick",
            AnalogSource::Tilt => "tilt",
        }
    }

    /// Parses a wire name back into a source.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left_stick" => Some(AnalogSource::LeftStick),
            "right_stick" => Some(AnalogSource::RightStick),
            "tilt" => Some(AnalogSource::Tilt),
            _ => None,
        }
    }
}

impl fmt::Display for AnalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer click kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickButton {
    Left,
    Right,
    Double,
}

impl ClickButton {
    /// Single-letter wire code (`L`, `R`, `D`).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ClickButton::Left => "L",
            ClickButton::Right => "R",
            ClickButton::Double => "D",
        }
    }

    /// Parses a wire code back into a click kind.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(ClickButton::Left),
            "R" => Some(ClickButton::Right),
            "D" => Some(ClickButton::Double),
            _ => None,
        }
    }
}

/// A single input event headed for the receiver.
///
/// `Analog` coordinates are already clamped to `[-1, 1]` by the producer;
/// nothing downstream clamps again.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button press or release
    Button {
        group: ButtonGroup,
        key: String,
        pressed: bool,
    },
    /// Normalized analog position
    Analog { source: AnalogSource, x: f64, y: f64 },
    /// Relative pointer movement
    PointerMotion { dx: f64, dy: f64 },
    /// Pointer click
    PointerClick { button: ClickButton },
    /// Scroll wheel steps
    PointerScroll { amount: i32 },
    /// One-shot key tap (press and release on the receiver)
    KeyTap { key: String },
}

impl InputEvent {
    /// Convenience constructor for a button event.
    #[must_use]
    pub fn button(group: ButtonGroup, key: impl Into<String>, pressed: bool) -> Self {
        InputEvent::Button {
            group,
            key: key.into(),
            pressed,
        }
    }

    /// Convenience constructor for an analog event.
    #[must_use]
    pub fn analog(source: AnalogSource, x: f64, y: f64) -> Self {
        InputEvent::Analog { source, x, y }
    }

    /// Short name used in log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Button { .. } => "button",
            InputEvent::Analog { .. } => "analog",
            InputEvent::PointerMotion { .. } => "mouse_motion",
            InputEvent::PointerClick { .. } => "mouse_click",
            InputEvent::PointerScroll { .. } => "mouse_scroll",
            InputEvent::KeyTap { .. } => "keyboard",
        }
    }
}
