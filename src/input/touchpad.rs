//! # Touchpad and Scroll Strip
//!
//! Pointer producers for the mouse screen:
//!
//! - [`Touchpad`]: one-finger drag becomes relative pointer motion, taps
//!   become clicks.
//! - [`ScrollStrip`]: vertical drag becomes scroll steps once it travels far
//!   enough.

use crate::config::TouchpadConfig;
use crate::input::event::{ClickButton, InputEvent};
use crate::input::joystick::Point;

/// Tap gestures recognized on the touchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapGesture {
    /// Confirmed single tap
    Single,
    /// Double tap
    Double,
    /// A second finger landing while one is down
    SecondFinger,
}

impl TapGesture {
    /// Click sent for the gesture.
    #[must_use]
    pub fn click(&self) -> InputEvent {
        let button = match self {
            TapGesture::Single => ClickButton::Left,
            TapGesture::Double => ClickButton::Double,
            TapGesture::SecondFinger => ClickButton::Right,
        };
        InputEvent::PointerClick { button }
    }
}

/// Relative-motion touchpad.
#[derive(Debug, Clone)]
pub struct Touchpad {
    sensitivity: f64,
    last: Option<Point>,
}

impl Touchpad {
    #[must_use]
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            last: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &TouchpadConfig) -> Self {
        Self::new(config.sensitivity)
    }

    /// Finger down: anchors the next delta.
    pub fn touch_down(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Finger moved.
    ///
    /// Only single-finger drags move the pointer. A move without a prior
    /// touch down just sets the anchor.
    pub fn touch_move(&mut self, point: Point, pointer_count: usize) -> Option<InputEvent> {
        if pointer_count != 1 {
            return None;
        }

        let last = self.last.replace(point)?;
        Some(InputEvent::PointerMotion {
            dx: (point.x - last.x) * self.sensitivity,
            dy: (point.y - last.y) * self.sensitivity,
        })
    }

    /// Finger lifted.
    pub fn touch_up(&mut self) {
        self.last = None;
    }
}

/// Vertical strip that turns drags into scroll steps.
#[derive(Debug, Clone)]
pub struct ScrollStrip {
    threshold: f64,
    divisor: f64,
    anchor: Option<f64>,
}

impl ScrollStrip {
    #[must_use]
    pub fn new(threshold: f64, divisor: f64) -> Self {
        Self {
            threshold,
            divisor,
            anchor: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &TouchpadConfig) -> Self {
        Self::new(config.scroll_threshold, config.scroll_divisor)
    }

    pub fn touch_down(&mut self, y: f64) {
        self.anchor = Some(y);
    }

    /// Finger moved to `y`.
    ///
    /// Once the drag exceeds the threshold, emits `trunc(dy / divisor)` steps
    /// and re-anchors at `y`. Drags that round to zero steps emit nothing.
    pub fn touch_move(&mut self, y: f64) -> Option<InputEvent> {
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => {
                self.anchor = Some(y);
                return None;
            }
        };

        let dy = y - anchor;
        if dy.abs() <= self.threshold {
            return None;
        }

        self.anchor = Some(y);
        let amount = (dy / self.divisor).trunc() as i32;
        if amount == 0 {
            None
        } else {
            Some(InputEvent::PointerScroll { amount })
        }
    }

    pub fn touch_up(&mut self) {
        self.anchor = None;
    }
}
