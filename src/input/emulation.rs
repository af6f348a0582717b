//! # Stick Key Emulation
//!
//! Lets an analog stick double as four directional keys. Each direction
//! fires a `W`/`A`/`S`/`D` key plus the matching arrow key, but only when
//! its state flips, never on every sample.
//!
//! ## Thresholds
//!
//! | Direction | Condition | Keys |
//! |-----------|-----------|------|
//! | Up | `y < -0.5` | `W`, `UP` |
//! | Down | `y > 0.5` | `S`, `DOWN` |
//! | Left | `x < -0.5` | `A`, `LEFT` |
//! | Right | `x > 0.5` | `D`, `RIGHT` |
//!
//! Thresholds are exclusive and directions are independent, so a diagonal
//! holds two keys at once.
//!
//! ## Usage
//!
//! ```
//! use remote_pad::input::emulation::KeyEmulator;
//!
//! let mut keys = KeyEmulator::new();
//! assert_eq!(keys.update(0.0, -0.8).len(), 2); // W + UP pressed
//! assert!(keys.update(0.0, -0.9).is_empty());  // still up, nothing new
//! assert_eq!(keys.release().len(), 2);         // W + UP released
//! ```

use crate::input::event::{ButtonGroup, InputEvent};
use crate::input::joystick::StickSignal;

/// Deflection a stick must exceed before a direction counts as held.
pub const KEY_THRESHOLD: f64 = 0.5;

/// One of the four emulated directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order for each sample.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Letter key and arrow key fired for this direction.
    #[must_use]
    pub fn keys(&self) -> [&'static str; 2] {
        match self {
            Direction::Up => ["W", "UP"],
            Direction::Down => ["S", "DOWN"],
            Direction::Left => ["A", "LEFT"],
            Direction::Right => ["D", "RIGHT"],
        }
    }
}

/// Held/not-held flag for each direction of one stick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickAxisState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl StickAxisState {
    /// Directions held at a normalized stick position.
    #[must_use]
    pub fn from_position(x: f64, y: f64) -> Self {
        Self {
            up: y < -KEY_THRESHOLD,
            down: y > KEY_THRESHOLD,
            left: x < -KEY_THRESHOLD,
            right: x > KEY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// True if any direction is held.
    #[must_use]
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Edge-triggered key emulation for one stick.
///
/// Owned by whichever session drives the stick; create one per stick that
/// needs emulation rather than sharing state.
#[derive(Debug, Clone, Default)]
pub struct KeyEmulator {
    state: StickAxisState,
}

impl KeyEmulator {
    /// Creates an emulator with every direction released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held directions.
    #[must_use]
    pub fn state(&self) -> StickAxisState {
        self.state
    }

    /// Feeds one normalized stick sample and returns the key events for
    /// every direction whose state changed.
    pub fn update(&mut self, x: f64, y: f64) -> Vec<InputEvent> {
        self.transition(StickAxisState::from_position(x, y))
    }

    /// Stick released: every held direction gets its release events.
    pub fn release(&mut self) -> Vec<InputEvent> {
        self.transition(StickAxisState::default())
    }

    /// Dispatches a stick signal to [`update`](Self::update) or
    /// [`release`](Self::release).
    pub fn handle(&mut self, signal: StickSignal) -> Vec<InputEvent> {
        match signal {
            StickSignal::Moved { x, y } => self.update(x, y),
            StickSignal::Released => self.release(),
        }
    }

    /// Clears all directions without producing any events.
    ///
    /// Used on reconnect or mode switch, where the receiver has no matching
    /// held keys to release.
    pub fn reset(&mut self) {
        self.state = StickAxisState::default();
    }

    fn transition(&mut self, target: StickAxisState) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for direction in Direction::ALL {
            let held = target.get(direction);
            if held == self.state.get(direction) {
                continue;
            }

            self.state.set(direction, held);
            for key in direction.keys() {
                events.push(InputEvent::button(ButtonGroup::Keyboard, key, held));
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, pressed: bool) -> InputEvent {
        InputEvent::button(ButtonGroup::Keyboard, name, pressed)
    }

    #[test]
    fn test_initial_state_released() {
        let keys = KeyEmulator::new();
        assert_eq!(keys.state(), StickAxisState::default());
        assert!(!keys.state().any());
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let state = StickAxisState::from_position(0.5, -0.5);
        assert!(!state.any());

        let state = StickAxisState::from_position(0.51, -0.51);
        assert!(state.right);
        assert!(state.up);
        assert!(!state.left);
        assert!(!state.down);
    }

    #[test]
    fn test_press_emits_letter_and_arrow() {
        let mut keys = KeyEmulator::new();
        let events = keys.update(-0.9, 0.0);
        assert_eq!(events, vec![key("A", true), key("LEFT", true)]);
    }

    #[test]
    fn test_holding_emits_nothing() {
        let mut keys = KeyEmulator::new();
        keys.update(0.0, 0.8);
        assert!(keys.update(0.0, 0.9).is_empty());
        assert!(keys.update(0.1, 0.6).is_empty());
    }

    #[test]
    fn test_vertical_sample_sequence() {
        // y = 0.6 is toward the bottom of the screen, i.e. "down"
        let mut keys = KeyEmulator::new();

        assert_eq!(keys.update(0.0, 0.6), vec![key("S", true), key("DOWN", true)]);
        assert!(keys.update(0.0, 0.6).is_empty());
        assert_eq!(
            keys.update(0.0, -0.6),
            vec![key("W", true), key("UP", true), key("S", false), key("DOWN", false)]
        );
        assert_eq!(keys.update(0.0, 0.0), vec![key("W", false), key("UP", false)]);
    }

    #[test]
    fn test_diagonal_holds_two_directions() {
        let mut keys = KeyEmulator::new();
        let events = keys.update(0.7, -0.7);
        assert_eq!(
            events,
            vec![key("W", true), key("UP", true), key("D", true), key("RIGHT", true)]
        );
        assert!(keys.state().up && keys.state().right);
    }

    #[test]
    fn test_release_emits_one_release_per_held_direction() {
        let mut keys = KeyEmulator::new();
        keys.update(-0.7, 0.7);

        let events = keys.release();
        assert_eq!(
            events,
            vec![key("S", false), key("DOWN", false), key("A", false), key("LEFT", false)]
        );
        assert!(!keys.state().any());
    }

    #[test]
    fn test_release_when_idle_emits_nothing() {
        let mut keys = KeyEmulator::new();
        assert!(keys.release().is_empty());
    }

    #[test]
    fn test_handle_dispatches_signals() {
        let mut keys = KeyEmulator::new();
        assert_eq!(keys.handle(StickSignal::Moved { x: 0.0, y: -1.0 }).len(), 2);
        assert_eq!(keys.handle(StickSignal::Released).len(), 2);
    }

    #[test]
    fn test_reset_is_silent() {
        let mut keys = KeyEmulator::new();
        keys.update(1.0, 1.0);
        keys.reset();
        assert!(!keys.state().any());
        // Nothing held any more, so a release has nothing to report
        assert!(keys.release().is_empty());
    }
}
