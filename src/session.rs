//! # Sessions
//!
//! Compose the input producers for each controller screen and forward their
//! events to an [`EventSink`].
//!
//! This module handles:
//! - Game screen: two sticks, key emulation on the left stick, buttons, tilt
//! - Mouse screen: gyro pointer, touchpad mode, scroll strip, clicks, keys
//!
//! Sessions are single-owner: UI and sensor callbacks for one screen are
//! delivered to one session value, which owns all mutable producer state.

use crate::config::Config;
use crate::error::Result;
use crate::input::emulation::{KeyEmulator, StickAxisState};
use crate::input::event::{AnalogSource, ButtonGroup, ClickButton, InputEvent};
use crate::input::joystick::{Joystick, Point, StickGeometry, StickSignal};
use crate::input::orientation::{OrientationEngine, SensorReading};
use crate::input::touchpad::{ScrollStrip, TapGesture, Touchpad};
use crate::transport::EventSink;

/// Square stick view size used until the UI reports real bounds
pub const DEFAULT_STICK_SIZE: f64 = 200.0;

/// Which on-screen stick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickSide {
    Left,
    Right,
}

impl StickSide {
    #[must_use]
    pub fn source(&self) -> AnalogSource {
        match self {
            StickSide::Left => AnalogSource::LeftStick,
            StickSide::Right => AnalogSource::RightStick,
        }
    }
}

/// Game screen
///
/// Only the left stick drives key emulation. Gyro samples are ignored here;
/// the accelerometer feeds tilt when enabled.
#[derive(Debug)]
pub struct GamepadSession<S: EventSink> {
    sink: S,
    left: Joystick,
    right: Joystick,
    left_keys: KeyEmulator,
    motion: OrientationEngine,
    knob_ratio: f64,
}

impl<S: EventSink> GamepadSession<S> {
    /// Create a session with square sticks of [`DEFAULT_STICK_SIZE`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the configured knob ratio leaves the
    /// knob no room to travel.
    pub fn new(sink: S, config: &Config) -> Result<Self> {
        let geometry =
            StickGeometry::from_bounds(DEFAULT_STICK_SIZE, DEFAULT_STICK_SIZE, config.sticks.knob_ratio)?;

        Ok(Self {
            sink,
            left: Joystick::new(geometry, config.sticks.left_sensitivity),
            right: Joystick::new(geometry, config.sticks.right_sensitivity),
            left_keys: KeyEmulator::new(),
            motion: OrientationEngine::from_config(&config.motion),
            knob_ratio: config.sticks.knob_ratio,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stick(&self, side: StickSide) -> &Joystick {
        match side {
            StickSide::Left => &self.left,
            StickSide::Right => &self.right,
        }
    }

    fn stick_mut(&mut self, side: StickSide) -> &mut Joystick {
        match side {
            StickSide::Left => &mut self.left,
            StickSide::Right => &mut self.right,
        }
    }

    /// Keys currently held by left-stick emulation
    pub fn held_keys(&self) -> StickAxisState {
        self.left_keys.state()
    }

    /// Stick view was laid out with new bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` for empty or non-finite bounds; the stick
    /// keeps its previous geometry.
    pub fn resize_stick(&mut self, side: StickSide, width: f64, height: f64) -> Result<()> {
        let geometry = StickGeometry::from_bounds(width, height, self.knob_ratio)?;
        self.stick_mut(side).resize(geometry);
        Ok(())
    }

    pub fn set_stick_sensitivity(&mut self, side: StickSide, sensitivity: f64) {
        self.stick_mut(side).set_sensitivity(sensitivity);
    }

    pub fn set_tilt_enabled(&mut self, enabled: bool) {
        self.motion.set_tilt_enabled(enabled);
    }

    pub fn set_tilt_sensitivity(&mut self, sensitivity: f64) {
        self.motion.set_tilt_sensitivity(sensitivity);
    }

    pub fn tilt_enabled(&self) -> bool {
        self.motion.tilt_enabled()
    }

    /// Touch down or move on a stick, in view coordinates
    pub fn touch_stick(&mut self, side: StickSide, point: Point) {
        let signal = self.stick_mut(side).touch(point);
        self.dispatch_stick(side, signal);
    }

    /// Touch lifted or cancelled on a stick
    pub fn release_stick(&mut self, side: StickSide) {
        let signal = self.stick_mut(side).release();
        self.dispatch_stick(side, signal);
    }

    fn dispatch_stick(&mut self, side: StickSide, signal: StickSignal) {
        self.sink.send(signal.to_event(side.source()));

        if side == StickSide::Left {
            for event in self.left_keys.handle(signal) {
                self.sink.send(event);
            }
        }
    }

    /// On-screen button pressed or released
    pub fn button(&mut self, group: ButtonGroup, key: &str, pressed: bool) {
        self.sink.send(InputEvent::button(group, key, pressed));
    }

    pub fn on_sensor(&mut self, reading: SensorReading) {
        match reading {
            SensorReading::Gyroscope(_) => {}
            SensorReading::Accelerometer(sample) => {
                if let Some(event) = self.motion.on_accelerometer(sample) {
                    self.sink.send(event);
                }
            }
        }
    }

    /// Forget held keys and recenter both sticks without sending anything
    ///
    /// Used on reconnect and screen switch.
    pub fn reset(&mut self) {
        self.left_keys.reset();
        self.left.release();
        self.right.release();
    }
}

/// Mouse screen
///
/// Gyro samples move the pointer unless touchpad mode is on, in which case
/// the touchpad surface moves it instead.
#[derive(Debug)]
pub struct PointerSession<S: EventSink> {
    sink: S,
    motion: OrientationEngine,
    touchpad: Touchpad,
    scroll: ScrollStrip,
    touchpad_mode: bool,
}

impl<S: EventSink> PointerSession<S> {
    pub fn new(sink: S, config: &Config) -> Self {
        Self {
            sink,
            motion: OrientationEngine::from_config(&config.motion),
            touchpad: Touchpad::from_config(&config.touchpad),
            scroll: ScrollStrip::from_config(&config.touchpad),
            touchpad_mode: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn touchpad_mode(&self) -> bool {
        self.touchpad_mode
    }

    /// Toggle touchpad mode; turning it on stops gyro pointer motion
    pub fn set_touchpad_mode(&mut self, enabled: bool) {
        self.touchpad_mode = enabled;
        self.touchpad.touch_up();
    }

    pub fn set_gyro_sensitivity(&mut self, sensitivity: f64) {
        self.motion.set_gyro_sensitivity(sensitivity);
    }

    pub fn on_sensor(&mut self, reading: SensorReading) {
        match reading {
            SensorReading::Gyroscope(sample) if !self.touchpad_mode => {
                if let Some(event) = self.motion.on_gyroscope(sample) {
                    self.sink.send(event);
                }
            }
            _ => {}
        }
    }

    pub fn touchpad_down(&mut self, point: Point) {
        if self.touchpad_mode {
            self.touchpad.touch_down(point);
        }
    }

    pub fn touchpad_move(&mut self, point: Point, pointer_count: usize) {
        if !self.touchpad_mode {
            return;
        }
        if let Some(event) = self.touchpad.touch_move(point, pointer_count) {
            self.sink.send(event);
        }
    }

    pub fn touchpad_up(&mut self) {
        self.touchpad.touch_up();
    }

    /// Tap recognized on the touchpad surface
    pub fn tap(&mut self, gesture: TapGesture) {
        if self.touchpad_mode {
            self.sink.send(gesture.click());
        }
    }

    /// Click button pressed
    pub fn click(&mut self, button: ClickButton) {
        self.sink.send(InputEvent::PointerClick { button });
    }

    pub fn scroll_down(&mut self, y: f64) {
        self.scroll.touch_down(y);
    }

    pub fn scroll_move(&mut self, y: f64) {
        if let Some(event) = self.scroll.touch_move(y) {
            self.sink.send(event);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll.touch_up();
    }

    /// Send scroll steps directly; zero is ignored
    pub fn scroll(&mut self, amount: i32) {
        if amount != 0 {
            self.sink.send(InputEvent::PointerScroll { amount });
        }
    }

    /// Tap a keyboard key on the receiver
    pub fn key_tap(&mut self, key: &str) {
        self.sink.send(InputEvent::KeyTap { key: key.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sensitivity_from_slider;
    use crate::input::orientation::{GravitySample, GyroSample};
    use crate::transport::listener::MockEventSink;
    use std::sync::{Arc, Mutex};

    /// Mock sink that records every event it receives
    fn recording_sink() -> (MockEventSink, Arc<Mutex<Vec<InputEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = events.clone();
        let mut sink = MockEventSink::new();
        sink.expect_send()
            .returning(move |event| recorded.lock().unwrap().push(event));
        (sink, events)
    }

    fn silent_sink() -> MockEventSink {
        let mut sink = MockEventSink::new();
        sink.expect_send().never();
        sink
    }

    fn take(events: &Arc<Mutex<Vec<InputEvent>>>) -> Vec<InputEvent> {
        std::mem::take(&mut *events.lock().unwrap())
    }

    fn keyboard(key: &str, pressed: bool) -> InputEvent {
        InputEvent::button(ButtonGroup::Keyboard, key, pressed)
    }

    fn deflect(session: &GamepadSession<MockEventSink>, side: StickSide, x: f64, y: f64) -> Point {
        session.stick(side).geometry().point_at(x, y)
    }

    // ==================== Gamepad Tests ====================

    #[test]
    fn test_left_stick_sends_analog_and_keys() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();

        let point = deflect(&session, StickSide::Left, 0.0, -1.0);
        session.touch_stick(StickSide::Left, point);

        assert_eq!(
            take(&events),
            vec![
                InputEvent::analog(AnalogSource::LeftStick, 0.0, -1.0),
                keyboard("W", true),
                keyboard("UP", true),
            ]
        );
        assert!(session.held_keys().up);
    }

    #[test]
    fn test_left_stick_release_sends_zero_and_key_releases() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();

        let point = deflect(&session, StickSide::Left, 1.0, 0.0);
        session.touch_stick(StickSide::Left, point);
        take(&events);

        session.release_stick(StickSide::Left);
        assert_eq!(
            take(&events),
            vec![
                InputEvent::analog(AnalogSource::LeftStick, 0.0, 0.0),
                keyboard("D", false),
                keyboard("RIGHT", false),
            ]
        );
        assert!(!session.held_keys().any());
    }

    #[test]
    fn test_right_stick_has_no_key_emulation() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();

        let point = deflect(&session, StickSide::Right, -1.0, 0.0);
        session.touch_stick(StickSide::Right, point);
        session.release_stick(StickSide::Right);

        assert_eq!(
            take(&events),
            vec![
                InputEvent::analog(AnalogSource::RightStick, -1.0, 0.0),
                InputEvent::analog(AnalogSource::RightStick, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_buttons() {
        let mut sink = MockEventSink::new();
        sink.expect_send()
            .withf(|event| *event == InputEvent::button(ButtonGroup::Action, "CROSS", true))
            .times(1)
            .return_const(());
        sink.expect_send()
            .withf(|event| *event == InputEvent::button(ButtonGroup::Action, "CROSS", false))
            .times(1)
            .return_const(());

        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();
        session.button(ButtonGroup::Action, "CROSS", true);
        session.button(ButtonGroup::Action, "CROSS", false);
    }

    #[test]
    fn test_game_screen_ignores_gyro() {
        let mut session = GamepadSession::new(silent_sink(), &Config::default()).unwrap();
        session.on_sensor(SensorReading::Gyroscope(GyroSample { rate_x: 1.0, rate_z: 1.0 }));
    }

    #[test]
    fn test_tilt_only_when_enabled() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();
        let reading = SensorReading::Accelerometer(GravitySample { x: 0.0, y: 9.8, z: 0.0 });

        session.on_sensor(reading);
        assert!(take(&events).is_empty());

        session.set_tilt_enabled(true);
        session.on_sensor(reading);
        assert_eq!(take(&events), vec![InputEvent::analog(AnalogSource::Tilt, 1.0, 0.0)]);
    }

    #[test]
    fn test_reset_is_silent() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();

        let point = deflect(&session, StickSide::Left, -1.0, 0.0);
        session.touch_stick(StickSide::Left, point);
        take(&events);

        session.reset();
        assert!(take(&events).is_empty());
        assert!(!session.held_keys().any());
        assert!(!session.stick(StickSide::Left).is_pressed());

        // After reset the same deflection presses again
        session.touch_stick(StickSide::Left, point);
        assert!(take(&events).contains(&keyboard("A", true)));
    }

    #[test]
    fn test_slider_sensitivity_scales_sticks_and_tilt() {
        let (sink, events) = recording_sink();
        let mut session = GamepadSession::new(sink, &Config::default()).unwrap();

        session.set_stick_sensitivity(StickSide::Right, sensitivity_from_slider(50));
        let point = deflect(&session, StickSide::Right, 1.0, 0.0);
        session.touch_stick(StickSide::Right, point);
        match take(&events).as_slice() {
            [InputEvent::Analog { source: AnalogSource::RightStick, x, y }] => {
                assert!((x - 0.5).abs() < 1e-9);
                assert!(y.abs() < 1e-9);
            }
            other => panic!("unexpected events {:?}", other),
        }

        session.set_tilt_enabled(true);
        session.set_tilt_sensitivity(sensitivity_from_slider(50));
        session.on_sensor(SensorReading::Accelerometer(GravitySample { x: 0.0, y: 9.8, z: 0.0 }));
        assert_eq!(take(&events), vec![InputEvent::analog(AnalogSource::Tilt, 0.5, 0.0)]);
    }

    #[test]
    fn test_resize_stick_recenters() {
        let mut session = GamepadSession::new(silent_sink(), &Config::default()).unwrap();

        session.resize_stick(StickSide::Left, 400.0, 300.0).unwrap();
        let geometry = session.stick(StickSide::Left).geometry();
        assert_eq!(geometry.center(), Point::new(200.0, 150.0));
        assert_eq!(geometry.outer_radius(), 150.0);
        assert_eq!(session.stick(StickSide::Left).knob(), geometry.center());

        // Right stick keeps the default size
        assert_eq!(
            session.stick(StickSide::Right).geometry().outer_radius(),
            DEFAULT_STICK_SIZE / 2.0
        );
    }

    #[test]
    fn test_resize_stick_rejects_empty_bounds() {
        let mut session = GamepadSession::new(silent_sink(), &Config::default()).unwrap();
        let before = *session.stick(StickSide::Left).geometry();

        assert!(session.resize_stick(StickSide::Left, 0.0, 0.0).is_err());
        assert_eq!(*session.stick(StickSide::Left).geometry(), before);
    }

    #[test]
    fn test_invalid_knob_ratio() {
        let mut config = Config::default();
        config.sticks.knob_ratio = 1.0;
        assert!(GamepadSession::new(silent_sink(), &config).is_err());
    }

    // ==================== Pointer Tests ====================

    #[test]
    fn test_gyro_moves_pointer() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());

        session.on_sensor(SensorReading::Gyroscope(GyroSample { rate_x: 0.5, rate_z: -0.25 }));
        assert_eq!(take(&events), vec![InputEvent::PointerMotion { dx: 5.0, dy: -10.0 }]);
    }

    #[test]
    fn test_small_gyro_is_suppressed() {
        let mut session = PointerSession::new(silent_sink(), &Config::default());
        session.on_sensor(SensorReading::Gyroscope(GyroSample { rate_x: 0.001, rate_z: 0.002 }));
    }

    #[test]
    fn test_touchpad_mode_disables_gyro() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());
        session.set_touchpad_mode(true);

        session.on_sensor(SensorReading::Gyroscope(GyroSample { rate_x: 1.0, rate_z: 1.0 }));
        assert!(take(&events).is_empty());

        session.touchpad_down(Point::new(10.0, 10.0));
        session.touchpad_move(Point::new(14.0, 8.0), 1);
        assert_eq!(take(&events), vec![InputEvent::PointerMotion { dx: 6.0, dy: -3.0 }]);
    }

    #[test]
    fn test_slider_sensitivity_scales_gyro() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());

        session.set_gyro_sensitivity(sensitivity_from_slider(200));
        session.on_sensor(SensorReading::Gyroscope(GyroSample { rate_x: 0.5, rate_z: -0.25 }));
        assert_eq!(take(&events), vec![InputEvent::PointerMotion { dx: 10.0, dy: -20.0 }]);
    }

    #[test]
    fn test_touchpad_lift_drops_anchor() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());
        session.set_touchpad_mode(true);

        session.touchpad_down(Point::new(10.0, 10.0));
        session.touchpad_up();

        // First move after a lift only re-anchors
        session.touchpad_move(Point::new(50.0, 50.0), 1);
        assert!(take(&events).is_empty());

        session.touchpad_move(Point::new(52.0, 50.0), 1);
        assert_eq!(take(&events), vec![InputEvent::PointerMotion { dx: 3.0, dy: 0.0 }]);
    }

    #[test]
    fn test_touchpad_ignored_outside_touchpad_mode() {
        let mut session = PointerSession::new(silent_sink(), &Config::default());
        session.touchpad_down(Point::new(0.0, 0.0));
        session.touchpad_move(Point::new(50.0, 50.0), 1);
        session.tap(TapGesture::Single);
    }

    #[test]
    fn test_taps_and_clicks() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());
        session.set_touchpad_mode(true);

        session.tap(TapGesture::Double);
        session.tap(TapGesture::SecondFinger);
        session.click(ClickButton::Left);

        assert_eq!(
            take(&events),
            vec![
                InputEvent::PointerClick { button: ClickButton::Double },
                InputEvent::PointerClick { button: ClickButton::Right },
                InputEvent::PointerClick { button: ClickButton::Left },
            ]
        );
    }

    #[test]
    fn test_scroll_strip_and_direct_scroll() {
        let (sink, events) = recording_sink();
        let mut session = PointerSession::new(sink, &Config::default());

        session.scroll_down(100.0);
        session.scroll_move(105.0);
        session.scroll_move(126.0);
        session.scroll_up();
        session.scroll(0);
        session.scroll(-2);

        assert_eq!(
            take(&events),
            vec![
                InputEvent::PointerScroll { amount: 5 },
                InputEvent::PointerScroll { amount: -2 },
            ]
        );
    }

    #[test]
    fn test_key_tap() {
        let mut sink = MockEventSink::new();
        sink.expect_send()
            .withf(|event| *event == InputEvent::KeyTap { key: "ESC".into() })
            .times(1)
            .return_const(());

        let mut session = PointerSession::new(sink, &Config::default());
        session.key_tap("ESC");
    }
}
