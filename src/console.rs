//! # Console Commands
//!
//! Line-oriented commands that stand in for touch and sensor callbacks when
//! the controller runs in a terminal.

use thiserror::Error;

use crate::input::event::{ButtonGroup, ClickButton};
use crate::input::joystick::Point;
use crate::input::orientation::{GravitySample, GyroSample};
use crate::input::touchpad::TapGesture;
use crate::session::StickSide;
use crate::transport::PeerAddress;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  stick <left|right> <x> <y>          deflect a stick (units of max travel)
  release <left|right>                lift a stick
  resize <left|right> <w> <h>         stick view laid out with new bounds (px)
  button <group> <key> <press|release>
  gyro <rate_x> <rate_z>              gyroscope sample (rad/s)
  accel <x> <y> <z>                   accelerometer sample (m/s^2)
  tilt <on|off>
  sensitivity <left|right|tilt|gyro> <0-200>
  click <l|r|d>
  scroll <steps>
  pad <down|move> <x> <y> [fingers]    touchpad surface (px)
  pad up
  pad tap <single|double|two>
  strip <down|move> <y>               scroll strip (px)
  strip up
  key <name>                          tap a keyboard key
  mode <game|mouse>                   choose which screen gets sensor samples
  touchpad <on|off>
  connect [host:port]
  disconnect
  status
  help
  quit";

/// Highest sensitivity slider position
pub const MAX_SLIDER: u32 = 200;

/// Controller screen receiving sensor samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Game,
    Mouse,
}

/// What a sensitivity slider adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityTarget {
    LeftStick,
    RightStick,
    Tilt,
    Gyro,
}

/// Touchpad surface callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadTouch {
    Down(Point),
    Move { point: Point, fingers: usize },
    Up,
    Tap(TapGesture),
}

/// Scroll strip callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StripTouch {
    Down(f64),
    Move(f64),
    Up,
}

/// One parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Stick { side: StickSide, x: f64, y: f64 },
    Release(StickSide),
    Resize { side: StickSide, width: f64, height: f64 },
    Button { group: ButtonGroup, key: String, pressed: bool },
    Gyro(GyroSample),
    Accel(GravitySample),
    Tilt(bool),
    Sensitivity { target: SensitivityTarget, progress: u32 },
    Click(ClickButton),
    Scroll(i32),
    Pad(PadTouch),
    Strip(StripTouch),
    Key(String),
    Mode(Screen),
    Touchpad(bool),
    Connect(Option<PeerAddress>),
    Disconnect,
    Status,
    Help,
    Quit,
}

/// Why a console line was rejected
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Parse one line
///
/// Blank lines and `#` comments yield `Ok(None)`. Command words are
/// case-insensitive; key names are sent upper-cased.
///
/// # Examples
///
/// ```
/// use remote_pad::console::{parse_command, ConsoleCommand};
///
/// assert_eq!(parse_command("scroll -3")?, Some(ConsoleCommand::Scroll(-3)));
/// assert_eq!(parse_command("   ")?, None);
/// # Ok::<(), remote_pad::console::CommandError>(())
/// ```
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let name = words[0].to_ascii_lowercase();
    let args = &words[1..];

    let command = match name.as_str() {
        "stick" => match args {
            [side, x, y] => ConsoleCommand::Stick {
                side: parse_side(side)?,
                x: parse_number("x", x)?,
                y: parse_number("y", y)?,
            },
            _ => return Err(CommandError::Usage("stick <left|right> <x> <y>")),
        },
        "release" => match args {
            [side] => ConsoleCommand::Release(parse_side(side)?),
            _ => return Err(CommandError::Usage("release <left|right>")),
        },
        "resize" => match args {
            [side, width, height] => ConsoleCommand::Resize {
                side: parse_side(side)?,
                width: parse_number("width", width)?,
                height: parse_number("height", height)?,
            },
            _ => return Err(CommandError::Usage("resize <left|right> <w> <h>")),
        },
        "button" => match args {
            [group, key, action] => ConsoleCommand::Button {
                group: ButtonGroup::from_name(&group.to_ascii_lowercase())
                    .ok_or_else(|| invalid("button group", group))?,
                key: key.to_ascii_uppercase(),
                pressed: match action.to_ascii_lowercase().as_str() {
                    "press" | "down" => true,
                    "release" | "up" => false,
                    _ => return Err(invalid("button action", action)),
                },
            },
            _ => return Err(CommandError::Usage("button <group> <key> <press|release>")),
        },
        "gyro" => match args {
            [rate_x, rate_z] => ConsoleCommand::Gyro(GyroSample {
                rate_x: parse_number("rate_x", rate_x)?,
                rate_z: parse_number("rate_z", rate_z)?,
            }),
            _ => return Err(CommandError::Usage("gyro <rate_x> <rate_z>")),
        },
        "accel" => match args {
            [x, y, z] => ConsoleCommand::Accel(GravitySample {
                x: parse_number("x", x)?,
                y: parse_number("y", y)?,
                z: parse_number("z", z)?,
            }),
            _ => return Err(CommandError::Usage("accel <x> <y> <z>")),
        },
        "tilt" => match args {
            [state] => ConsoleCommand::Tilt(parse_switch("tilt", state)?),
            _ => return Err(CommandError::Usage("tilt <on|off>")),
        },
        "sensitivity" => match args {
            [target, progress] => ConsoleCommand::Sensitivity {
                target: match target.to_ascii_lowercase().as_str() {
                    "left" | "l" => SensitivityTarget::LeftStick,
                    "right" | "r" => SensitivityTarget::RightStick,
                    "tilt" => SensitivityTarget::Tilt,
                    "gyro" => SensitivityTarget::Gyro,
                    _ => return Err(invalid("sensitivity target", target)),
                },
                progress: progress
                    .parse::<u32>()
                    .ok()
                    .filter(|p| *p <= MAX_SLIDER)
                    .ok_or_else(|| invalid("slider position", progress))?,
            },
            _ => return Err(CommandError::Usage("sensitivity <left|right|tilt|gyro> <0-200>")),
        },
        "click" => match args {
            [button] => ConsoleCommand::Click(
                ClickButton::from_code(&button.to_ascii_uppercase())
                    .ok_or_else(|| invalid("click", button))?,
            ),
            _ => return Err(CommandError::Usage("click <l|r|d>")),
        },
        "scroll" => match args {
            [steps] => ConsoleCommand::Scroll(
                steps.parse::<i32>().map_err(|_| invalid("scroll steps", steps))?,
            ),
            _ => return Err(CommandError::Usage("scroll <steps>")),
        },
        "pad" => ConsoleCommand::Pad(parse_pad(args)?),
        "strip" => ConsoleCommand::Strip(match args {
            [action, y] if action.eq_ignore_ascii_case("down") => {
                StripTouch::Down(parse_number("y", y)?)
            }
            [action, y] if action.eq_ignore_ascii_case("move") => {
                StripTouch::Move(parse_number("y", y)?)
            }
            [action] if action.eq_ignore_ascii_case("up") => StripTouch::Up,
            _ => return Err(CommandError::Usage("strip <down|move> <y> | strip up")),
        }),
        "key" => match args {
            [key] => ConsoleCommand::Key(key.to_ascii_uppercase()),
            _ => return Err(CommandError::Usage("key <name>")),
        },
        "mode" => match args {
            [screen] => ConsoleCommand::Mode(match screen.to_ascii_lowercase().as_str() {
                "game" => Screen::Game,
                "mouse" => Screen::Mouse,
                _ => return Err(invalid("mode", screen)),
            }),
            _ => return Err(CommandError::Usage("mode <game|mouse>")),
        },
        "touchpad" => match args {
            [state] => ConsoleCommand::Touchpad(parse_switch("touchpad", state)?),
            _ => return Err(CommandError::Usage("touchpad <on|off>")),
        },
        "connect" => match args {
            [] => ConsoleCommand::Connect(None),
            [address] => ConsoleCommand::Connect(Some(
                address.parse().map_err(|_| invalid("address", address))?,
            )),
            _ => return Err(CommandError::Usage("connect [host:port]")),
        },
        "disconnect" => ConsoleCommand::Disconnect,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => return Err(CommandError::Unknown(words[0].to_string())),
    };

    Ok(Some(command))
}

fn invalid(name: &'static str, value: &str) -> CommandError {
    CommandError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

fn parse_side(value: &str) -> Result<StickSide, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "left" | "l" => Ok(StickSide::Left),
        "right" | "r" => Ok(StickSide::Right),
        _ => Err(invalid("stick", value)),
    }
}

fn parse_pad(args: &[&str]) -> Result<PadTouch, CommandError> {
    const USAGE: &str = "pad <down|move> <x> <y> [fingers] | pad up | pad tap <single|double|two>";

    let Some((action, rest)) = args.split_first() else {
        return Err(CommandError::Usage(USAGE));
    };

    let touch = match (action.to_ascii_lowercase().as_str(), rest) {
        ("down", [x, y]) => PadTouch::Down(Point::new(parse_number("x", x)?, parse_number("y", y)?)),
        ("move", [x, y]) => PadTouch::Move {
            point: Point::new(parse_number("x", x)?, parse_number("y", y)?),
            fingers: 1,
        },
        ("move", [x, y, fingers]) => PadTouch::Move {
            point: Point::new(parse_number("x", x)?, parse_number("y", y)?),
            fingers: fingers
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("finger count", fingers))?,
        },
        ("up", []) => PadTouch::Up,
        ("tap", [gesture]) => PadTouch::Tap(match gesture.to_ascii_lowercase().as_str() {
            "single" => TapGesture::Single,
            "double" => TapGesture::Double,
            "two" => TapGesture::SecondFinger,
            _ => return Err(invalid("tap", gesture)),
        }),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    Ok(touch)
}

fn parse_number(name: &'static str, value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(name, value))
}

fn parse_switch(name: &'static str, value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(invalid(name, value)),
    }
}
