//! # Remote Pad
//!
//! Turn a terminal into a remote gamepad, mouse and tilt controller.
//!
//! Touch and sensor input is typed as console commands (see `help`), turned
//! into input events by the game and mouse sessions, and sent to a receiver
//! over UDP.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use remote_pad::config::{sensitivity_from_slider, Config};
use remote_pad::console::{
    parse_command, ConsoleCommand, PadTouch, Screen, SensitivityTarget, StripTouch, HELP,
};
use remote_pad::error::RemotePadError;
use remote_pad::input::orientation::SensorReading;
use remote_pad::logging;
use remote_pad::session::{GamepadSession, PointerSession, StickSide};
use remote_pad::store::PeerStore;
use remote_pad::transport::{ConnectionOutcome, PeerAddress, Transport};

/// Configuration file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the Remote Pad controller
///
/// # Usage
///
/// ```text
/// remote-pad [CONFIG] [HOST:PORT]
/// ```
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (defaults if the file is missing)
///    - Set up logging
///    - Pick the peer: command line, then saved peer, then configuration
///    - Start connecting
///
/// 2. **Main Loop**
///    - Apply console commands to the active session
///    - Save the peer and reset held keys after each successful connect
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration or the peer address is invalid.
#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = args.first().map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);

    let config = if Path::new(config_path).exists() {
        Config::load(config_path).with_context(|| format!("Failed to load {}", config_path))?
    } else {
        Config::default()
    };

    let _log_guard = logging::init(&config.logging, "remote-pad.log");
    info!("Remote Pad v{} starting...", env!("CARGO_PKG_VERSION"));
    if !Path::new(config_path).exists() {
        info!("No configuration at {}, using defaults", config_path);
    }

    let store = PeerStore::default();
    let peer = pick_peer(args.get(1).map(String::as_str), &store, &config)?;

    let transport = Arc::new(Transport::new(&config.transport));
    let (outcome_tx, mut outcomes) = mpsc::unbounded_channel();
    let mut controller = Controller {
        game: GamepadSession::new(transport.clone(), &config)?,
        pointer: PointerSession::new(transport.clone(), &config),
        screen: Screen::Game,
        transport,
        peer,
        store,
        outcome_tx,
    };
    controller.connect();

    let mut lines = spawn_stdin_reader();
    info!("Type `help` for commands, Ctrl+C to exit");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed, shutting down...");
                    break;
                };

                match parse_command(&line) {
                    Ok(Some(ConsoleCommand::Quit)) => {
                        info!("Shutting down...");
                        break;
                    }
                    Ok(Some(command)) => controller.handle(command),
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                }
            }

            Some(outcome) = outcomes.recv() => controller.on_outcome(outcome),

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    controller.transport.disconnect();
    Ok(())
}

/// Command line peer, then the saved peer, then the configured one
fn pick_peer(cli: Option<&str>, store: &PeerStore, config: &Config) -> Result<PeerAddress> {
    if let Some(address) = cli {
        return address
            .parse()
            .with_context(|| format!("Invalid peer address {:?}", address));
    }

    match store.load() {
        Ok(Some(peer)) => {
            info!("Using saved peer {}", peer);
            return Ok(peer);
        }
        Ok(None) => {}
        Err(e) => warn!("Ignoring saved peer at {}: {}", store.path().display(), e),
    }

    Ok(config.peer.address()?)
}

/// Read stdin lines on a dedicated thread
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

/// Owns both sessions and routes commands to them
struct Controller {
    transport: Arc<Transport>,
    game: GamepadSession<Arc<Transport>>,
    pointer: PointerSession<Arc<Transport>>,
    screen: Screen,
    peer: PeerAddress,
    store: PeerStore,
    outcome_tx: mpsc::UnboundedSender<ConnectionOutcome>,
}

impl Controller {
    fn connect(&self) {
        self.transport.connect(self.peer.clone(), self.outcome_tx.clone());
    }

    fn handle(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Stick { side, x, y } => {
                let point = self.game.stick(side).geometry().point_at(x, y);
                self.game.touch_stick(side, point);
            }
            ConsoleCommand::Release(side) => self.game.release_stick(side),
            ConsoleCommand::Resize { side, width, height } => {
                if let Err(e) = self.game.resize_stick(side, width, height) {
                    warn!("Cannot resize {:?} stick: {}", side, e);
                }
            }
            ConsoleCommand::Button { group, key, pressed } => self.game.button(group, &key, pressed),
            ConsoleCommand::Gyro(sample) => self.on_sensor(SensorReading::Gyroscope(sample)),
            ConsoleCommand::Accel(sample) => self.on_sensor(SensorReading::Accelerometer(sample)),
            ConsoleCommand::Tilt(enabled) => {
                self.game.set_tilt_enabled(enabled);
                info!("Tilt {}", if enabled { "enabled" } else { "disabled" });
            }
            ConsoleCommand::Sensitivity { target, progress } => {
                let sensitivity = sensitivity_from_slider(progress);
                match target {
                    SensitivityTarget::LeftStick => {
                        self.game.set_stick_sensitivity(StickSide::Left, sensitivity)
                    }
                    SensitivityTarget::RightStick => {
                        self.game.set_stick_sensitivity(StickSide::Right, sensitivity)
                    }
                    SensitivityTarget::Tilt => self.game.set_tilt_sensitivity(sensitivity),
                    SensitivityTarget::Gyro => self.pointer.set_gyro_sensitivity(sensitivity),
                }
                info!("{:?} sensitivity set to {:.2}", target, sensitivity);
            }
            ConsoleCommand::Click(button) => self.pointer.click(button),
            ConsoleCommand::Scroll(amount) => self.pointer.scroll(amount),
            ConsoleCommand::Pad(touch) => match touch {
                PadTouch::Down(point) => self.pointer.touchpad_down(point),
                PadTouch::Move { point, fingers } => self.pointer.touchpad_move(point, fingers),
                PadTouch::Up => self.pointer.touchpad_up(),
                PadTouch::Tap(gesture) => self.pointer.tap(gesture),
            },
            ConsoleCommand::Strip(touch) => match touch {
                StripTouch::Down(y) => self.pointer.scroll_down(y),
                StripTouch::Move(y) => self.pointer.scroll_move(y),
                StripTouch::Up => self.pointer.scroll_up(),
            },
            ConsoleCommand::Key(key) => self.pointer.key_tap(&key),
            ConsoleCommand::Mode(screen) => {
                if screen != self.screen {
                    self.game.reset();
                    self.screen = screen;
                }
                info!("Sensor input goes to the {:?} screen", self.screen);
            }
            ConsoleCommand::Touchpad(enabled) => {
                self.pointer.set_touchpad_mode(enabled);
                info!("Touchpad mode {}", if enabled { "on" } else { "off" });
            }
            ConsoleCommand::Connect(address) => {
                if let Some(address) = address {
                    self.peer = address;
                }
                self.connect();
            }
            ConsoleCommand::Disconnect => self.transport.disconnect(),
            ConsoleCommand::Status => {
                info!("{} ({}), screen {:?}", self.transport.state(), self.peer, self.screen);
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => {}
        }
    }

    fn on_sensor(&mut self, reading: SensorReading) {
        match self.screen {
            Screen::Game => self.game.on_sensor(reading),
            Screen::Mouse => self.pointer.on_sensor(reading),
        }
    }

    fn on_outcome(&mut self, outcome: ConnectionOutcome) {
        match outcome {
            ConnectionOutcome::Connected(peer) => {
                info!("Connected to {}", peer);
                self.game.reset();
                if let Err(e) = self.store.save(&peer) {
                    warn!("Could not save peer {}: {}", peer, e);
                }
            }
            ConnectionOutcome::Failed(RemotePadError::HandshakeCancelled) => {
                debug!("Previous connection attempt cancelled");
            }
            ConnectionOutcome::Failed(e) => error!("Connection failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_pick_peer_prefers_command_line() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));
        store.save(&PeerAddress::new("10.0.0.9", 5005).unwrap()).unwrap();

        let peer = pick_peer(Some("10.0.0.1:7000"), &store, &Config::default()).unwrap();
        assert_eq!(peer, PeerAddress::new("10.0.0.1", 7000).unwrap());
    }

    #[test]
    fn test_pick_peer_uses_saved_then_config() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));

        let peer = pick_peer(None, &store, &Config::default()).unwrap();
        assert_eq!(peer, PeerAddress::new("192.168.1.100", 5005).unwrap());

        store.save(&PeerAddress::new("10.0.0.9", 5006).unwrap()).unwrap();
        let peer = pick_peer(None, &store, &Config::default()).unwrap();
        assert_eq!(peer, PeerAddress::new("10.0.0.9", 5006).unwrap());
    }

    #[test]
    fn test_pick_peer_rejects_bad_command_line() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));
        assert!(pick_peer(Some("nowhere"), &store, &Config::default()).is_err());
    }
}
