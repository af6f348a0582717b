//! # Transport Module
//!
//! Delivers input events to the receiver over UDP.
//!
//! This module handles:
//! - Connecting with a single handshake datagram and a bounded wait
//! - Tracking connection state in a lock-free flag
//! - Queueing encoded events for one background worker task
//! - Disconnecting idempotently, including mid-handshake
//!
//! `Transport` is a cheap, non-blocking handle. Its methods are synchronous
//! and may be called from any thread; all socket I/O happens on the worker
//! task spawned by [`Transport::new`]. Delivery is best effort: events sent
//! while not connected, or that overflow the queue, are dropped, and
//! per-datagram send failures are only logged.

pub mod address;
pub mod listener;
pub mod state;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

pub use address::PeerAddress;
pub use listener::{ConnectionListener, ConnectionOutcome, EventSink};
pub use state::ConnectionState;

use crate::config::TransportConfig;
use crate::error::RemotePadError;
use crate::input::event::InputEvent;
use crate::wire::encoder::encode_event;
use state::LinkState;
use worker::{Command, Datagram, Worker};

/// Handle to the UDP transport
///
/// Dropping the handle stops the worker and closes the socket.
pub struct Transport {
    link_state: Arc<LinkState>,
    control_tx: mpsc::UnboundedSender<Command>,
    data_tx: mpsc::Sender<Datagram>,
    handshake_timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("state", &self.state())
            .field("handshake_timeout", &self.handshake_timeout)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a transport and spawn its worker
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Handshake timeout and outbound queue capacity
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use remote_pad::config::TransportConfig;
    /// use remote_pad::transport::{ConnectionOutcome, PeerAddress, Transport};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let transport = Transport::new(&TransportConfig::default());
    ///     let (tx, mut outcomes) = tokio::sync::mpsc::unbounded_channel::<ConnectionOutcome>();
    ///     transport.connect("192.168.1.100:5005".parse::<PeerAddress>()?, tx);
    ///     println!("{:?}", outcomes.recv().await);
    ///     Ok(())
    /// }
    /// ```
    pub fn new(config: &TransportConfig) -> Self {
        let link_state = Arc::new(LinkState::new());
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = mpsc::channel(config.queue_capacity.max(1));
        let handshake_timeout = config.handshake_timeout();

        let worker = Worker::new(link_state.clone(), control_rx, data_rx, handshake_timeout);
        tokio::spawn(worker.run());

        Self {
            link_state,
            control_tx,
            data_tx,
            handshake_timeout,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.link_state.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    /// Start connecting to `peer`
    ///
    /// Returns immediately with the state set to `Connecting`. Any previous
    /// connection or in-flight handshake is torn down first; a superseded
    /// handshake reports `HandshakeCancelled` to its own listener. The
    /// outcome of this attempt is reported to `listener` exactly once.
    pub fn connect(&self, peer: PeerAddress, listener: impl ConnectionListener) {
        let generation = self.link_state.begin_connect();
        debug!("Queueing connect to {} (generation {})", peer, generation);

        let command = Command::Connect {
            peer,
            generation,
            listener: Box::new(listener),
        };

        if let Err(mpsc::error::SendError(command)) = self.control_tx.send(command) {
            self.link_state.mark_failed(generation);
            if let Command::Connect { listener, .. } = command {
                listener.on_failed(RemotePadError::Socket("transport worker stopped".to_string()));
            }
        }
    }

    /// Queue an event for the receiver
    ///
    /// Dropped silently unless connected. Never blocks.
    pub fn send(&self, event: InputEvent) {
        let (generation, state) = self.link_state.load();
        if state != ConnectionState::Connected {
            return;
        }

        let datagram = Datagram {
            generation,
            payload: encode_event(&event),
        };

        match self.data_tx.try_send(datagram) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full, dropping {} message", event.kind());
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Transport worker stopped, dropping {} message", event.kind());
            }
        }
    }

    /// Close the connection
    ///
    /// Safe to call at any time and any number of times. The state is
    /// `Disconnected` when this returns; the worker closes the socket and
    /// abandons any in-flight handshake.
    pub fn disconnect(&self) {
        let (generation, previous) = self.link_state.disconnect();
        if previous != ConnectionState::Disconnected {
            info!("Disconnecting (was {})", previous);
        }

        if self.control_tx.send(Command::Disconnect { generation }).is_err() {
            debug!("Transport worker already stopped");
        }
    }
}

impl EventSink for Transport {
    fn send(&self, event: InputEvent) {
        Transport::send(self, event)
    }
}
