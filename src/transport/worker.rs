//! Transport worker task
//!
//! The only code that touches the socket. Control commands are polled
//! before data so a `disconnect()` never waits behind queued datagrams.
//!
//! Commands can reach the queue in a different order than their generations
//! were taken when `connect()` and `disconnect()` race on several threads.
//! Only the command carrying the current generation acts; older ones are
//! dropped, and an older `Connect` reports `HandshakeCancelled`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::address::PeerAddress;
use super::listener::ConnectionListener;
use super::state::LinkState;
use crate::error::{RemotePadError, Result};
use crate::wire::encoder::encode_handshake;
use crate::wire::protocol::MAX_DATAGRAM_SIZE;

/// Request from the public handle to the worker
pub(crate) enum Command {
    Connect {
        peer: PeerAddress,
        generation: u64,
        listener: Box<dyn ConnectionListener>,
    },
    Disconnect {
        generation: u64,
    },
}

impl Command {
    fn generation(&self) -> u64 {
        match self {
            Command::Connect { generation, .. } | Command::Disconnect { generation } => *generation,
        }
    }
}

/// Encoded message tagged with the generation it was queued under
#[derive(Debug)]
pub(crate) struct Datagram {
    pub(crate) generation: u64,
    pub(crate) payload: Bytes,
}

/// Socket of an established connection
struct Link {
    socket: UdpSocket,
    target: SocketAddr,
    generation: u64,
}

enum Handshake {
    Established(Link),
    Failed(RemotePadError),
    /// A control command arrived while waiting
    Interrupted(Option<Command>),
}

pub(crate) struct Worker {
    link_state: Arc<LinkState>,
    control_rx: mpsc::UnboundedReceiver<Command>,
    data_rx: mpsc::Receiver<Datagram>,
    handshake_timeout: Duration,
    link: Option<Link>,
}

impl Worker {
    pub(crate) fn new(
        link_state: Arc<LinkState>,
        control_rx: mpsc::UnboundedReceiver<Command>,
        data_rx: mpsc::Receiver<Datagram>,
        handshake_timeout: Duration,
    ) -> Self {
        Self {
            link_state,
            control_rx,
            data_rx,
            handshake_timeout,
            link: None,
        }
    }

    /// Run until the owning `Transport` is dropped
    pub(crate) async fn run(mut self) {
        debug!("Transport worker started");

        loop {
            tokio::select! {
                biased;

                command = self.control_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },

                datagram = self.data_rx.recv() => match datagram {
                    Some(datagram) => self.send_datagram(datagram).await,
                    None => break,
                },
            }
        }

        self.close();
        debug!("Transport worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        let mut next = Some(command);

        while let Some(command) = next.take() {
            if !self.link_state.is_current(command.generation()) {
                self.drop_stale(command);
                continue;
            }

            match command {
                Command::Disconnect { .. } => self.close(),
                Command::Connect {
                    peer,
                    generation,
                    listener,
                } => {
                    // A new attempt always tears down the previous socket
                    self.close();

                    match self.handshake(&peer, generation).await {
                        Handshake::Established(link) => {
                            if self.link_state.mark_connected(generation) {
                                info!("Connected to {} ({})", peer, link.target);
                                self.link = Some(link);
                                listener.on_connected(&peer);
                            } else {
                                debug!("Handshake with {} completed after being superseded", peer);
                                listener.on_failed(RemotePadError::HandshakeCancelled);
                            }
                        }
                        Handshake::Failed(error) => {
                            self.link_state.mark_failed(generation);
                            warn!("Connection to {} failed: {}", peer, error);
                            listener.on_failed(error);
                        }
                        Handshake::Interrupted(command) => {
                            debug!("Handshake with {} interrupted", peer);
                            listener.on_failed(RemotePadError::HandshakeCancelled);
                            next = command;
                        }
                    }
                }
            }
        }
    }

    /// Open a socket, send the handshake and wait for any reply
    ///
    /// Resolution and the wait share one timeout budget. A current control
    /// command arriving meanwhile abandons the attempt; stale ones are
    /// dropped without disturbing it.
    async fn handshake(&mut self, peer: &PeerAddress, generation: u64) -> Handshake {
        info!("Connecting to {} (timeout {} ms)", peer, self.handshake_timeout.as_millis());

        let attempt = open_link(peer, generation);
        let deadline = tokio::time::sleep(self.handshake_timeout);
        tokio::pin!(attempt);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;

                command = self.control_rx.recv() => match command {
                    Some(command) if !self.link_state.is_current(command.generation()) => {
                        self.drop_stale(command);
                    }
                    command => return Handshake::Interrupted(command),
                },

                result = &mut attempt => {
                    return match result {
                        Ok(link) => Handshake::Established(link),
                        Err(error) => Handshake::Failed(error),
                    };
                }

                _ = &mut deadline => {
                    return Handshake::Failed(RemotePadError::HandshakeTimeout(self.handshake_timeout));
                }
            }
        }
    }

    fn drop_stale(&mut self, command: Command) {
        match command {
            Command::Connect {
                peer,
                generation,
                listener,
            } => {
                debug!("Skipping superseded connect to {} (generation {})", peer, generation);
                listener.on_failed(RemotePadError::HandshakeCancelled);
            }
            Command::Disconnect { generation } => {
                debug!("Skipping superseded disconnect (generation {})", generation);
                // The link it was meant for is still older than this command
                if self.link.as_ref().is_some_and(|link| link.generation < generation) {
                    self.close();
                }
            }
        }
    }

    async fn send_datagram(&mut self, datagram: Datagram) {
        let link = match &self.link {
            Some(link) if link.generation == datagram.generation => link,
            _ => {
                debug!("Dropping datagram from a stale connection");
                return;
            }
        };

        match link.socket.send_to(&datagram.payload, link.target).await {
            Ok(sent) => debug!("Sent {} bytes to {}", sent, link.target),
            // Real-time input is perishable: log and move on
            Err(e) => warn!("Failed to send datagram to {}: {}", link.target, e),
        }
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            info!("Closed socket to {}", link.target);
        }
    }
}

async fn open_link(peer: &PeerAddress, generation: u64) -> Result<Link> {
    let target = peer.resolve().await?;

    let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| RemotePadError::Socket(format!("Failed to bind {}: {}", bind_addr, e)))?;

    socket
        .send_to(&encode_handshake(), target)
        .await
        .map_err(|e| RemotePadError::Socket(format!("Failed to send handshake to {}: {}", target, e)))?;

    // Any reply counts; the payload is not checked
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];
    let (len, from) = socket
        .recv_from(&mut buf)
        .await
        .map_err(|e| RemotePadError::Socket(format!("Failed to receive handshake reply: {}", e)))?;
    debug!("Handshake reply ({} bytes) from {}", len, from);

    Ok(Link {
        socket,
        target,
        generation,
    })
}
