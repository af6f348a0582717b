//! # Pad Receiver
//!
//! Reference receiver for testing a controller end to end.
//!
//! Binds UDP on all interfaces, answers each handshake with one `ACK`
//! datagram and logs every decoded input message. It does not inject input
//! into the operating system.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use remote_pad::config::LoggingConfig;
use remote_pad::logging;
use remote_pad::wire::decoder::{decode_message, message_to_event};
use remote_pad::wire::protocol::{WireMessage, DEFAULT_PORT, HANDSHAKE_ACK, MAX_DATAGRAM_SIZE};

/// Main entry point for the reference receiver
///
/// # Usage
///
/// ```text
/// pad-receiver [PORT]
/// ```
///
/// # Errors
///
/// Returns error if the port argument is invalid or the socket cannot be
/// bound.
#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init(&LoggingConfig::default(), "pad-receiver.log");
    info!("Pad Receiver v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u16>()
            .with_context(|| format!("Invalid port {:?}", arg))?,
        None => DEFAULT_PORT,
    };

    let socket = UdpSocket::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind UDP port {}", port))?;
    info!("Listening on {}", socket.local_addr()?);
    info!("Press Ctrl+C to exit");

    let mut buf = [0u8; MAX_DATAGRAM_SIZE];
    let mut received: u64 = 0;

    loop {
        tokio::select! {
            result = socket.recv_from(&mut buf) => {
                let (len, from) = match result {
                    Ok(datagram) => datagram,
                    Err(e) => {
                        warn!("Receive failed: {}", e);
                        continue;
                    }
                };

                received += 1;
                handle_datagram(&socket, &buf[..len], from).await;
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total datagrams received: {}", received);
                break;
            }
        }
    }

    Ok(())
}

async fn handle_datagram(socket: &UdpSocket, payload: &[u8], from: SocketAddr) {
    let message = match decode_message(payload) {
        Ok(message) => message,
        Err(e) => {
            warn!("Skipping datagram from {}: {}", from, e);
            return;
        }
    };

    if message == WireMessage::Handshake {
        info!("Handshake from {}", from);
        if let Err(e) = socket.send_to(HANDSHAKE_ACK, from).await {
            warn!("Failed to acknowledge {}: {}", from, e);
        }
        return;
    }

    match message_to_event(message) {
        Ok(Some(event)) => info!("{} from {}: {:?}", event.kind(), from, event),
        Ok(None) => debug!("Empty message from {}", from),
        Err(e) => warn!("Skipping datagram from {}: {}", from, e),
    }
}
