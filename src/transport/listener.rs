//! Seams between the transport and the code that composes it

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::address::PeerAddress;
use crate::error::RemotePadError;
use crate::input::event::InputEvent;

/// Receives the result of one `connect()` call
///
/// Exactly one of the two methods is called per attempt, from the transport
/// worker task. Implementations must not block.
pub trait ConnectionListener: Send + 'static {
    fn on_connected(&self, peer: &PeerAddress);
    fn on_failed(&self, error: RemotePadError);
}

/// Connection result delivered onto the owner's event queue
#[derive(Debug)]
pub enum ConnectionOutcome {
    Connected(PeerAddress),
    Failed(RemotePadError),
}

impl ConnectionListener for UnboundedSender<ConnectionOutcome> {
    fn on_connected(&self, peer: &PeerAddress) {
        if self.send(ConnectionOutcome::Connected(peer.clone())).is_err() {
            debug!("Connection outcome receiver dropped");
        }
    }

    fn on_failed(&self, error: RemotePadError) {
        if self.send(ConnectionOutcome::Failed(error)).is_err() {
            debug!("Connection outcome receiver dropped");
        }
    }
}

/// Destination for input events
///
/// Implementations must return immediately; producers call this from UI and
/// sensor callbacks.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn send(&self, event: InputEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn send(&self, event: InputEvent) {
        (**self).send(event)
    }
}
