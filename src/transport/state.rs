//! Lock-free connection state
//!
//! The state and a connection generation share one `AtomicU64`: the low two
//! bits hold the [`ConnectionState`], the rest the generation. Every
//! `connect()` and `disconnect()` starts a new generation, so the worker can
//! only promote the attempt it is actually running and datagrams queued for
//! an older connection are recognisable.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const STATE_BITS: u32 = 2;
const STATE_MASK: u64 = (1 << STATE_BITS) - 1;

/// Transport connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    fn to_bits(self) -> u64 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
        }
    }

    fn from_bits(bits: u64) -> Self {
        match bits & STATE_MASK {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

fn pack(generation: u64, state: ConnectionState) -> u64 {
    (generation << STATE_BITS) | state.to_bits()
}

fn unpack(word: u64) -> (u64, ConnectionState) {
    (word >> STATE_BITS, ConnectionState::from_bits(word))
}

fn next_generation(generation: u64) -> u64 {
    unpack(pack(generation.wrapping_add(1), ConnectionState::Disconnected)).0
}

/// Shared state word, read by producers and written by the transport
#[derive(Debug)]
pub(crate) struct LinkState(AtomicU64);

impl LinkState {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(pack(0, ConnectionState::Disconnected)))
    }

    pub(crate) fn load(&self) -> (u64, ConnectionState) {
        unpack(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.load().1
    }

    /// Start a new generation in `Connecting`, returning it
    pub(crate) fn begin_connect(&self) -> u64 {
        let (previous, _) = self.advance(ConnectionState::Connecting);
        next_generation(previous)
    }

    /// Start a new generation in `Disconnected`
    ///
    /// Returns the new generation and the state it replaced.
    pub(crate) fn disconnect(&self) -> (u64, ConnectionState) {
        let (previous, state) = self.advance(ConnectionState::Disconnected);
        (next_generation(previous), state)
    }

    /// Whether `generation` has not been superseded
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.load().0 == generation
    }

    /// `Connecting -> Connected`, only if `generation` is still current
    pub(crate) fn mark_connected(&self, generation: u64) -> bool {
        self.transition(generation, ConnectionState::Connecting, ConnectionState::Connected)
    }

    /// `Connecting -> Disconnected`, only if `generation` is still current
    pub(crate) fn mark_failed(&self, generation: u64) -> bool {
        self.transition(generation, ConnectionState::Connecting, ConnectionState::Disconnected)
    }

    /// Move to `state` under the next generation; returns what was replaced
    fn advance(&self, state: ConnectionState) -> (u64, ConnectionState) {
        let previous = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (generation, _) = unpack(word);
                Some(pack(generation.wrapping_add(1), state))
            })
            .unwrap_or_else(|word| word);
        unpack(previous)
    }

    fn transition(&self, generation: u64, from: ConnectionState, to: ConnectionState) -> bool {
        self.0
            .compare_exchange(
                pack(generation, from),
                pack(generation, to),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let link = LinkState::new();
        assert_eq!(link.load(), (0, ConnectionState::Disconnected));
    }

    #[test]
    fn test_connect_then_promote() {
        let link = LinkState::new();
        let generation = link.begin_connect();
        assert_eq!(link.load(), (generation, ConnectionState::Connecting));

        assert!(link.mark_connected(generation));
        assert_eq!(link.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_superseded_attempt_cannot_promote() {
        let link = LinkState::new();
        let first = link.begin_connect();
        let second = link.begin_connect();
        assert_ne!(first, second);

        assert!(!link.mark_connected(first));
        assert!(!link.mark_failed(first));
        assert_eq!(link.load(), (second, ConnectionState::Connecting));
    }

    #[test]
    fn test_disconnect_blocks_late_handshake() {
        let link = LinkState::new();
        let generation = link.begin_connect();

        let (next, previous) = link.disconnect();
        assert_eq!(previous, ConnectionState::Connecting);
        assert!(next > generation);
        assert!(!link.mark_connected(generation));
        assert_eq!(link.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let link = LinkState::new();
        assert_eq!(link.disconnect().1, ConnectionState::Disconnected);
        assert_eq!(link.disconnect().1, ConnectionState::Disconnected);
        assert_eq!(link.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_is_current() {
        let link = LinkState::new();
        let first = link.begin_connect();
        assert!(link.is_current(first));

        let (second, _) = link.disconnect();
        assert!(!link.is_current(first));
        assert!(link.is_current(second));
    }

    #[test]
    fn test_mark_failed() {
        let link = LinkState::new();
        let generation = link.begin_connect();
        assert!(link.mark_failed(generation));
        assert_eq!(link.state(), ConnectionState::Disconnected);
        // Already failed; nothing left to promote
        assert!(!link.mark_connected(generation));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
    }
}
