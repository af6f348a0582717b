//! Receiver address parsing and resolution

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use tokio::net::lookup_host;

use crate::error::{RemotePadError, Result};

/// Host and port of the receiver
///
/// The host is either an IP literal or a name resolved at connect time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    host: String,
    port: u16,
}

impl PeerAddress {
    /// Build a validated address
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if the host is empty or contains whitespace,
    /// or the port is 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into().trim().to_string();

        if host.is_empty() {
            return Err(RemotePadError::InvalidAddress("host cannot be empty".to_string()));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(RemotePadError::InvalidAddress(format!(
                "host contains whitespace: {:?}",
                host
            )));
        }
        if port == 0 {
            return Err(RemotePadError::InvalidAddress("port cannot be 0".to_string()));
        }

        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to the first socket address the host maps to
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if the lookup fails or yields nothing.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| RemotePadError::InvalidAddress(format!("Cannot resolve {}: {}", self, e)))?;

        addrs
            .next()
            .ok_or_else(|| RemotePadError::InvalidAddress(format!("No addresses for {}", self)))
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parses `host:port`, with IPv6 hosts in brackets (`[::1]:5005`)
impl FromStr for PeerAddress {
    type Err = RemotePadError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| RemotePadError::InvalidAddress(format!("Expected host:port, got {:?}", s)))?;

        let host = match host.strip_prefix('[') {
            Some(inner) => inner.strip_suffix(']').ok_or_else(|| {
                RemotePadError::InvalidAddress(format!("Unclosed bracket in {:?}", s))
            })?,
            None if host.contains(':') => {
                return Err(RemotePadError::InvalidAddress(format!(
                    "IPv6 hosts must be bracketed: {:?}",
                    s
                )))
            }
            None => host,
        };

        let port = port
            .parse::<u16>()
            .map_err(|e| RemotePadError::InvalidAddress(format!("Bad port {:?}: {}", port, e)))?;

        Self::new(host, port)
    }
}
