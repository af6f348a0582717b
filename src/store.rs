//! # Peer Store
//!
//! Remembers the last receiver a connection succeeded with, as a small TOML
//! file next to the configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::transport::PeerAddress;

/// Default location of the store file
pub const DEFAULT_STORE_PATH: &str = "config/last_peer.toml";

#[derive(Debug, Serialize, Deserialize)]
struct StoredPeer {
    host: String,
    port: u16,
}

/// Last-used peer address persisted on disk
#[derive(Debug, Clone)]
pub struct PeerStore {
    path: PathBuf,
}

impl PeerStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved peer
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing has been saved yet
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed, or holds
    /// an invalid address.
    pub fn load(&self) -> Result<Option<PeerAddress>> {
        if !self.path.exists() {
            debug!("No saved peer at {}", self.path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredPeer = toml::from_str(&contents)?;
        PeerAddress::new(stored.host, stored.port).map(Some)
    }

    /// Save `peer`, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, peer: &PeerAddress) -> Result<()> {
        let stored = StoredPeer {
            host: peer.host().to_string(),
            port: peer.port(),
        };
        let contents = toml::to_string(&stored)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, contents)?;

        debug!("Saved peer {} to {}", peer, self.path.display());
        Ok(())
    }
}

impl Default for PeerStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemotePadError;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("nested").join("peer.toml"));
        let peer = PeerAddress::new("10.1.2.3", 6001).unwrap();

        store.save(&peer).unwrap();
        assert_eq!(store.load().unwrap(), Some(peer));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));

        store.save(&PeerAddress::new("10.0.0.1", 5005).unwrap()).unwrap();
        store.save(&PeerAddress::new("10.0.0.2", 5006).unwrap()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.host(), "10.0.0.2");
        assert_eq!(loaded.port(), 5006);
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let store = PeerStore::new(dir.path().join("peer.toml"));
        store.save(&PeerAddress::new("desk.local", 5005).unwrap()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("host = \"desk.local\""));
        assert!(contents.contains("port = 5005"));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("peer.toml");
        fs::write(&path, "host = ").unwrap();

        assert!(matches!(PeerStore::new(&path).load(), Err(RemotePadError::Config(_))));
    }

    #[test]
    fn test_invalid_saved_address() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("peer.toml");
        fs::write(&path, "host = \"\"\nport = 5005\n").unwrap();

        assert!(matches!(
            PeerStore::new(&path).load(),
            Err(RemotePadError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(PeerStore::default().path(), Path::new(DEFAULT_STORE_PATH));
    }
}
