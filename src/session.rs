// Durable session storage: one JSON file in the user's home directory
// holding `{role, username}`. Read once at startup, written at login,
// removed at logout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::Session;

const SESSION_FILE: &str = ".libshelf_session";

/// Owns the durable session file. The path is injectable so tests can
/// point it at a temporary directory.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the user's home directory, falling back to the
    /// working directory when no home is known.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Restore the persisted session. A missing or corrupt file is the
    /// same as no session; it never becomes an error.
    pub fn load(&self) -> Option<Session> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(err) => {
                debug!(%err, "ignoring unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let data = serde_json::to_string(session).context("serializing session")?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing session file {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the session file. Already-absent is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("removing session file {}", self.path.display()))
            }
        }
    }
}
