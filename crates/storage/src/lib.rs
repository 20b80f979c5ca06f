use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::warn;

const APP_DIR: &str = "mixstudio";
const CREDENTIAL_FILE: &str = "credential";

/// Persists the single opaque access token the client holds.
///
/// Purely mechanical: no validation, no interpretation. Every operation is
/// best-effort; an unavailable or broken storage location degrades to
/// "no saved token" rather than surfacing an error to the caller.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in the platform config directory
    /// (e.g. `~/.config/mixstudio/credential`). Falls back to a relative
    /// path when the platform reports no config directory.
    pub fn open_default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR).join(CREDENTIAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved token, or `None` if nothing usable is stored.
    pub fn load(&self) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "credential read failed");
                return None;
            }
        };
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(token.to_string())
    }

    pub fn save(&self, token: &str) {
        if let Err(err) = self.try_save(token) {
            warn!(path = %self.path.display(), %err, "credential write failed");
        }
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), %err, "credential removal failed");
            }
        }
    }

    fn try_save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
