use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Data;

/// Persistence of the whole feed collection as one JSON document. The
/// path is explicit state threaded in from the CLI, not a process-wide
/// variable. There is no locking: concurrent processes racing on the
/// same store are last-writer-wins at the file level.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolution order: explicit path from the CLI (tilde-expanded),
    /// then the FEEDKEEP_STORE environment variable, then
    /// ~/.feedkeep.json.
    pub fn resolve(override_path: Option<&str>) -> Self {
        let path = if let Some(raw) = override_path {
            PathBuf::from(shellexpand::tilde(raw).to_string())
        } else if let Ok(env_path) = std::env::var("FEEDKEEP_STORE") {
            PathBuf::from(env_path)
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".feedkeep.json")
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the collection; a missing file is an empty collection, not
    /// an error.
    pub fn load(&self) -> Result<Data> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no store file yet, starting empty");
            return Ok(Data::default());
        }

        let buf = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read store at {}", self.path.display()))?;
        let data = serde_json::from_str(&buf)
            .with_context(|| format!("store at {} is not valid JSON", self.path.display()))?;
        Ok(data)
    }

    /// Writes the full collection back, owner read/write only.
    pub fn save(&self, data: &Data) -> Result<()> {
        let buf = serde_json::to_string_pretty(data).context("failed to serialize store")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("failed to open store at {}", self.path.display()))?;
        file.write_all(buf.as_bytes())
            .with_context(|| format!("failed to write store at {}", self.path.display()))?;
        Ok(())
    }
}
