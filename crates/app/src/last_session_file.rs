use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Summary of the most recent session, written when the window closes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LastSessionFile {
    pub format_version: u32,
    pub player: String,
    pub seed: u64,
    pub level: u32,
    pub coins: u64,
    pub status: String,
    pub snapshot_hash_hex: String,
    pub session_ms: u64,
}

impl LastSessionFile {
    pub fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// One-line recap shown in the HUD of the next launch.
    pub fn summary_line(&self) -> String {
        format!(
            "last time: {} reached level {} with {} coins ({})",
            self.player, self.level, self.coins, self.status
        )
    }

    /// Loads the previous summary, treating a missing file as no previous session.
    pub fn load_previous(path: &Path) -> io::Result<Option<Self>> {
        match Self::load(path) {
            Ok(summary) => Ok(Some(summary)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let state: Self = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(state)
    }
}
