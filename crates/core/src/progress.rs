//! Progress sync: the persistence collaborator that stores unlocked levels and coins.
//!
//! Two backends share one record book format. `MemoryProgress` keeps the book
//! in-process (handles are cheap clones of one shared book); `FileProgress`
//! keeps it in a JSON file rewritten atomically on every save.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::config::ProgressStoreConfig;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub coins: u64,
    pub highest_level: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self { coins: 0, highest_level: 1 }
    }
}

impl Progress {
    /// Level a new session should open on.
    pub fn suggested_level(&self) -> u32 {
        self.highest_level.max(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub coins: u64,
    pub highest_level: u32,
}

#[derive(Debug)]
pub enum ProgressError {
    Io(io::Error),
    Corrupt(String),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "progress store I/O error: {e}"),
            Self::Corrupt(message) => write!(f, "progress store is corrupt: {message}"),
        }
    }
}

impl Error for ProgressError {}

pub trait ProgressSync {
    fn load_progress(&mut self) -> Result<Progress, ProgressError>;

    /// Records a win. Stored coins are replaced; the highest level never decreases.
    fn save_progress(&mut self, next_level: u32, total_coins: u64) -> Result<(), ProgressError>;

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBook {
    pub format_version: u32,
    pub players: BTreeMap<String, Progress>,
}

impl ProgressBook {
    pub fn progress_of(&self, player: &str) -> Progress {
        self.players.get(player).copied().unwrap_or_default()
    }

    pub fn record_win(&mut self, player: &str, next_level: u32, total_coins: u64) {
        let entry = self.players.entry(player.to_string()).or_default();
        entry.coins = total_coins;
        entry.highest_level = entry.highest_level.max(next_level.max(1));
    }

    /// Highest level first, then most coins, then player name.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .players
            .iter()
            .map(|(player, progress)| LeaderboardEntry {
                player: player.clone(),
                coins: progress.coins,
                highest_level: progress.highest_level,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.highest_level
                .cmp(&a.highest_level)
                .then(b.coins.cmp(&a.coins))
                .then_with(|| a.player.cmp(&b.player))
        });
        entries.truncate(limit);
        entries
    }
}

#[derive(Clone, Debug)]
pub struct MemoryProgress {
    player: String,
    book: Arc<Mutex<ProgressBook>>,
}

impl MemoryProgress {
    pub fn new(player: &str) -> Self {
        Self { player: player.to_string(), book: Arc::new(Mutex::new(ProgressBook::default())) }
    }

    /// A store whose player already holds `progress`.
    pub fn seeded(player: &str, progress: Progress) -> Self {
        let store = Self::new(player);
        store.with_book(|book| {
            book.players.insert(player.to_string(), progress);
        });
        store
    }

    /// Another handle on the same book, acting for a different player.
    pub fn for_player(&self, player: &str) -> Self {
        Self { player: player.to_string(), book: Arc::clone(&self.book) }
    }

    pub fn snapshot(&self) -> ProgressBook {
        self.with_book(|book| book.clone())
    }

    fn with_book<T>(&self, f: impl FnOnce(&mut ProgressBook) -> T) -> T {
        let mut guard = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl ProgressSync for MemoryProgress {
    fn load_progress(&mut self) -> Result<Progress, ProgressError> {
        Ok(self.with_book(|book| book.progress_of(&self.player)))
    }

    fn save_progress(&mut self, next_level: u32, total_coins: u64) -> Result<(), ProgressError> {
        self.with_book(|book| book.record_win(&self.player, next_level, total_coins));
        Ok(())
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressError> {
        Ok(self.with_book(|book| book.leaderboard(limit)))
    }
}

#[derive(Clone, Debug)]
pub struct FileProgress {
    player: String,
    path: PathBuf,
}

impl FileProgress {
    pub fn open(path: &Path, player: &str) -> Self {
        Self { player: player.to_string(), path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the book; a missing file is an empty book.
    pub fn read_book(&self) -> Result<ProgressBook, ProgressError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(ProgressBook { format_version: 1, ..ProgressBook::default() });
            }
            Err(e) => return Err(ProgressError::Io(e)),
        };
        serde_json::from_str(&content).map_err(|e| ProgressError::Corrupt(e.to_string()))
    }

    fn write_book(&self, book: &ProgressBook) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ProgressError::Io)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| ProgressError::Corrupt(e.to_string()))?;
        fs::write(&tmp_path, json).map_err(ProgressError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(ProgressError::Io)?;
        Ok(())
    }
}

impl ProgressSync for FileProgress {
    fn load_progress(&mut self) -> Result<Progress, ProgressError> {
        Ok(self.read_book()?.progress_of(&self.player))
    }

    fn save_progress(&mut self, next_level: u32, total_coins: u64) -> Result<(), ProgressError> {
        let mut book = self.read_book()?;
        book.format_version = 1;
        book.record_win(&self.player, next_level, total_coins);
        self.write_book(&book)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressError> {
        Ok(self.read_book()?.leaderboard(limit))
    }
}

/// Opens the backend named by the rules for `player`.
pub fn open_store(config: &ProgressStoreConfig, player: &str) -> Box<dyn ProgressSync> {
    match config {
        ProgressStoreConfig::Memory => Box::new(MemoryProgress::new(player)),
        ProgressStoreConfig::File { path } => Box::new(FileProgress::open(path, player)),
    }
}
