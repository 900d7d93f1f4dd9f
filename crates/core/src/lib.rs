pub mod catalog;
pub mod config;
pub mod game;
pub mod journal;
pub mod journal_file;
pub mod progress;
mod random;
pub mod replay;
pub mod schedule;
pub mod spawns;
pub mod state;
pub mod types;

pub use catalog::{MazeCatalog, select_maze};
pub use config::{ConfigError, ProgressStoreConfig, Rules};
pub use game::GameSession;
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use journal_file::{JournalLoadError, JournalWriter, LoadedJournal, load_journal_from_file};
pub use progress::{
    DEFAULT_LEADERBOARD_LIMIT, FileProgress, LeaderboardEntry, MemoryProgress, Progress,
    ProgressError, ProgressSync, open_store,
};
pub use replay::*;
pub use state::{GameState, Grid};
pub use types::*;
