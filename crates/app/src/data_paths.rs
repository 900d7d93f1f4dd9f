//! Per-user data locations and the rules the desktop app runs with.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use labyrinth_core::{ConfigError, ProgressStoreConfig, Rules};

use crate::APP_NAME;

pub const PROGRESS_FILE: &str = "progress.json";
pub const LAST_SESSION_FILE: &str = "last_session.json";
pub const JOURNALS_DIR: &str = "journals";

pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
}

/// First unused journal path for `seed`: `session_{seed}.jsonl`, then `session_{seed}-1.jsonl`
/// and so on, so relaunching with the same seed keeps earlier journals.
pub fn journal_path(data_dir: &Path, seed: u64) -> PathBuf {
    let dir = data_dir.join(JOURNALS_DIR);
    let named = |attempt: u32| match attempt {
        0 => dir.join(format!("session_{seed}.jsonl")),
        n => dir.join(format!("session_{seed}-{n}.jsonl")),
    };
    (0..u32::MAX).map(named).find(|path| !path.exists()).unwrap_or_else(|| named(0))
}

/// Loads rules from `rules_path` when given, otherwise the defaults. Rules that keep the
/// in-memory store are pointed at the progress file under `data_dir` so wins survive restarts.
pub fn resolve_rules(
    rules_path: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<Rules, ConfigError> {
    let mut rules = match rules_path {
        Some(path) => Rules::load(path)?,
        None => Rules::default(),
    };
    if let (ProgressStoreConfig::Memory, Some(dir)) = (&rules.progress_store, data_dir) {
        rules.progress_store = ProgressStoreConfig::File { path: dir.join(PROGRESS_FILE) };
    }
    Ok(rules)
}
