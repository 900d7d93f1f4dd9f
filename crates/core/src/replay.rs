use std::error::Error;
use std::fmt;

use crate::config::Rules;
use crate::game::GameSession;
use crate::journal::{InputJournal, InputPayload};
use crate::progress::{MemoryProgress, Progress};
use crate::types::{GameError, SessionStatus};

const REPLAY_PLAYER: &str = "replay";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// A record's sequence number or timestamp runs backwards.
    OutOfOrder { seq: u64 },
    /// The session refused a recorded pause, restart or new-run input.
    Rejected { seq: u64 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { seq } => write!(f, "journal record {seq} is out of order"),
            Self::Rejected { seq } => write!(f, "journal record {seq} was rejected by the session"),
        }
    }
}

impl Error for ReplayError {}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub status: SessionStatus,
    pub level: u32,
    pub coins: u64,
    pub snapshot_hash: u64,
    pub final_ms: u64,
}

/// Opens a session matching the journal header, backed by an in-memory progress store.
pub fn session_for_journal(rules: &Rules, journal: &InputJournal) -> GameSession {
    let progress = Progress { coins: journal.starting_coins, highest_level: journal.start_level };
    let store = MemoryProgress::seeded(REPLAY_PLAYER, progress);
    GameSession::new(journal.seed, rules.clone(), Box::new(store))
}

/// Re-applies every recorded input at its recorded time, then runs the clock on to
/// `until_ms` (or stops at the last input when that is later).
pub fn replay_journal(
    rules: &Rules,
    journal: &InputJournal,
    until_ms: u64,
) -> Result<ReplayResult, ReplayError> {
    let mut session = session_for_journal(rules, journal);

    for (expected_seq, record) in (0u64..).zip(&journal.inputs) {
        if record.seq != expected_seq || record.at_ms < session.now_ms() {
            return Err(ReplayError::OutOfOrder { seq: record.seq });
        }
        session.advance_clock(record.at_ms - session.now_ms());
        apply_input(&mut session, record.payload)
            .map_err(|_| ReplayError::Rejected { seq: record.seq })?;
    }

    if until_ms > session.now_ms() {
        session.advance_clock(until_ms - session.now_ms());
    }

    Ok(ReplayResult {
        status: session.status(),
        level: session.state().level,
        coins: session.state().coins,
        snapshot_hash: session.snapshot_hash(),
        final_ms: session.now_ms(),
    })
}

/// Applies one input and returns the form it should be journaled in.
///
/// Moves always apply. The other inputs must be accepted by the session. A `NewRun` that
/// carries no `resume` reads the progress store, and the progress it opened from is written
/// into the returned payload; one that carries `resume` starts from it directly.
pub fn apply_input(
    session: &mut GameSession,
    payload: InputPayload,
) -> Result<InputPayload, GameError> {
    match payload {
        InputPayload::Move { direction } => {
            session.move_player(direction);
        }
        InputPayload::TogglePause => {
            session.toggle_pause()?;
        }
        InputPayload::RestartLevel => session.restart_level()?,
        InputPayload::NewRun { resume: Some(progress) } => session.resume_run(progress)?,
        InputPayload::NewRun { resume: None } => {
            session.new_run()?;
            let state = session.state();
            let opened = Progress { coins: state.coins, highest_level: state.level };
            return Ok(InputPayload::NewRun { resume: Some(opened) });
        }
    }
    Ok(payload)
}
