use serde::{Deserialize, Serialize};

use crate::progress::Progress;
use crate::types::Direction;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    /// Level and banked coins the session opened with.
    pub start_level: u32,
    pub starting_coins: u64,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    /// Session clock when the input was applied.
    pub at_ms: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPayload {
    Move { direction: Direction },
    TogglePause,
    RestartLevel,
    /// `resume` is the stored progress the new run opened from. The live session fills it in
    /// when the input is accepted, so replay never consults a progress store.
    NewRun {
        #[serde(default)]
        resume: Option<Progress>,
    },
}

impl InputJournal {
    pub fn new(seed: u64, start_level: u32, starting_coins: u64) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            seed,
            start_level,
            starting_coins,
            inputs: Vec::new(),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.inputs.len() as u64
    }

    pub fn append(&mut self, at_ms: u64, payload: InputPayload) {
        let seq = self.next_seq();
        self.inputs.push(InputRecord { seq, at_ms, payload });
    }

    pub fn append_move(&mut self, at_ms: u64, direction: Direction) {
        self.append(at_ms, InputPayload::Move { direction });
    }
}
