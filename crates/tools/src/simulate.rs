//! Headless random-input sessions that check engine invariants after every step.

use std::path::Path;

use anyhow::{Context, Result, bail};
use labyrinth_core::replay::{apply_input, session_for_journal};
use labyrinth_core::{
    Cell, Direction, GameSession, InputJournal, InputPayload, JournalWriter, LogEvent,
    MonsterKind, Rules, SessionStatus,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;

/// Largest clock advance between two inputs.
const MAX_GAP_MS: u64 = 700;

#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub steps: u32,
    pub status: String,
    pub level: u32,
    pub coins: u64,
    pub wins: usize,
    pub losses: usize,
    pub final_ms: u64,
    pub snapshot_hash: String,
}

fn random_payload(rng: &mut ChaCha8Rng) -> InputPayload {
    match rng.next_u64() % 24 {
        0 => InputPayload::TogglePause,
        1 => InputPayload::RestartLevel,
        2 => InputPayload::NewRun { resume: None },
        roll => InputPayload::Move { direction: Direction::ALL[(roll % 4) as usize] },
    }
}

pub fn check_invariants(session: &GameSession) -> Result<()> {
    let state = session.state();
    let grid = session.grid();

    let on_house = state.house_at(state.player.pos).is_some();
    if !on_house && grid.cell_at(state.player.pos) == Cell::Wall {
        bail!("player stands inside a wall at {}", state.player.pos);
    }
    if state.player.in_house.is_some() != on_house {
        bail!("house membership disagrees with player position {}", state.player.pos);
    }
    if state.monsters.iter().filter(|m| m.kind == MonsterKind::Pursuer).count() != 1 {
        bail!("level must hold exactly one pursuer");
    }
    if let Some(monster) = state
        .monsters
        .iter()
        .find(|m| grid.cell_at(m.pos) == Cell::Wall || state.house_at(m.pos).is_some())
    {
        bail!("monster on a forbidden cell at {}", monster.pos);
    }
    if state.player.in_house.is_none() && state.house_stay_remaining != 0 {
        bail!("stay countdown running outside a house");
    }
    let armed = session.armed_timer_count();
    if matches!(state.status, SessionStatus::Paused | SessionStatus::Lost) && armed != 0 {
        bail!("{armed} timers still armed while {:?}", state.status);
    }
    Ok(())
}

/// Runs `steps` random inputs against a fresh session. Accepted inputs are written to
/// `journal_path` when given, so the run can be replayed afterwards.
pub fn simulate(
    rules: &Rules,
    seed: u64,
    input_seed: u64,
    steps: u32,
    journal_path: Option<&Path>,
) -> Result<SimulationSummary> {
    let header = InputJournal::new(seed, 1, 0);
    let mut session = session_for_journal(rules, &header);
    let mut writer = journal_path
        .map(|path| {
            JournalWriter::create(path, &header)
                .with_context(|| format!("failed to create journal {}", path.display()))
        })
        .transpose()?;
    let mut rng = ChaCha8Rng::seed_from_u64(input_seed);

    for step in 0..steps {
        session.advance_clock(rng.next_u64() % MAX_GAP_MS);
        let payload = random_payload(&mut rng);
        let at_ms = session.now_ms();
        if let Ok(journaled) = apply_input(&mut session, payload)
            && let Some(writer) = writer.as_mut()
        {
            writer.append(at_ms, &journaled).context("failed to append to journal")?;
        }
        check_invariants(&session).with_context(|| format!("invariant broken at step {step}"))?;
    }

    let count = |wanted: fn(&LogEvent) -> bool| session.log().iter().filter(|e| wanted(e)).count();
    Ok(SimulationSummary {
        seed,
        steps,
        status: format!("{:?}", session.status()),
        level: session.state().level,
        coins: session.state().coins,
        wins: count(|e| matches!(e, LogEvent::LevelWon { .. })),
        losses: count(|e| matches!(e, LogEvent::LevelLost { .. })),
        final_ms: session.now_ms(),
        snapshot_hash: format!("0x{:016x}", session.snapshot_hash()),
    })
}
