use labyrinth_core::{
    Cell, Direction, GameSession, LogEvent, MemoryProgress, MonsterKind, Progress, Rules,
    SessionStatus,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

fn check_invariants(session: &GameSession, seed: u64) -> Result<(), String> {
    let state = session.state();
    let grid = session.grid();

    let on_house = state.house_at(state.player.pos).is_some();
    if !on_house && grid.cell_at(state.player.pos) == Cell::Wall {
        return Err(format!("player inside a wall on seed {seed}"));
    }
    if state.player.in_house.is_some() != on_house {
        return Err(format!("house membership out of sync on seed {seed}"));
    }

    let pursuers = state.monsters.iter().filter(|m| m.kind == MonsterKind::Pursuer).count();
    if pursuers != 1 {
        return Err(format!("expected one pursuer, found {pursuers} on seed {seed}"));
    }
    for monster in &state.monsters {
        if grid.cell_at(monster.pos) == Cell::Wall || state.house_at(monster.pos).is_some() {
            return Err(format!("monster on a forbidden cell on seed {seed}"));
        }
    }

    if state.player.in_house.is_none() && state.house_stay_remaining != 0 {
        return Err(format!("stay countdown without a house on seed {seed}"));
    }
    for house in &state.houses {
        if house.cooldown_remaining > session.rules().house_cooldown_secs {
            return Err(format!("cooldown above its budget on seed {seed}"));
        }
    }

    let armed = session.armed_timer_count();
    match state.status {
        SessionStatus::Paused | SessionStatus::Lost if armed != 0 => {
            return Err(format!("{armed} timers armed while {:?} on seed {seed}", state.status));
        }
        SessionStatus::Won if armed != 1 => {
            return Err(format!("expected only the advance timer after a win on seed {seed}"));
        }
        _ => {}
    }
    Ok(())
}

fn run_fuzz_simulation(seed: u64, input_seed: u64, steps: u32) -> Result<(), String> {
    let store = MemoryProgress::seeded("fuzz", Progress { coins: 0, highest_level: 1 });
    let mut session = GameSession::new(seed, Rules::default(), Box::new(store));
    let mut rng = ChaCha8Rng::seed_from_u64(input_seed);
    let mut coins = session.state().coins;

    for _ in 0..steps {
        session.advance_clock(rng.next_u64() % 700);
        match rng.next_u64() % 24 {
            0 => {
                let _ = session.toggle_pause();
            }
            1 => {
                let _ = session.restart_level();
            }
            2 => {
                let _ = session.new_run();
            }
            roll => {
                let _ = session.move_player(Direction::ALL[(roll % 4) as usize]);
            }
        }

        check_invariants(&session, seed)?;
        if session.status() != SessionStatus::Lost && session.state().coins < coins {
            return Err(format!("coins went down without a new run on seed {seed}"));
        }
        coins = session.state().coins;
    }

    let wins = session.log().iter().filter(|e| matches!(e, LogEvent::LevelWon { .. })).count();
    let saves = session
        .log()
        .iter()
        .filter(|e| matches!(e, LogEvent::ProgressSaved { .. } | LogEvent::ProgressSaveFailed { .. }))
        .count();
    if wins != saves {
        return Err(format!("{wins} wins but {saves} save attempts on seed {seed}"));
    }
    Ok(())
}

#[test]
fn test_fuzz_session_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let seeds = (any::<u64>(), any::<u64>());

    runner
        .run(&seeds, |(seed, input_seed)| {
            run_fuzz_simulation(seed, input_seed, 600).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("semantic fuzz simulation should preserve invariants");
}
