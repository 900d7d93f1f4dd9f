//! The level session: one owner for every piece of mutable game state.
//!
//! All mutation goes through `GameSession` methods, either in response to a
//! discrete input (`move_player`, `toggle_pause`, `restart_level`, `new_run`)
//! or from a timer firing inside `advance_clock`. Each call runs to completion
//! before the next one starts.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing::warn;

use crate::catalog::MazeCatalog;
use crate::config::Rules;
use crate::progress::{LeaderboardEntry, Progress, ProgressError, ProgressSync};
use crate::schedule::{Scheduler, TimerKey, TimerKind};
use crate::spawns::SpawnIndex;
use crate::state::{GameState, Grid, House, Player};
use crate::types::*;

mod hash;
mod houses;
mod level;
mod monsters;
mod movement;

pub use monsters::{pursuer_move, wanderer_move};
pub use movement::{can_monster_enter, can_player_enter};

#[cfg(test)]
mod test_support;

/// Timer handles owned by the session. Every handle is cancelled before it is replaced.
#[derive(Default)]
struct SessionTimers {
    monster_step: Option<TimerKey>,
    house_stay: Option<TimerKey>,
    house_cooldowns: Vec<Option<TimerKey>>,
    level_advance: Option<TimerKey>,
}

pub struct GameSession {
    seed: u64,
    rules: Rules,
    catalog: MazeCatalog,
    rng: ChaCha8Rng,
    state: GameState,
    spawn_index: SpawnIndex,
    scheduler: Scheduler,
    timers: SessionTimers,
    progress: Box<dyn ProgressSync>,
    log: Vec<LogEvent>,
}

impl GameSession {
    pub fn new(seed: u64, rules: Rules, progress: Box<dyn ProgressSync>) -> Self {
        Self::with_catalog(seed, rules, MazeCatalog::standard(), progress)
    }

    /// Opens a session on the level suggested by the progress store and starts it.
    pub fn with_catalog(
        seed: u64,
        rules: Rules,
        catalog: MazeCatalog,
        mut progress: Box<dyn ProgressSync>,
    ) -> Self {
        let mut log = Vec::new();
        let loaded = load_or_default(progress.as_mut(), &mut log);
        let houses = build_houses(&rules);
        let state = GameState {
            level: loaded.suggested_level(),
            maze: catalog.for_level(loaded.suggested_level()),
            status: SessionStatus::Running,
            player: Player { pos: rules.player_start, in_house: None, alive: true },
            monsters: Vec::new(),
            houses,
            goal: rules.goal,
            coins: loaded.coins,
            house_stay_remaining: 0,
        };

        let mut session = Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: SessionTimers {
                house_cooldowns: vec![None; rules.houses.len()],
                ..SessionTimers::default()
            },
            rules,
            catalog,
            state,
            spawn_index: SpawnIndex::default(),
            scheduler: Scheduler::new(),
            progress,
            log,
        };
        session.start_level();
        session
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    /// The active maze.
    pub fn grid(&self) -> &Grid {
        self.catalog.grid(self.state.maze)
    }

    pub fn spawn_index(&self) -> &SpawnIndex {
        &self.spawn_index
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Number of timers currently armed (monster step, stay, cooldowns, level advance).
    pub fn armed_timer_count(&self) -> usize {
        self.scheduler.armed_count()
    }

    /// Moves the session clock forward, firing every timer that falls due on the way.
    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        let until_ms = self.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some((_, kind)) = self.scheduler.pop_due(until_ms) {
            match kind {
                TimerKind::MonsterStep => self.step_monsters(),
                TimerKind::HouseStay => self.tick_house_stay(),
                TimerKind::HouseCooldown(house) => self.tick_house_cooldown(house),
                TimerKind::LevelAdvance => self.advance_level(),
            }
        }
        self.scheduler.settle(until_ms);
    }

    fn cancel_cooldown_timer(&mut self, house: HouseId) {
        if let Some(slot) = self.timers.house_cooldowns.get_mut(house.0) {
            cancel_slot(&mut self.scheduler, slot);
        }
    }

    /// Cancels the monster step, the stay countdown and every cooldown countdown.
    fn halt_level_timers(&mut self) {
        cancel_slot(&mut self.scheduler, &mut self.timers.monster_step);
        cancel_slot(&mut self.scheduler, &mut self.timers.house_stay);
        for slot in &mut self.timers.house_cooldowns {
            cancel_slot(&mut self.scheduler, slot);
        }
    }

    fn reload_progress(&mut self) -> Progress {
        load_or_default(self.progress.as_mut(), &mut self.log)
    }
}

fn cancel_slot(scheduler: &mut Scheduler, slot: &mut Option<TimerKey>) {
    if let Some(key) = slot.take() {
        scheduler.cancel(key);
    }
}

fn build_houses(rules: &Rules) -> Vec<House> {
    rules
        .houses
        .iter()
        .enumerate()
        .map(|(index, pos)| House { id: HouseId(index), pos: *pos, cooldown_remaining: 0 })
        .collect()
}

fn load_or_default(progress: &mut dyn ProgressSync, log: &mut Vec<LogEvent>) -> Progress {
    match progress.load_progress() {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, "progress load failed, starting from defaults");
            log.push(LogEvent::ProgressLoadFailed { message: e.to_string() });
            Progress::default()
        }
    }
}
