//! The level state machine: start, pause, restart, win, loss and the delayed advance.

use tracing::info;

use super::*;
use crate::random::random_direction;
use crate::state::Monster;

impl GameSession {
    /// Rebuilds the level from scratch. Any timer left from the previous level is cancelled first,
    /// so at most one monster step is ever armed.
    pub(super) fn start_level(&mut self) {
        self.halt_level_timers();
        cancel_slot(&mut self.scheduler, &mut self.timers.level_advance);

        let level = self.state.level.max(1);
        let maze = self.catalog.for_level(level);
        self.spawn_index = SpawnIndex::build(self.catalog.grid(maze), &self.rules.houses);

        self.state.level = level;
        self.state.maze = maze;
        self.state.status = SessionStatus::Running;
        self.state.player = Player { pos: self.rules.player_start, in_house: None, alive: true };
        self.state.houses = build_houses(&self.rules);
        self.state.goal = self.rules.goal;
        self.state.house_stay_remaining = 0;

        let cells = self.spawn_index.draw(&mut self.rng, self.rules.wanderers_for_level(level));
        let mut monsters = Vec::with_capacity(cells.len() + 1);
        for pos in cells {
            let facing = random_direction(&mut self.rng);
            monsters.push(Monster { pos, facing, kind: MonsterKind::Wanderer });
        }
        monsters.push(Monster {
            pos: self.rules.goal,
            facing: Direction::Up,
            kind: MonsterKind::Pursuer,
        });
        let wanderers = monsters.len() - 1;
        self.state.monsters = monsters;

        self.timers.monster_step =
            Some(self.scheduler.arm_periodic(TimerKind::MonsterStep, self.rules.monster_step_ms));
        info!(level, maze = maze.0, wanderers, "level started");
        self.log.push(LogEvent::LevelStarted { level, maze, wanderers });
    }

    /// Pauses a running level or resumes a paused one, returning the new status.
    /// Remaining stay and cooldown seconds are kept as they are.
    pub fn toggle_pause(&mut self) -> Result<SessionStatus, GameError> {
        match self.state.status {
            SessionStatus::Running => {
                self.halt_level_timers();
                self.state.status = SessionStatus::Paused;
                self.log.push(LogEvent::Paused);
            }
            SessionStatus::Paused => {
                self.state.status = SessionStatus::Running;
                self.timers.monster_step = Some(
                    self.scheduler.arm_periodic(TimerKind::MonsterStep, self.rules.monster_step_ms),
                );
                self.rearm_house_timers();
                self.log.push(LogEvent::Resumed);
            }
            status => return Err(GameError::NotPausable(status)),
        }
        Ok(self.state.status)
    }

    /// Starts the current level again. Refused once the level is won or lost.
    pub fn restart_level(&mut self) -> Result<(), GameError> {
        if self.state.status.is_finished() {
            return Err(GameError::RestartUnavailable(self.state.status));
        }
        self.start_level();
        Ok(())
    }

    /// Begins a fresh run after a loss from whatever the progress store holds.
    pub fn new_run(&mut self) -> Result<(), GameError> {
        if self.state.status != SessionStatus::Lost {
            return Err(GameError::RunStillActive(self.state.status));
        }
        let loaded = self.reload_progress();
        self.begin_run(loaded);
        Ok(())
    }

    /// Begins a fresh run after a loss from `progress` without reading the store.
    pub fn resume_run(&mut self, progress: Progress) -> Result<(), GameError> {
        if self.state.status != SessionStatus::Lost {
            return Err(GameError::RunStillActive(self.state.status));
        }
        self.begin_run(progress);
        Ok(())
    }

    fn begin_run(&mut self, progress: Progress) {
        self.state.level = progress.suggested_level();
        self.state.coins = progress.coins;
        self.start_level();
    }

    pub(super) fn win_level(&mut self) {
        self.halt_level_timers();
        self.state.status = SessionStatus::Won;

        let level = self.state.level;
        let coins_awarded = self.rules.coins_for_level(level);
        self.state.coins = self.state.coins.saturating_add(coins_awarded);
        let total_coins = self.state.coins;
        info!(level, coins_awarded, total_coins, "level won");
        self.log.push(LogEvent::LevelWon { level, coins_awarded, total_coins });

        let next_level = level.saturating_add(1);
        match self.progress.save_progress(next_level, total_coins) {
            Ok(()) => self.log.push(LogEvent::ProgressSaved { next_level, total_coins }),
            Err(e) => {
                warn!(error = %e, next_level, "progress save failed");
                self.log.push(LogEvent::ProgressSaveFailed { next_level, message: e.to_string() });
            }
        }

        cancel_slot(&mut self.scheduler, &mut self.timers.level_advance);
        self.timers.level_advance = Some(
            self.scheduler.arm_once(TimerKind::LevelAdvance, self.rules.level_advance_delay_ms),
        );
    }

    pub(super) fn lose_level(&mut self, cause: LossCause) {
        self.halt_level_timers();
        self.state.status = SessionStatus::Lost;
        self.state.player.alive = false;
        let level = self.state.level;
        info!(level, ?cause, "level lost");
        self.log.push(LogEvent::LevelLost { level, cause });
    }

    pub(super) fn advance_level(&mut self) {
        self.timers.level_advance = None;
        if self.state.status != SessionStatus::Won {
            return;
        }
        self.state.level = self.state.level.saturating_add(1);
        self.start_level();
    }

    /// Top players as the progress store currently ranks them.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressError> {
        self.progress.leaderboard(limit)
    }
}
