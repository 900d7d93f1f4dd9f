//! Monster AI and the periodic monster step.

use rand_chacha::rand_core::Rng;

use super::*;
use crate::random::random_index;

/// Keeps going in `facing` while possible; when blocked, picks uniformly among the enterable
/// directions. Returns the direction actually taken, or `None` when boxed in.
pub fn wanderer_move<R: Rng + ?Sized>(
    grid: &Grid,
    houses: &[House],
    pos: Pos,
    facing: Direction,
    rng: &mut R,
) -> Option<Direction> {
    if can_monster_enter(grid, houses, pos.step(facing)) {
        return Some(facing);
    }
    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| can_monster_enter(grid, houses, pos.step(*direction)))
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[random_index(rng, open.len())])
}

/// The enterable direction whose resulting cell is closest to `target`. Ties go to the
/// earliest direction in up, down, left, right order.
pub fn pursuer_move(grid: &Grid, houses: &[House], pos: Pos, target: Pos) -> Option<Direction> {
    let mut best: Option<(Direction, i64)> = None;
    for direction in Direction::ALL {
        let next = pos.step(direction);
        if !can_monster_enter(grid, houses, next) {
            continue;
        }
        let distance = next.squared_distance(target);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((direction, distance));
        }
    }
    best.map(|(direction, _)| direction)
}

impl GameSession {
    /// Moves every monster once, in spawn order, each seeing the moves made before it.
    /// Collision is checked once after the whole phase.
    pub(super) fn step_monsters(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }

        let grid = self.catalog.grid(self.state.maze);
        let player_pos = self.state.player.pos;
        for index in 0..self.state.monsters.len() {
            let monster = self.state.monsters[index];
            let chosen = match monster.kind {
                MonsterKind::Wanderer => wanderer_move(
                    grid,
                    &self.state.houses,
                    monster.pos,
                    monster.facing,
                    &mut self.rng,
                ),
                MonsterKind::Pursuer => {
                    pursuer_move(grid, &self.state.houses, monster.pos, player_pos)
                }
            };
            if let Some(direction) = chosen {
                let moved = &mut self.state.monsters[index];
                moved.facing = direction;
                moved.pos = monster.pos.step(direction);
            }
        }

        if self.player_collides() {
            self.lose_level(LossCause::MonsterCollision);
        }
    }
}
