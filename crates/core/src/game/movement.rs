//! Player movement, enterability rules, collision and goal detection.

use super::*;

/// Out-of-grid cells are never enterable. A house is enterable only while it is not cooling down;
/// any other cell must be a path.
pub fn can_player_enter(grid: &Grid, houses: &[House], pos: Pos) -> bool {
    if !grid.in_bounds(pos) {
        return false;
    }
    if let Some(house) = houses.iter().find(|house| house.pos == pos) {
        return house.is_free();
    }
    grid.is_path(pos)
}

/// Monsters never enter a house, whatever its cooldown.
pub fn can_monster_enter(grid: &Grid, houses: &[House], pos: Pos) -> bool {
    if !grid.in_bounds(pos) || houses.iter().any(|house| house.pos == pos) {
        return false;
    }
    grid.is_path(pos)
}

impl GameSession {
    pub fn can_player_enter(&self, pos: Pos) -> bool {
        can_player_enter(self.grid(), &self.state.houses, pos)
    }

    pub fn can_monster_enter(&self, pos: Pos) -> bool {
        can_monster_enter(self.grid(), &self.state.houses, pos)
    }

    /// Moves the player one cell. A blocked move changes nothing at all.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.state.status != SessionStatus::Running {
            return MoveOutcome::Ignored;
        }

        let target = self.state.player.pos.step(direction);
        if !self.can_player_enter(target) {
            return MoveOutcome::Blocked;
        }

        let previous_house = self.state.player.in_house;
        self.state.player.pos = target;
        let entered_house = self.state.house_at(target).map(|house| house.id);
        match (previous_house, entered_house) {
            (None, Some(house)) => self.enter_house(house),
            (Some(house), None) => self.leave_house(house),
            (Some(from), Some(to)) if from != to => {
                self.leave_house(from);
                self.enter_house(to);
            }
            _ => {}
        }

        if self.player_collides() {
            self.lose_level(LossCause::MonsterCollision);
        } else if self.state.player.pos == self.state.goal {
            self.win_level();
        }
        MoveOutcome::Moved
    }

    /// A player inside a house is immune; otherwise any monster on the player's cell collides.
    pub(super) fn player_collides(&self) -> bool {
        if self.state.player.in_house.is_some() {
            return false;
        }
        let player_pos = self.state.player.pos;
        self.state.monsters.iter().any(|monster| monster.pos == player_pos)
    }
}
