//! Stable snapshot hashing for deterministic verification.
//! Replays and determinism checks compare this value instead of whole states.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl GameSession {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.scheduler.now_ms());
        hasher.write_u32(self.state.level);
        hasher.write_u8(self.state.maze.0);
        hasher.write_u8(match self.state.status {
            SessionStatus::Running => 0,
            SessionStatus::Paused => 1,
            SessionStatus::Won => 2,
            SessionStatus::Lost => 3,
        });

        let player = &self.state.player;
        write_pos(&mut hasher, player.pos);
        hasher.write_u8(u8::from(player.alive));
        match player.in_house {
            Some(house) => hasher.write_u64(house.0 as u64 + 1),
            None => hasher.write_u64(0),
        }
        hasher.write_u32(self.state.house_stay_remaining);

        hasher.write_usize(self.state.monsters.len());
        for monster in &self.state.monsters {
            write_pos(&mut hasher, monster.pos);
            hasher.write_u8(monster.facing as u8);
            hasher.write_u8(monster.kind as u8);
        }
        for house in &self.state.houses {
            write_pos(&mut hasher, house.pos);
            hasher.write_u32(house.cooldown_remaining);
        }
        hasher.write_u64(self.state.coins);
        hasher.finish()
    }
}

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.x);
    hasher.write_i32(pos.y);
}
