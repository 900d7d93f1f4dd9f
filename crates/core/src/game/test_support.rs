//! Shared fixtures for the `game` test suites.

use super::*;
use crate::progress::MemoryProgress;
use crate::state::Monster;

pub(super) const TEST_PLAYER: &str = "tester";

/// A 30x30 grid with every cell open.
pub(super) fn open_grid() -> Grid {
    Grid::filled(GRID_SIZE as usize, GRID_SIZE as usize, Cell::Path)
}

pub(super) fn open_catalog() -> MazeCatalog {
    MazeCatalog::from_grids(vec![open_grid()])
}

/// A running level on an open grid with no monsters, so tests place exactly what they need.
pub(super) fn open_session(seed: u64) -> (GameSession, MemoryProgress) {
    open_session_with(seed, Rules::default())
}

pub(super) fn open_session_with(seed: u64, rules: Rules) -> (GameSession, MemoryProgress) {
    let store = MemoryProgress::new(TEST_PLAYER);
    let mut session =
        GameSession::with_catalog(seed, rules, open_catalog(), Box::new(store.clone()));
    session.state.monsters.clear();
    (session, store)
}

/// A session on the shipped mazes opened at `level` with `coins` already banked.
pub(super) fn standard_session(seed: u64, level: u32, coins: u64) -> (GameSession, MemoryProgress) {
    let store = MemoryProgress::seeded(TEST_PLAYER, Progress { coins, highest_level: level });
    let session = GameSession::new(seed, Rules::default(), Box::new(store.clone()));
    (session, store)
}

pub(super) fn place_player(session: &mut GameSession, pos: Pos) {
    session.state.player.pos = pos;
}

pub(super) fn add_monster(session: &mut GameSession, pos: Pos, facing: Direction, kind: MonsterKind) {
    session.state.monsters.push(Monster { pos, facing, kind });
}

pub(super) fn wall_off(session: &mut GameSession, cells: &[Pos]) {
    let grid = session.catalog.grid_mut(session.state.maze);
    for pos in cells {
        grid.set_cell(*pos, Cell::Wall);
    }
}

/// Walks the player along `path`, asserting every step is taken.
pub(super) fn walk(session: &mut GameSession, path: &[Direction]) {
    for direction in path {
        assert_eq!(session.move_player(*direction), MoveOutcome::Moved, "step {direction:?}");
    }
}

pub(super) fn house_pos(session: &GameSession, house: usize) -> Pos {
    session.state.houses[house].pos
}
