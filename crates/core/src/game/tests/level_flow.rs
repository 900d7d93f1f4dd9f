//! Level start, win and advance, pause, restart and new runs.

use std::io;

use super::support::*;
use crate::catalog::{is_goal_zone, is_start_zone};

struct UnreachableStore;

impl ProgressSync for UnreachableStore {
    fn load_progress(&mut self) -> Result<Progress, ProgressError> {
        Err(ProgressError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "offline")))
    }

    fn save_progress(&mut self, _next_level: u32, _total_coins: u64) -> Result<(), ProgressError> {
        Err(ProgressError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "offline")))
    }

    fn leaderboard(&self, _limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressError> {
        Ok(Vec::new())
    }
}

fn win_from_next_to_goal(session: &mut GameSession) {
    session.state.monsters.clear();
    place_player(session, Pos::new(27, 28));
    assert_eq!(session.move_player(Direction::Right), MoveOutcome::Moved);
    assert_eq!(session.status(), SessionStatus::Won);
}

#[test]
fn first_level_matches_the_reference_walkthrough() {
    let (mut session, _) = standard_session(1, 1, 0);
    assert_eq!(session.state().maze, MazeId(0));
    assert_eq!(session.state().player.pos, Pos::new(1, 1));

    assert_eq!(session.move_player(Direction::Right), MoveOutcome::Moved);
    assert_eq!(session.state().player.pos, Pos::new(2, 1));
    assert_eq!(session.move_player(Direction::Down), MoveOutcome::Blocked);
    assert_eq!(session.state().player.pos, Pos::new(2, 1));
}

#[test]
fn level_start_spawns_wanderers_and_one_pursuer_at_the_goal() {
    for level in 1..=6 {
        let (session, _) = standard_session(40 + u64::from(level), level, 0);
        let state = session.state();
        let expected = (2 * level as usize).min(session.spawn_index().len());
        assert_eq!(state.wanderer_count(), expected, "level {level}");
        assert_eq!(state.monsters.len(), expected + 1);
        assert_eq!(state.pursuer().map(|m| m.pos), Some(state.goal));

        let mut seen = Vec::new();
        for monster in state.monsters.iter().filter(|m| m.kind == MonsterKind::Wanderer) {
            assert!(session.spawn_index().cells().contains(&monster.pos));
            assert!(!is_start_zone(monster.pos) && !is_goal_zone(monster.pos));
            assert!(state.house_at(monster.pos).is_none());
            assert!(!seen.contains(&monster.pos), "duplicate spawn at {}", monster.pos);
            seen.push(monster.pos);
        }
    }
}

#[test]
fn levels_cycle_through_the_three_mazes() {
    let (session, _) = standard_session(3, 4, 0);
    assert_eq!(session.state().level, 4);
    assert_eq!(session.state().maze, MazeId(0));
    let (session, _) = standard_session(3, 5, 0);
    assert_eq!(session.state().maze, MazeId(1));
}

#[test]
fn winning_awards_coins_saves_and_advances_once() {
    let (mut session, store) = open_session(9);
    win_from_next_to_goal(&mut session);

    assert_eq!(session.state().coins, 10);
    assert_eq!(session.armed_timer_count(), 1);
    assert_eq!(
        store.snapshot().progress_of(TEST_PLAYER),
        Progress { coins: 10, highest_level: 2 }
    );
    assert!(session.log().contains(&LogEvent::ProgressSaved { next_level: 2, total_coins: 10 }));

    assert_eq!(session.move_player(Direction::Left), MoveOutcome::Ignored);
    session.advance_clock(1_999);
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.state().level, 1);

    session.advance_clock(1);
    assert_eq!(session.state().level, 2);
    assert_eq!(session.state().player.pos, Pos::new(1, 1));
    assert_eq!(session.state().coins, 10);

    session.advance_clock(20_000);
    assert_eq!(session.state().level, 2);
    assert_eq!(count_events(&session, |e| matches!(e, LogEvent::LevelWon { .. })), 1);
    assert_eq!(count_events(&session, |e| matches!(e, LogEvent::LevelStarted { .. })), 2);
}

#[test]
fn higher_levels_award_ten_coins_per_level() {
    let store = MemoryProgress::seeded(TEST_PLAYER, Progress { coins: 25, highest_level: 3 });
    let mut session =
        GameSession::with_catalog(2, Rules::default(), open_catalog(), Box::new(store.clone()));
    assert_eq!(session.state().level, 3);
    win_from_next_to_goal(&mut session);
    assert_eq!(session.state().coins, 55);
    assert_eq!(store.snapshot().progress_of(TEST_PLAYER), Progress { coins: 55, highest_level: 4 });
}

#[test]
fn failed_save_keeps_local_progress() {
    let mut session =
        GameSession::with_catalog(4, Rules::default(), open_catalog(), Box::new(UnreachableStore));
    assert_eq!(session.state().level, 1);
    assert!(matches!(session.log().first(), Some(LogEvent::ProgressLoadFailed { .. })));

    win_from_next_to_goal(&mut session);
    assert_eq!(session.state().coins, 10);
    assert!(
        session
            .log()
            .iter()
            .any(|e| matches!(e, LogEvent::ProgressSaveFailed { next_level: 2, .. }))
    );
    session.advance_clock(2_000);
    assert_eq!(session.state().level, 2);
}

#[test]
fn pause_toggles_and_stops_every_timer() {
    let (mut session, _) = open_session(9);
    assert_eq!(session.toggle_pause(), Ok(SessionStatus::Paused));
    assert_eq!(session.armed_timer_count(), 0);
    assert_eq!(session.toggle_pause(), Ok(SessionStatus::Running));
    assert_eq!(session.armed_timer_count(), 1);
}

#[test]
fn pause_is_refused_after_the_level_ends() {
    let (mut session, _) = open_session(9);
    add_monster(&mut session, Pos::new(2, 1), Direction::Up, MonsterKind::Wanderer);
    session.move_player(Direction::Right);
    assert_eq!(session.toggle_pause(), Err(GameError::NotPausable(SessionStatus::Lost)));
}

#[test]
fn restart_rebuilds_the_level_with_one_monster_step() {
    let (mut session, _) = standard_session(12, 2, 0);
    session.advance_clock(500);
    session.toggle_pause().unwrap();

    session.restart_level().unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.state().level, 2);
    assert_eq!(session.state().player.pos, Pos::new(1, 1));
    assert_eq!(session.state().wanderer_count(), 4);
    assert_eq!(session.armed_timer_count(), 1);

    session.restart_level().unwrap();
    assert_eq!(session.armed_timer_count(), 1);
}

#[test]
fn restart_clears_house_cooldowns() {
    let (mut session, _) = open_session(9);
    walk(&mut session, &RIGHT_8);
    walk(&mut session, &[Direction::Down, Direction::Down]);
    assert_eq!(session.state().houses[0].cooldown_remaining, 40);

    session.restart_level().unwrap();
    assert!(session.state().houses.iter().all(House::is_free));
    assert_eq!(session.armed_timer_count(), 1);
}

#[test]
fn restart_is_refused_once_the_level_is_over() {
    let (mut session, _) = open_session(9);
    win_from_next_to_goal(&mut session);
    assert_eq!(session.restart_level(), Err(GameError::RestartUnavailable(SessionStatus::Won)));

    let (mut session, _) = open_session(9);
    add_monster(&mut session, Pos::new(2, 1), Direction::Up, MonsterKind::Wanderer);
    session.move_player(Direction::Right);
    assert_eq!(session.restart_level(), Err(GameError::RestartUnavailable(SessionStatus::Lost)));
}

#[test]
fn new_run_after_a_loss_resumes_from_stored_progress() {
    let (mut session, store) = open_session(9);
    assert_eq!(session.new_run(), Err(GameError::RunStillActive(SessionStatus::Running)));

    win_from_next_to_goal(&mut session);
    session.advance_clock(2_000);
    session.state.monsters.clear();
    add_monster(&mut session, Pos::new(2, 1), Direction::Up, MonsterKind::Wanderer);
    session.move_player(Direction::Right);
    assert_eq!(session.status(), SessionStatus::Lost);

    store.for_player(TEST_PLAYER).save_progress(3, 40).unwrap();
    session.new_run().unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.state().level, 3);
    assert_eq!(session.state().coins, 40);
    assert!(session.state().player.alive);
}

#[test]
fn session_leaderboard_reads_the_store() {
    let (mut session, store) = open_session(9);
    store.for_player("rival").save_progress(5, 80).unwrap();
    win_from_next_to_goal(&mut session);

    let board = session.leaderboard(10).unwrap();
    let names: Vec<&str> = board.iter().map(|entry| entry.player.as_str()).collect();
    assert_eq!(names, vec!["rival", TEST_PLAYER]);
}

#[test]
fn resume_run_starts_from_the_given_progress_without_reading_the_store() {
    let (mut session, store) = open_session(9);
    let carried = Progress { coins: 30, highest_level: 4 };
    assert_eq!(
        session.resume_run(carried),
        Err(GameError::RunStillActive(SessionStatus::Running))
    );

    add_monster(&mut session, Pos::new(2, 1), Direction::Up, MonsterKind::Wanderer);
    session.move_player(Direction::Right);
    assert_eq!(session.status(), SessionStatus::Lost);

    store.for_player(TEST_PLAYER).save_progress(7, 90).unwrap();
    session.resume_run(carried).unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.state().level, 4);
    assert_eq!(session.state().coins, 30);
}

#[test]
fn short_spawn_index_caps_wanderers_and_keeps_one_pursuer() {
    let mut corridor = Grid::filled(GRID_SIZE as usize, GRID_SIZE as usize, Cell::Wall);
    for x in 1..=6 {
        corridor.set_cell(Pos::new(x, 1), Cell::Path);
    }
    let store = MemoryProgress::seeded(TEST_PLAYER, Progress { coins: 0, highest_level: 3 });
    let session = GameSession::with_catalog(
        5,
        Rules::default(),
        MazeCatalog::from_grids(vec![corridor]),
        Box::new(store),
    );

    assert_eq!(session.state().level, 3);
    assert_eq!(session.spawn_index().len(), 4);
    assert_eq!(session.state().wanderer_count(), session.spawn_index().len());
    let pursuers =
        session.state().monsters.iter().filter(|m| m.kind == MonsterKind::Pursuer).count();
    assert_eq!(pursuers, 1);
    assert_eq!(session.state().pursuer().map(|m| m.pos), Some(Rules::default().goal));
}
