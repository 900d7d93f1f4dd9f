//! Wanderer and pursuer decisions plus the periodic monster step.

use super::support::*;
use crate::catalog::MazeCatalog;

fn no_houses() -> Vec<House> {
    Vec::new()
}

#[test]
fn pursuer_closes_distance_along_the_open_axis() {
    let grid = open_grid();
    let chosen = pursuer_move(&grid, &no_houses(), Pos::new(5, 5), Pos::new(5, 12));
    assert_eq!(chosen, Some(Direction::Down));
}

#[test]
fn pursuer_ties_follow_enumeration_order() {
    let grid = open_grid();
    let houses = no_houses();
    assert_eq!(pursuer_move(&grid, &houses, Pos::new(5, 5), Pos::new(7, 7)), Some(Direction::Down));
    assert_eq!(pursuer_move(&grid, &houses, Pos::new(5, 5), Pos::new(3, 3)), Some(Direction::Up));
    assert_eq!(pursuer_move(&grid, &houses, Pos::new(5, 5), Pos::new(3, 7)), Some(Direction::Down));
}

#[test]
fn pursuer_choice_is_never_farther_than_any_alternative() {
    let catalog = MazeCatalog::standard();
    let houses = no_houses();
    let target = Pos::new(14, 14);
    for maze in 0..3 {
        let grid = catalog.grid(MazeId(maze));
        for pos in grid.path_cells() {
            let Some(chosen) = pursuer_move(grid, &houses, pos, target) else {
                continue;
            };
            let chosen_distance = pos.step(chosen).squared_distance(target);
            for direction in Direction::ALL {
                let next = pos.step(direction);
                if can_monster_enter(grid, &houses, next) {
                    assert!(chosen_distance <= next.squared_distance(target), "at {pos}");
                }
            }
        }
    }
}

#[test]
fn pursuer_stays_put_when_boxed_in() {
    let mut grid = open_grid();
    for direction in Direction::ALL {
        grid.set_cell(Pos::new(5, 5).step(direction), Cell::Wall);
    }
    assert_eq!(pursuer_move(&grid, &no_houses(), Pos::new(5, 5), Pos::new(0, 0)), None);
}

#[test]
fn wanderer_keeps_its_facing_while_open() {
    let grid = open_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for facing in Direction::ALL {
        let chosen = wanderer_move(&grid, &no_houses(), Pos::new(5, 5), facing, &mut rng);
        assert_eq!(chosen, Some(facing));
    }
}

#[test]
fn blocked_wanderer_turns_to_an_enterable_direction() {
    let mut grid = open_grid();
    grid.set_cell(Pos::new(6, 5), Cell::Wall);
    grid.set_cell(Pos::new(5, 4), Cell::Wall);
    let houses = vec![House { id: HouseId(0), pos: Pos::new(4, 5), cooldown_remaining: 0 }];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..32 {
        let chosen = wanderer_move(&grid, &houses, Pos::new(5, 5), Direction::Right, &mut rng);
        assert_eq!(chosen, Some(Direction::Down));
    }
}

#[test]
fn blocked_wanderer_spreads_over_open_directions() {
    let mut grid = open_grid();
    grid.set_cell(Pos::new(6, 5), Cell::Wall);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut seen = Vec::new();
    for _ in 0..200 {
        let chosen = wanderer_move(&grid, &no_houses(), Pos::new(5, 5), Direction::Right, &mut rng);
        let chosen = chosen.unwrap();
        assert_ne!(chosen, Direction::Right);
        if !seen.contains(&chosen) {
            seen.push(chosen);
        }
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn boxed_in_wanderer_stays_put() {
    let mut grid = open_grid();
    for direction in Direction::ALL {
        grid.set_cell(Pos::new(5, 5).step(direction), Cell::Wall);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert_eq!(wanderer_move(&grid, &no_houses(), Pos::new(5, 5), Direction::Up, &mut rng), None);
}

#[test]
fn monster_step_moves_every_monster_once_per_period() {
    let (mut session, _) = open_session(5);
    add_monster(&mut session, Pos::new(10, 10), Direction::Right, MonsterKind::Wanderer);
    add_monster(&mut session, Pos::new(20, 20), Direction::Up, MonsterKind::Pursuer);

    session.advance_clock(999);
    assert_eq!(session.state().monsters[0].pos, Pos::new(10, 10));
    session.advance_clock(1);
    assert_eq!(session.state().monsters[0].pos, Pos::new(11, 10));
    assert_eq!(session.state().monsters[1].pos, Pos::new(20, 19));
    assert_eq!(session.state().monsters[1].facing, Direction::Up);

    session.advance_clock(2_000);
    assert_eq!(session.state().monsters[0].pos, Pos::new(13, 10));
}

#[test]
fn pursuer_catching_the_player_loses_the_level() {
    let (mut session, _) = open_session(5);
    add_monster(&mut session, Pos::new(3, 1), Direction::Left, MonsterKind::Pursuer);

    session.advance_clock(1_000);
    assert_eq!(session.state().monsters[0].pos, Pos::new(2, 1));
    assert_eq!(session.status(), SessionStatus::Running);
    session.advance_clock(1_000);
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.armed_timer_count(), 0);
}

#[test]
fn pursuer_waits_outside_an_occupied_house() {
    let (mut session, _) = open_session(5);
    walk(&mut session, &RIGHT_8);
    walk(&mut session, &[Direction::Down]);
    add_monster(&mut session, Pos::new(9, 4), Direction::Up, MonsterKind::Pursuer);

    session.advance_clock(5_000);
    assert_eq!(session.status(), SessionStatus::Running);
    let pursuer = session.state().pursuer().unwrap();
    assert_ne!(pursuer.pos, house_pos(&session, 0));
    assert_eq!(pursuer.pos.squared_distance(house_pos(&session, 0)), 1);
}

#[test]
fn monsters_hold_still_while_paused() {
    let (mut session, _) = open_session(5);
    add_monster(&mut session, Pos::new(10, 10), Direction::Right, MonsterKind::Wanderer);
    session.toggle_pause().unwrap();
    session.advance_clock(10_000);
    assert_eq!(session.state().monsters[0].pos, Pos::new(10, 10));
}
