use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const GRID_SIZE: i32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn in_grid(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn squared_distance(self, other: Pos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used for tie-breaking and random picks.
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    Wanderer,
    Pursuer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HouseId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeId(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Running,
    Paused,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Won | SessionStatus::Lost)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LossCause {
    MonsterCollision,
    HouseOverstay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The session is not running; nothing happened.
    Ignored,
    /// The target cell is not enterable; nothing happened.
    Blocked,
    Moved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    LevelStarted { level: u32, maze: MazeId, wanderers: usize },
    HouseEntered { house: HouseId },
    HouseLeft { house: HouseId },
    HouseCooledDown { house: HouseId },
    Paused,
    Resumed,
    LevelWon { level: u32, coins_awarded: u64, total_coins: u64 },
    LevelLost { level: u32, cause: LossCause },
    ProgressSaved { next_level: u32, total_coins: u64 },
    ProgressSaveFailed { next_level: u32, message: String },
    ProgressLoadFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Pausing is only possible while the level is running or paused.
    NotPausable(SessionStatus),
    /// Restarting the level is refused once the level has been won or lost.
    RestartUnavailable(SessionStatus),
    /// A new run can only be started after a loss.
    RunStillActive(SessionStatus),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPausable(status) => write!(f, "cannot toggle pause while {status:?}"),
            Self::RestartUnavailable(status) => {
                write!(f, "cannot restart the level while {status:?}")
            }
            Self::RunStillActive(status) => {
                write!(f, "a new run needs a lost level, current status is {status:?}")
            }
        }
    }
}

impl Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_by_unit_offsets() {
        let origin = Pos::new(5, 5);
        assert_eq!(origin.step(Direction::Up), Pos::new(5, 4));
        assert_eq!(origin.step(Direction::Down), Pos::new(5, 6));
        assert_eq!(origin.step(Direction::Left), Pos::new(4, 5));
        assert_eq!(origin.step(Direction::Right), Pos::new(6, 5));
    }

    #[test]
    fn grid_bounds_are_half_open() {
        assert!(Pos::new(0, 0).in_grid());
        assert!(Pos::new(29, 29).in_grid());
        assert!(!Pos::new(30, 0).in_grid());
        assert!(!Pos::new(0, -1).in_grid());
    }
}
