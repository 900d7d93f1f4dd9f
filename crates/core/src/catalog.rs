//! The fixed maze catalog. Levels cycle through the three layouts in order.

use crate::state::Grid;
use crate::types::{MazeId, Pos};

const GRID_ROWS: usize = 30;

pub const MAZE_COUNT: u8 = 3;

const MAZE_0: [&str; GRID_ROWS] = [
    "##############################",
    "#.......#.....#..............#",
    "#.#####.#.###.#.############.#",
    "#.....#.#...#..............#.#",
    "#####.#.###.##############.#.#",
    "#.....#..................#.#.#",
    "#.#############.########.#.#.#",
    "#.............#.#......#.#.#.#",
    "#####.#######.#.#.####.#.#.#.#",
    "#...........#...#....#.#.#...#",
    "#.#########.########.#.#.#.#.#",
    "#.........#........#.#.#...#.#",
    "#########.#.######.#.#.##.##.#",
    "#.......#.#......#.#.#.......#",
    "#.#####.#.######.#.#.#######.#",
    "#.....#........#.#.#.......#.#",
    "#####.########.#.#.#######.#.#",
    "#...#........#...#.......#.#.#",
    "#.#.########.###########.#.#.#",
    "#.#........#...........#.#.#.#",
    "#.########.###########.#.#.#.#",
    "#........#...........#.#.....#",
    "########.#.#########.#.#.###.#",
    "#........#...........#.#.#.###",
    "#.######.##########.##.#.#...#",
    "#.................#....#.#.#.#",
    "#.######.####.###.######.#.#.#",
    "#........#........#........#.#",
    "#.###############...########..",
    "##############################",
];

const MAZE_1: [&str; GRID_ROWS] = [
    "##############################",
    "#........#......#............#",
    "#.######.#.####.#.##########.#",
    "#......#...#....#............#",
    "######.#####.########.######.#",
    "#..........................#.#",
    "#.#########.##############.#.#",
    "#....#...................#.#.#",
    "####.#.#################.#.#.#",
    "#....#........#........#...#.#",
    "#.###########.#.######.#####.#",
    "#....................#.......#",
    "#######.######.#####.#########",
    "#..................#.........#",
    "#.##########.#####.#########.#",
    "#.......#..................#.#",
    "#######.#.##########.#####.#.#",
    "#.......#.......#........#.#.#",
    "#.###.#########.#.######.#.#.#",
    "#.............#.#......#...#.#",
    "#############.#.######.#####.#",
    "#.............#......#.......#",
    "#.########.#########.#######.#",
    "#..........................#.#",
    "####.########.########.###.#.#",
    "#.....#....................#.#",
    "#.###.#.###########.#####.##.#",
    "#.....#.................#....#",
    "#.##########################..",
    "##############################",
];

const MAZE_2: [&str; GRID_ROWS] = [
    "##############################",
    "#.........#..................#",
    "#.#######.#.################.#",
    "#.......#.#..................#",
    "#.#.###.#.#######.########.#.#",
    "#.#.#...#................#.#.#",
    "#.#.#.##################.#.###",
    "#.#.#..................#.#.#.#",
    "#.#.##################.#.#.#.#",
    "#.#..................#.#.#.#.#",
    "#.#######.##########.#.#.#...#",
    "#..................#.#.#.#.#.#",
    "##################.#.#.#.#.#.#",
    "#................#.#.#.#...#.#",
    "#.##############.#...#.#####.#",
    "#.#..............#.#.#.......#",
    "#.#.##############.#.#########",
    "#.#................#.........#",
    "#.#.######################.###",
    "#..................#.........#",
    "#####.############.#.#########",
    "#..........#.......#.........#",
    "#.########...###############.#",
    "#..........#...............#.#",
    "#.########################...#",
    "#..........................#.#",
    "#.############.#.###########.#",
    "#..............#.............#",
    "#.##########################..",
    "##############################",
];

const LAYOUTS: [&[&str; GRID_ROWS]; MAZE_COUNT as usize] = [&MAZE_0, &MAZE_1, &MAZE_2];

/// Maze for a level: `(level - 1) mod 3`. Level 0 is treated as level 1.
pub fn select_maze(level: u32) -> MazeId {
    MazeId(((level.max(1) - 1) % u32::from(MAZE_COUNT)) as u8)
}

pub struct MazeCatalog {
    grids: Vec<Grid>,
}

impl MazeCatalog {
    pub fn standard() -> Self {
        Self { grids: LAYOUTS.iter().map(|rows| Grid::from_rows(&rows[..])).collect() }
    }

    /// A catalog built from arbitrary grids, cycled the same way as the standard one.
    pub fn from_grids(grids: Vec<Grid>) -> Self {
        debug_assert!(!grids.is_empty());
        Self { grids }
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn for_level(&self, level: u32) -> MazeId {
        let count = self.grids.len().max(1) as u32;
        MazeId(((level.max(1) - 1) % count) as u8)
    }

    pub fn grid(&self, maze: MazeId) -> &Grid {
        &self.grids[usize::from(maze.0) % self.grids.len()]
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self, maze: MazeId) -> &mut Grid {
        let len = self.grids.len();
        &mut self.grids[usize::from(maze.0) % len]
    }
}

impl Default for MazeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn is_start_zone(pos: Pos) -> bool {
    pos.x <= 2 && pos.y <= 2
}

pub fn is_goal_zone(pos: Pos) -> bool {
    pos.x >= 26 && pos.y >= 26
}
