use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self { width, height, cells: vec![cell; width * height] }
    }

    /// Builds a grid from text rows where `#` is a wall and any other byte is a path.
    /// Short rows are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut grid = Self::filled(width, height, Cell::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, byte) in row.bytes().enumerate() {
                if byte != b'#' {
                    grid.cells[y * width + x] = Cell::Path;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        if !self.in_bounds(pos) {
            return Cell::Wall;
        }
        self.cells[self.index(pos)]
    }

    pub fn is_path(&self, pos: Pos) -> bool {
        self.cell_at(pos) == Cell::Path
    }

    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Path cells in row-major order.
    pub fn path_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().enumerate().filter(|(_, cell)| **cell == Cell::Path).map(|(idx, _)| {
            Pos { y: (idx / self.width) as i32, x: (idx % self.width) as i32 }
        })
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub in_house: Option<HouseId>,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Monster {
    pub pos: Pos,
    pub facing: Direction,
    pub kind: MonsterKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct House {
    pub id: HouseId,
    pub pos: Pos,
    pub cooldown_remaining: u32,
}

impl House {
    pub fn is_free(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// Read-only view of one level session, handed to renderers after every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub level: u32,
    pub maze: MazeId,
    pub status: SessionStatus,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub houses: Vec<House>,
    pub goal: Pos,
    pub coins: u64,
    pub house_stay_remaining: u32,
}

impl GameState {
    pub fn current_house(&self) -> Option<HouseId> {
        self.player.in_house
    }

    pub fn house_at(&self, pos: Pos) -> Option<&House> {
        self.houses.iter().find(|house| house.pos == pos)
    }

    pub fn pursuer(&self) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.kind == MonsterKind::Pursuer)
    }

    pub fn wanderer_count(&self) -> usize {
        self.monsters.iter().filter(|monster| monster.kind == MonsterKind::Wanderer).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_maps_hash_to_wall() {
        let grid = Grid::from_rows(&["#.#", "...", "##"]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell_at(Pos::new(0, 0)), Cell::Wall);
        assert_eq!(grid.cell_at(Pos::new(1, 0)), Cell::Path);
        assert_eq!(grid.cell_at(Pos::new(2, 2)), Cell::Wall, "short rows are padded with walls");
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::filled(4, 4, Cell::Path);
        assert_eq!(grid.cell_at(Pos::new(-1, 0)), Cell::Wall);
        assert_eq!(grid.cell_at(Pos::new(0, 4)), Cell::Wall);
        assert!(!grid.in_bounds(Pos::new(4, 0)));
    }

    #[test]
    fn path_cells_are_row_major() {
        let grid = Grid::from_rows(&["#.", ".#"]);
        let cells: Vec<Pos> = grid.path_cells().collect();
        assert_eq!(cells, vec![Pos::new(1, 0), Pos::new(0, 1)]);
    }
}
