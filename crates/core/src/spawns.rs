//! Monster placement: the spawn index of eligible cells and sampling from it.

use rand_chacha::rand_core::Rng;

use crate::catalog::{is_goal_zone, is_start_zone};
use crate::random::random_index;
use crate::state::Grid;
use crate::types::Pos;

/// Every path cell outside the start corner, the goal corner and the houses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnIndex {
    cells: Vec<Pos>,
}

impl SpawnIndex {
    pub fn build(grid: &Grid, houses: &[Pos]) -> Self {
        let cells = grid
            .path_cells()
            .filter(|pos| !is_start_zone(*pos) && !is_goal_zone(*pos) && !houses.contains(pos))
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Samples `count` distinct cells without replacement.
    /// Asking for more cells than exist returns every cell.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Pos> {
        let mut available = self.cells.clone();
        let take = count.min(available.len());
        for slot in 0..take {
            let pick = slot + random_index(rng, available.len() - slot);
            available.swap(slot, pick);
        }
        available.truncate(take);
        available
    }
}
