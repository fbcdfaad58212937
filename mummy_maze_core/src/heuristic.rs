use serde::{Deserialize, Serialize};

use crate::maze::MazeState;

/// Distance estimates used to order the search frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Hero-to-exit Manhattan distance in moves.
    #[default]
    TileDistance,
    /// Number of tiles still out of place.
    TilesOutOfPlace,
}

impl Heuristic {
    pub fn evaluate(self, state: &MazeState) -> u32 {
        match self {
            Heuristic::TileDistance => state.tile_distance(),
            Heuristic::TilesOutOfPlace => state.tiles_out_of_place(),
        }
    }
}

impl MazeState {
    /// Lower bound on the hero moves left, ignoring walls and enemies.
    ///
    /// A move covers two matrix units, or one for the final half-step onto a
    /// frame exit, so the bound rounds the matrix distance up to whole moves.
    pub fn tile_distance(&self) -> u32 {
        let units = self.hero().manhattan(self.exit());
        units.div_ceil(2) as u32
    }

    /// 1 while the exit position holds anything but the hero, 0 once the
    /// hero stands on it.
    pub fn tiles_out_of_place(&self) -> u32 {
        u32::from(self.board()[self.exit()].counts_out_of_place())
    }
}
