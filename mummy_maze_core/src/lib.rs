use serde::{Deserialize, Serialize};

pub mod board;
pub mod enemy;
pub mod heuristic;
pub mod map;
pub mod maze;
pub mod search;
pub mod tile;

pub use board::{BoardError, load_board_from_string, render_board};
pub use enemy::EnemyKind;
pub use heuristic::Heuristic;
pub use map::{Grid, GridError};
pub use maze::{MazeChanged, MazeState, Outcome};
pub use search::{SearchError, SearchState, SearchStats, Solution, Solver};
pub use tile::{Axis, Tile};

/// A (row, col) coordinate on the doubled board matrix.
///
/// Rows grow downwards and columns grow to the right. Whether a position is a
/// cell, an edge or a post depends only on the parity of its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Cells sit at odd-odd coordinates.
    #[inline]
    pub const fn is_cell(self) -> bool {
        self.row % 2 == 1 && self.col % 2 == 1
    }

    /// Edges separate two cells: exactly one component is odd.
    #[inline]
    pub const fn is_edge(self) -> bool {
        (self.row % 2 == 1) != (self.col % 2 == 1)
    }

    /// Posts are the even-even corners between four edges.
    #[inline]
    pub const fn is_post(self) -> bool {
        self.row % 2 == 0 && self.col % 2 == 0
    }

    /// Returns the position `steps` positions away in `direction`, or `None`
    /// if that would underflow. Upper bounds are checked by the grid.
    pub fn step(self, direction: Action, steps: usize) -> Option<Position> {
        let (d_row, d_col) = direction.delta();
        let row = self.row.checked_add_signed(d_row * steps as isize)?;
        let col = self.col.checked_add_signed(d_col * steps as isize)?;
        Some(Position { row, col })
    }

    /// Manhattan distance in matrix units.
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A hero intent. Enemy moves are never chosen, they are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Unit offset as `(d_row, d_col)`.
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// The axis an edge must be crossable along for this move.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Action::Up | Action::Down => Axis::Vertical,
            Action::Left | Action::Right => Axis::Horizontal,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}
