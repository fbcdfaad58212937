use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Position;

/// Represents errors that can occur within the grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Position ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// A dense 2D matrix addressed by `(row, col)`.
///
/// Stores elements in a flat vector using row-major order. Two grids compare
/// and hash equal iff they have the same shape and element-wise identical
/// contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new grid with the specified dimensions, filled with default values.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = rows.checked_mul(cols).expect("Grid size overflow");
        Grid {
            rows,
            cols,
            cells: vec![T::default(); size],
        }
    }

    /// Creates a new grid whose value at `(row, col)` is produced by `f`.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_generator<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(Position) -> T,
    {
        let size = rows.checked_mul(cols).expect("Grid size overflow");
        let mut cells = Vec::with_capacity(size);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(Position { row, col }));
            }
        }
        Grid { rows, cols, cells }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Converts a position to a flat vector index.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    fn index_of(&self, pos: Position) -> Option<usize> {
        if self.is_valid(pos) {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    #[inline]
    fn position_of(&self, index: usize) -> Position {
        Position {
            row: index / self.cols,
            col: index % self.cols,
        }
    }

    /// Checks if the given position is within the grid boundaries.
    #[inline]
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns `true` if `pos` lies on the outermost ring of the grid.
    #[inline]
    pub fn is_border(&self, pos: Position) -> bool {
        self.is_valid(pos)
            && (pos.row == 0 || pos.col == 0 || pos.row + 1 == self.rows || pos.col + 1 == self.cols)
    }

    /// Gets a reference to the value at `pos`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    /// Like [`Grid::get`], but reports out-of-range access as an error.
    pub fn try_get(&self, pos: Position) -> Result<&T, GridError> {
        self.get(pos).ok_or_else(|| self.out_of_bounds(pos))
    }

    /// Sets the value at `pos`.
    ///
    /// Returns `Err(GridError::OutOfBounds)` if the position is invalid.
    pub fn set(&mut self, pos: Position, value: T) -> Result<(), GridError> {
        let index = self.index_of(pos).ok_or_else(|| self.out_of_bounds(pos))?;
        self.cells[index] = value;
        Ok(())
    }

    fn out_of_bounds(&self, pos: Position) -> GridError {
        GridError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Returns an iterator that yields `(Position, &T)` in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, value)| (self.position_of(index), value))
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: Position) -> &Self::Output {
        match self.index_of(pos) {
            Some(index) => &self.cells[index],
            None => panic!("{}", self.out_of_bounds(pos)),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        match self.index_of(pos) {
            Some(index) => &mut self.cells[index],
            None => panic!("{}", self.out_of_bounds(pos)),
        }
    }
}
