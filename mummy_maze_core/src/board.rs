//! Text encoding of maze boards.
//!
//! A board is a square grid of characters, one per matrix position. Cells
//! (odd row, odd column) hold `.`, `H`, `M`, `V`, `E` or `S`; edges and the
//! outer frame hold ` `, `|`, `-`, `"`, `=` or `S`; posts hold ` ` or `+`.

use crate::{EnemyKind, Grid, Position, Tile};

/// Errors raised while decoding or validating a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Board text is empty")]
    Empty,
    #[error("Board must be square: row {row} has {width} columns but there are {rows} rows")]
    NotSquare { row: usize, width: usize, rows: usize },
    #[error("Board side must be odd and at least 3, found {0}")]
    BadSize(usize),
    #[error("Unknown board symbol '{symbol}' at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error("Board has no hero")]
    MissingHero,
    #[error("Board has no exit")]
    MissingExit,
    #[error("Board has more than one {tile:?}: at {first} and at {second}")]
    Duplicate {
        tile: Tile,
        first: Position,
        second: Position,
    },
    #[error("{tile:?} cannot be placed at {position}")]
    Misplaced { tile: Tile, position: Position },
}

/// Where the entities of a validated board stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    pub hero: Position,
    pub exit: Position,
    pub enemies: [Option<Position>; EnemyKind::COUNT],
}

fn tile_from_symbol(symbol: char) -> Option<Tile> {
    let tile = match symbol {
        ' ' | '.' => Tile::Empty,
        '|' | '-' | '+' => Tile::Wall,
        '"' | '=' => Tile::Door,
        'H' => Tile::Hero,
        'M' => Tile::WhiteMummy,
        'V' => Tile::RedMummy,
        'E' => Tile::Scorpion,
        'S' => Tile::Exit,
        _ => return None,
    };
    Some(tile)
}

fn symbol_for(tile: Tile, pos: Position) -> char {
    match tile {
        Tile::Empty if pos.is_cell() => '.',
        Tile::Empty => ' ',
        Tile::Wall if pos.is_post() => '+',
        // An edge on an even row separates vertically adjacent cells.
        Tile::Wall if pos.row % 2 == 0 => '-',
        Tile::Wall => '|',
        Tile::Door if pos.row % 2 == 0 => '=',
        Tile::Door => '"',
        Tile::Hero => 'H',
        Tile::WhiteMummy => 'M',
        Tile::RedMummy => 'V',
        Tile::Scorpion => 'E',
        Tile::Exit => 'S',
    }
}

/// Decodes a board from its text form.
///
/// The number of lines fixes the side length; shorter lines are padded with
/// blanks. Only the characters are checked here, placement rules are checked
/// when a [`crate::MazeState`] is built from the grid.
pub fn load_board_from_string(text: &str) -> Result<Grid<Tile>, BoardError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.is_empty() || lines.iter().all(|line| line.trim().is_empty()) {
        return Err(BoardError::Empty);
    }

    let size = lines.len();
    if size < 3 || size % 2 == 0 {
        return Err(BoardError::BadSize(size));
    }

    let mut rows: Vec<Vec<Tile>> = Vec::with_capacity(size);
    for (row, line) in lines.iter().enumerate() {
        let width = line.chars().count();
        if width > size {
            return Err(BoardError::NotSquare {
                row,
                width,
                rows: size,
            });
        }
        let mut tiles = Vec::with_capacity(size);
        for (col, symbol) in line.chars().enumerate() {
            let tile =
                tile_from_symbol(symbol).ok_or(BoardError::UnknownSymbol { symbol, row, col })?;
            tiles.push(tile);
        }
        tiles.resize(size, Tile::Empty);
        rows.push(tiles);
    }

    Ok(Grid::from_generator(size, size, |pos| rows[pos.row][pos.col]))
}

/// Encodes a board into the text form read by [`load_board_from_string`].
pub fn render_board(board: &Grid<Tile>) -> String {
    let mut text = String::with_capacity(board.rows() * (board.cols() + 1));
    for (pos, tile) in board.enumerate() {
        text.push(symbol_for(*tile, pos));
        if pos.col + 1 == board.cols() {
            text.push('\n');
        }
    }
    text
}

/// Checks the placement rules of a board and locates its entities.
pub(crate) fn locate(board: &Grid<Tile>) -> Result<Placement, BoardError> {
    if !board.is_square() {
        return Err(BoardError::NotSquare {
            row: 0,
            width: board.cols(),
            rows: board.rows(),
        });
    }
    let size = board.rows();
    if size < 3 || size % 2 == 0 {
        return Err(BoardError::BadSize(size));
    }

    let mut hero = None;
    let mut exit = None;
    let mut enemies = [None; EnemyKind::COUNT];

    for (pos, &tile) in board.enumerate() {
        let placed = match tile {
            Tile::Empty => true,
            Tile::Wall => !pos.is_cell(),
            Tile::Door => pos.is_edge(),
            Tile::Exit => pos.is_cell() || (pos.is_edge() && board.is_border(pos)),
            _ => pos.is_cell(),
        };
        if !placed {
            return Err(BoardError::Misplaced { tile, position: pos });
        }

        let slot = match tile {
            Tile::Hero => &mut hero,
            Tile::Exit => &mut exit,
            _ => match EnemyKind::from_tile(tile) {
                Some(kind) => &mut enemies[kind.index()],
                None => continue,
            },
        };
        if let Some(first) = *slot {
            return Err(BoardError::Duplicate {
                tile,
                first,
                second: pos,
            });
        }
        *slot = Some(pos);
    }

    Ok(Placement {
        hero: hero.ok_or(BoardError::MissingHero)?,
        exit: exit.ok_or(BoardError::MissingExit)?,
        enemies,
    })
}
