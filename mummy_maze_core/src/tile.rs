use serde::{Deserialize, Serialize};

/// The content of one board position.
///
/// Cells hold `Empty`, `Hero`, one of the enemies or `Exit`; edges and the
/// frame hold `Empty`, `Wall`, `Door` or (frame only) `Exit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Door,
    Hero,
    WhiteMummy,
    RedMummy,
    Scorpion,
    Exit,
}

/// Direction of travel across an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Up or down, crossing a horizontal edge.
    Vertical,
    /// Left or right, crossing a vertical edge.
    Horizontal,
}

impl Tile {
    /// Can any mover cross this edge travelling along `axis`?
    ///
    /// Only walls block; doors are passable for heroes and enemies alike.
    #[inline]
    pub const fn crossable(self, axis: Axis) -> bool {
        match axis {
            Axis::Vertical => self.crossable_vertically(),
            Axis::Horizontal => self.crossable_horizontally(),
        }
    }

    #[inline]
    pub const fn crossable_vertically(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    #[inline]
    pub const fn crossable_horizontally(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    #[inline]
    pub const fn hero_may_enter(self) -> bool {
        matches!(self, Tile::Empty | Tile::Exit)
    }

    /// Stepping onto the hero is how an enemy captures it.
    #[inline]
    pub const fn enemy_may_enter(self) -> bool {
        matches!(self, Tile::Empty | Tile::Exit | Tile::Hero)
    }

    /// Is this tile, found on the exit position, out of place? Anything but
    /// the hero is, including an enemy standing on an inner exit cell.
    #[inline]
    pub const fn counts_out_of_place(self) -> bool {
        !matches!(self, Tile::Hero)
    }

    #[inline]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Tile::WhiteMummy | Tile::RedMummy | Tile::Scorpion)
    }
}
