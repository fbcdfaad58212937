use std::cmp::Ordering;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{Action, Axis, Position, Tile, maze::MazeState};

/// Mummies get this many pursuit rounds per hero turn, the scorpion one.
const MUMMY_ROUNDS: usize = 2;

/// Retries on the tie-break axes after the primary attempt fails.
const TIE_BREAK_TRIES: usize = 2;

/// The three reactive enemies. At most one of each kind is on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    WhiteMummy,
    RedMummy,
    Scorpion,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [
        EnemyKind::WhiteMummy,
        EnemyKind::RedMummy,
        EnemyKind::Scorpion,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            EnemyKind::WhiteMummy => 0,
            EnemyKind::RedMummy => 1,
            EnemyKind::Scorpion => 2,
        }
    }

    pub const fn tile(self) -> Tile {
        match self {
            EnemyKind::WhiteMummy => Tile::WhiteMummy,
            EnemyKind::RedMummy => Tile::RedMummy,
            EnemyKind::Scorpion => Tile::Scorpion,
        }
    }

    pub const fn from_tile(tile: Tile) -> Option<EnemyKind> {
        match tile {
            Tile::WhiteMummy => Some(EnemyKind::WhiteMummy),
            Tile::RedMummy => Some(EnemyKind::RedMummy),
            Tile::Scorpion => Some(EnemyKind::Scorpion),
            _ => None,
        }
    }

    /// The axis tried first when the enemy shares neither row nor column
    /// with the hero. White mummies and scorpions close the column gap first,
    /// red mummies the row gap.
    pub const fn tie_break(self) -> Axis {
        match self {
            EnemyKind::WhiteMummy | EnemyKind::Scorpion => Axis::Horizontal,
            EnemyKind::RedMummy => Axis::Vertical,
        }
    }
}

impl MazeState {
    /// Runs one full enemy phase: the scorpion once, then the mummies in
    /// alternation for up to two rounds. Stops at the first capture.
    pub(crate) fn enemy_turn(&mut self) {
        if self.enemy(EnemyKind::Scorpion).is_some() {
            self.pursue(EnemyKind::Scorpion);
        }

        for _ in 0..MUMMY_ROUNDS {
            for kind in [EnemyKind::WhiteMummy, EnemyKind::RedMummy] {
                if !self.is_hero_alive() {
                    return;
                }
                if self.enemy(kind).is_some() {
                    self.pursue(kind);
                }
            }
        }
    }

    /// Moves one enemy at most one step towards the hero.
    ///
    /// Returns `true` if the enemy moved. A move that lands on the hero marks
    /// the hero as captured.
    pub(crate) fn pursue(&mut self, kind: EnemyKind) -> bool {
        let Some(from) = self.enemy(kind) else {
            return false;
        };
        let hero = self.hero();

        // Aligned on one axis: close the gap along the other.
        let mut moved = if from.col == hero.col {
            self.advance_along(kind, from, Axis::Vertical)
        } else if from.row == hero.row {
            self.advance_along(kind, from, Axis::Horizontal)
        } else {
            false
        };

        let mut axis = kind.tie_break();
        for _ in 0..TIE_BREAK_TRIES {
            if moved {
                break;
            }
            moved = self.advance_along(kind, from, axis);
            axis = match axis {
                Axis::Vertical => Axis::Horizontal,
                Axis::Horizontal => Axis::Vertical,
            };
        }

        if moved && self.enemy(kind) == Some(hero) {
            trace!("{:?} captured the hero at {}", kind, hero);
            self.hero_alive = false;
        }
        moved
    }

    /// Attempts a step along `axis` towards the hero. Does nothing if the
    /// enemy is already level with the hero on that axis.
    fn advance_along(&mut self, kind: EnemyKind, from: Position, axis: Axis) -> bool {
        let hero = self.hero();
        let direction = match axis {
            Axis::Vertical => match from.row.cmp(&hero.row) {
                Ordering::Greater => Action::Up,
                Ordering::Less => Action::Down,
                Ordering::Equal => return false,
            },
            Axis::Horizontal => match from.col.cmp(&hero.col) {
                Ordering::Greater => Action::Left,
                Ordering::Less => Action::Right,
                Ordering::Equal => return false,
            },
        };
        self.step_enemy(kind, from, direction)
    }

    /// Enemies always hop a full cell; there is no half-step exit for them.
    fn enemy_can_step(&self, from: Position, direction: Action) -> Option<Position> {
        let edge = from.step(direction, 1)?;
        let to = from.step(direction, 2)?;
        let crossable = self.board.get(edge)?.crossable(direction.axis());
        let enterable = self.board.get(to)?.enemy_may_enter();
        (crossable && enterable).then_some(to)
    }

    fn step_enemy(&mut self, kind: EnemyKind, from: Position, direction: Action) -> bool {
        let Some(to) = self.enemy_can_step(from, direction) else {
            return false;
        };
        self.vacate(from);
        self.board[to] = kind.tile();
        self.enemies[kind.index()] = Some(to);
        trace!("{:?} moved {} from {} to {}", kind, direction, from, to);
        true
    }
}
