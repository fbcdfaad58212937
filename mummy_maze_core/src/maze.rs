use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::mpsc::{self, Receiver, Sender},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Action, EnemyKind, Grid, GridError, Position, Tile,
    board::{self, BoardError},
};

/// What a committed transition led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Neither captured nor escaped; the game goes on.
    Continued,
    /// An enemy stepped onto the hero.
    Captured,
    /// The hero stands on the exit.
    Escaped,
}

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Continued)
    }
}

/// Published to every subscriber after a non-quiet transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeChanged {
    pub outcome: Outcome,
    pub board: Grid<Tile>,
}

/// One configuration of the maze: the board plus cached entity positions.
///
/// The cached positions always agree with the board. Equality and hashing
/// look at the board alone, so two states reached along different paths
/// compare equal when their boards are identical.
pub struct MazeState {
    pub(crate) board: Grid<Tile>,
    hero: Position,
    exit: Position,
    pub(crate) enemies: [Option<Position>; EnemyKind::COUNT],
    pub(crate) hero_alive: bool,
    subscribers: Vec<Sender<MazeChanged>>,
}

impl MazeState {
    /// Builds a state from a decoded board, validating its placement rules.
    pub fn new(board: Grid<Tile>) -> Result<Self, BoardError> {
        let placement = board::locate(&board)?;
        Ok(MazeState {
            board,
            hero: placement.hero,
            exit: placement.exit,
            enemies: placement.enemies,
            hero_alive: true,
            subscribers: Vec::new(),
        })
    }

    /// Decodes and validates a board in one go.
    pub fn from_text(text: &str) -> Result<Self, BoardError> {
        Self::new(board::load_board_from_string(text)?)
    }

    pub fn board(&self) -> &Grid<Tile> {
        &self.board
    }

    /// Side length of the board matrix.
    pub fn size(&self) -> usize {
        self.board.rows()
    }

    pub fn hero(&self) -> Position {
        self.hero
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<Position> {
        self.enemies[kind.index()]
    }

    pub fn is_hero_alive(&self) -> bool {
        self.hero_alive
    }

    pub fn is_at_goal(&self) -> bool {
        self.hero == self.exit
    }

    pub fn outcome(&self) -> Outcome {
        if !self.hero_alive {
            Outcome::Captured
        } else if self.is_at_goal() {
            Outcome::Escaped
        } else {
            Outcome::Continued
        }
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.board.is_valid(pos)
    }

    /// The tile at `pos`; positions outside the board are an error.
    pub fn tile(&self, pos: Position) -> Result<Tile, GridError> {
        self.board.try_get(pos).copied()
    }

    /// Where a hero move in `action` would land, ignoring legality.
    ///
    /// Inside the maze a move hops over the edge to the next cell. From a
    /// border cell, where no cell lies beyond, only the adjacent frame
    /// position is in reach.
    fn hero_target(&self, action: Action) -> Option<Position> {
        let beyond = self
            .hero
            .step(action, 2)
            .filter(|pos| self.board.is_valid(*pos));
        match beyond {
            Some(pos) => Some(pos),
            None => self
                .hero
                .step(action, 1)
                .filter(|pos| self.board.is_valid(*pos)),
        }
    }

    /// Is moving the hero in `action` legal?
    ///
    /// An interior move needs a crossable edge and an enterable cell behind
    /// it. At the border the only legal move is a half-step onto an exit
    /// embedded in the frame. Nothing moves once the game is over.
    pub fn can_move(&self, action: Action) -> bool {
        if self.outcome().is_terminal() {
            return false;
        }
        let Some(target) = self.hero_target(action) else {
            return false;
        };
        if target.manhattan(self.hero) == 1 {
            return self.board[target] == Tile::Exit;
        }
        let Some(edge) = self.hero.step(action, 1) else {
            return false;
        };
        self.board[edge].crossable(action.axis()) && self.board[target].hero_may_enter()
    }

    pub fn can_move_up(&self) -> bool {
        self.can_move(Action::Up)
    }

    pub fn can_move_down(&self) -> bool {
        self.can_move(Action::Down)
    }

    pub fn can_move_left(&self) -> bool {
        self.can_move(Action::Left)
    }

    pub fn can_move_right(&self) -> bool {
        self.can_move(Action::Right)
    }

    /// The hero moves that are currently legal, in `Action::ALL` order.
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.can_move(*action))
            .collect()
    }

    /// Moves the hero without checking legality.
    ///
    /// The caller must have checked [`MazeState::can_move`] first; the search
    /// hot path checks once and trusts the mutator.
    pub fn move_hero(&mut self, action: Action) {
        debug_assert!(self.can_move(action), "illegal hero move {action}");
        let Some(target) = self.hero_target(action) else {
            return;
        };
        let from = self.hero;
        self.vacate(from);
        self.board[target] = Tile::Hero;
        self.hero = target;
    }

    /// Clears `pos` after an entity leaves it, restoring an exit cell that
    /// the entity was standing on.
    pub(crate) fn vacate(&mut self, pos: Position) {
        self.board[pos] = if pos == self.exit {
            Tile::Exit
        } else {
            Tile::Empty
        };
    }

    /// Applies one hero move and, unless the hero escaped, one enemy turn.
    pub fn execute_action_quietly(&mut self, action: Action) -> Outcome {
        self.move_hero(action);
        if !self.is_at_goal() {
            self.enemy_turn();
        }
        let outcome = self.outcome();
        debug!("hero moved {} to {}: {:?}", action, self.hero, outcome);
        outcome
    }

    /// Like [`MazeState::execute_action_quietly`], then publishes the new
    /// board to every subscriber.
    pub fn execute_action(&mut self, action: Action) -> Outcome {
        let outcome = self.execute_action_quietly(action);
        self.publish(outcome);
        outcome
    }

    /// Registers a new receiver of [`MazeChanged`] notifications. Dropping
    /// the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<MazeChanged> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, outcome: Outcome) {
        if self.subscribers.is_empty() {
            return;
        }
        let event = MazeChanged {
            outcome,
            board: self.board.clone(),
        };
        // Receivers that hung up are dropped.
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Clones share no storage and no subscribers with their source.
impl Clone for MazeState {
    fn clone(&self) -> Self {
        MazeState {
            board: self.board.clone(),
            hero: self.hero,
            exit: self.exit,
            enemies: self.enemies,
            hero_alive: self.hero_alive,
            subscribers: Vec::new(),
        }
    }
}

impl PartialEq for MazeState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
    }
}

impl Eq for MazeState {}

impl Hash for MazeState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
    }
}

impl fmt::Debug for MazeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MazeState")
            .field("hero", &self.hero)
            .field("exit", &self.exit)
            .field("enemies", &self.enemies)
            .field("hero_alive", &self.hero_alive)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MazeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&board::render_board(&self.board))
    }
}
