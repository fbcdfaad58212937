//! Randomised checks of the transition rules over sampled boards.

use std::{
    collections::{HashMap, VecDeque},
    hash::{DefaultHasher, Hash, Hasher},
};

use mummy_maze_core::{
    Action, EnemyKind, Grid, MazeState, Position, SearchError, Solver, Tile,
    load_board_from_string,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

const SAMPLES: u64 = 150;

fn random_board(rng: &mut StdRng, max_cells: usize) -> Grid<Tile> {
    let cells = rng.random_range(2..=max_cells);
    let size = 2 * cells + 1;
    let mut board: Grid<Tile> = Grid::new(size, size);

    for row in 1..size - 1 {
        for col in 1..size - 1 {
            let pos = Position::new(row, col);
            if !pos.is_edge() {
                continue;
            }
            if rng.random_bool(0.25) {
                board.set(pos, Tile::Wall).unwrap();
            } else if rng.random_bool(0.15) {
                board.set(pos, Tile::Door).unwrap();
            }
        }
    }

    let mut free: Vec<Position> = board
        .enumerate()
        .map(|(pos, _)| pos)
        .filter(|pos| pos.is_cell())
        .collect();
    free.shuffle(rng);

    // Mostly exits in the frame, sometimes on an inner cell.
    let k = 2 * rng.random_range(0..cells) + 1;
    let exit = match rng.random_range(0..5) {
        0 => Position::new(0, k),
        1 => Position::new(size - 1, k),
        2 => Position::new(k, 0),
        3 => Position::new(k, size - 1),
        _ => free.pop().unwrap(),
    };
    board.set(exit, Tile::Exit).unwrap();

    board.set(free.pop().unwrap(), Tile::Hero).unwrap();
    for kind in EnemyKind::ALL {
        if !rng.random_bool(0.5) {
            continue;
        }
        // Small boards with an inner exit can run out of cells.
        let Some(pos) = free.pop() else {
            break;
        };
        board.set(pos, kind.tile()).unwrap();
    }
    board
}

fn random_maze(seed: u64, max_cells: usize) -> MazeState {
    let mut rng = StdRng::seed_from_u64(seed);
    MazeState::new(random_board(&mut rng, max_cells)).unwrap()
}

fn hash_of(state: &MazeState) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.hash(&mut hasher);
    hasher.finish()
}

/// The hero-only rule, restated straight from the board contents.
fn expected_target(state: &MazeState, action: Action) -> Option<Position> {
    let hero = state.hero();
    let board = state.board();
    let near = hero.step(action, 1).filter(|p| board.is_valid(*p))?;
    match hero.step(action, 2).filter(|p| board.is_valid(*p)) {
        Some(far) => {
            let open = board[near] != Tile::Wall;
            let free = matches!(board[far], Tile::Empty | Tile::Exit);
            (open && free).then_some(far)
        }
        None => (board[near] == Tile::Exit).then_some(near),
    }
}

fn assert_cache_matches_board(state: &MazeState) {
    for kind in EnemyKind::ALL {
        let on_board: Vec<Position> = state
            .board()
            .enumerate()
            .filter(|(_, tile)| **tile == kind.tile())
            .map(|(pos, _)| pos)
            .collect();
        match state.enemy(kind) {
            Some(pos) => {
                assert!(pos.is_cell());
                assert_eq!(on_board, vec![pos], "{kind:?}");
            }
            None => assert!(on_board.is_empty(), "{kind:?}"),
        }
    }
    if state.is_hero_alive() {
        assert_eq!(state.board()[state.hero()], Tile::Hero);
    }
}

/// Could an enemy get from `from` to `to` in one hop without crossing a wall?
fn hop_ok(board: &Grid<Tile>, from: Position, to: Position) -> bool {
    let aligned = from.row == to.row || from.col == to.col;
    if !aligned || from.manhattan(to) != 2 {
        return false;
    }
    let edge = Position::new((from.row + to.row) / 2, (from.col + to.col) / 2);
    board[edge] != Tile::Wall
}

fn reachable_in_hops(board: &Grid<Tile>, from: Position, to: Position, hops: usize) -> bool {
    if from == to {
        return true;
    }
    if hops == 0 {
        return false;
    }
    Action::ALL.into_iter().any(|action| {
        from.step(action, 2)
            .filter(|mid| board.is_valid(*mid) && hop_ok(board, from, *mid))
            .is_some_and(|mid| reachable_in_hops(board, mid, to, hops - 1))
    })
}

/// Shortest hero-only path to the exit with every enemy removed.
fn hero_only_distance(state: &MazeState) -> Option<u32> {
    let board = Grid::from_generator(state.size(), state.size(), |pos| {
        match state.board()[pos] {
            tile if tile.is_enemy() => Tile::Empty,
            tile => tile,
        }
    });
    let start = MazeState::new(board).unwrap();

    let mut seen = HashMap::from([(start.hero(), 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let distance = seen[&current.hero()];
        if current.is_at_goal() {
            return Some(distance);
        }
        for action in current.legal_actions() {
            let mut next = current.clone();
            next.move_hero(action);
            if !seen.contains_key(&next.hero()) {
                seen.insert(next.hero(), distance + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

#[test]
fn transitions_on_a_clone_leave_the_source_untouched() {
    for seed in 0..SAMPLES {
        let state = random_maze(seed, 6);
        let board = state.board().clone();
        let hash = hash_of(&state);

        for action in state.legal_actions() {
            let mut next = state.clone();
            next.execute_action_quietly(action);

            assert_eq!(state.board(), &board, "seed {seed}");
            assert!(state.is_hero_alive());
            assert_eq!(hash_of(&state), hash);
        }
    }
}

#[test]
fn can_move_agrees_with_the_board() {
    for seed in 0..SAMPLES {
        let state = random_maze(seed, 6);
        for action in Action::ALL {
            let target = expected_target(&state, action);
            assert_eq!(state.can_move(action), target.is_some(), "seed {seed} {action}");

            if let Some(target) = target {
                let mut moved = state.clone();
                moved.move_hero(action);
                assert_eq!(moved.hero(), target);
                assert_eq!(moved.board()[target], Tile::Hero);
                assert_eq!(moved.board()[state.hero()], Tile::Empty);
                assert_cache_matches_board(&moved);
            }
        }
    }
}

#[test]
fn identical_boards_make_equal_states() {
    for seed in 0..SAMPLES {
        let state = random_maze(seed, 6);

        let reparsed = MazeState::new(load_board_from_string(&state.to_string()).unwrap()).unwrap();
        assert_eq!(reparsed, state);
        assert_eq!(hash_of(&reparsed), hash_of(&state));

        let mut backwards: Grid<Tile> = Grid::new(state.size(), state.size());
        let tiles: Vec<_> = state.board().enumerate().collect();
        for (pos, tile) in tiles.into_iter().rev() {
            backwards.set(pos, *tile).unwrap();
        }
        let rebuilt = MazeState::new(backwards).unwrap();
        assert_eq!(rebuilt, state);
        assert_eq!(hash_of(&rebuilt), hash_of(&state));
    }
}

#[test]
fn enemies_only_move_through_open_edges() {
    for seed in 0..SAMPLES {
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let mut state = random_maze(seed, 6);

        for _ in 0..25 {
            let actions = state.legal_actions();
            if actions.is_empty() {
                break;
            }
            let action = actions[rng.random_range(0..actions.len())];
            let before: Vec<_> = EnemyKind::ALL.iter().map(|k| state.enemy(*k)).collect();

            state.execute_action_quietly(action);
            assert_cache_matches_board(&state);

            for (kind, before) in EnemyKind::ALL.into_iter().zip(before) {
                let (Some(from), Some(to)) = (before, state.enemy(kind)) else {
                    continue;
                };
                let hops = if kind == EnemyKind::Scorpion { 1 } else { 2 };
                assert!(
                    reachable_in_hops(state.board(), from, to, hops),
                    "seed {seed}: {kind:?} jumped from {from} to {to}"
                );
            }
        }
    }
}

#[test]
fn exit_stays_on_the_board_while_enemies_move() {
    for seed in 0..SAMPLES {
        let mut rng = StdRng::seed_from_u64(seed ^ 0xe417);
        let mut state = random_maze(seed, 5);
        let exit = state.exit();

        for _ in 0..20 {
            let actions = state.legal_actions();
            if actions.is_empty() {
                break;
            }
            state.execute_action_quietly(actions[rng.random_range(0..actions.len())]);

            let tile = state.board()[exit];
            let occupant = EnemyKind::ALL
                .into_iter()
                .find(|kind| state.enemy(*kind) == Some(exit));
            match occupant {
                Some(kind) => assert_eq!(tile, kind.tile(), "seed {seed}"),
                None if state.hero() == exit => assert_eq!(tile, Tile::Hero),
                None if !state.is_hero_alive() => {}
                None => assert_eq!(tile, Tile::Exit, "seed {seed}"),
            }
            let in_play = u32::from(!state.is_at_goal());
            assert_eq!(state.tiles_out_of_place(), in_play, "seed {seed}");
        }
    }
}

#[test]
fn tile_distance_never_overestimates() {
    for seed in 0..SAMPLES {
        let state = random_maze(seed, 6);
        let Some(distance) = hero_only_distance(&state) else {
            continue;
        };
        assert!(state.tile_distance() <= distance, "seed {seed}");
        assert!(state.tiles_out_of_place() <= distance, "seed {seed}");
    }
}

#[test]
fn enemies_only_make_escapes_longer() {
    for seed in 0..SAMPLES / 2 {
        let state = random_maze(seed, 4);
        let solver = Solver::default().with_max_expansions(5_000);
        let solution = match solver.solve(&state) {
            Ok(Some(solution)) => solution,
            Ok(None) | Err(SearchError::BudgetExhausted { .. }) => continue,
        };
        let distance = hero_only_distance(&state).expect("an escape implies a path");
        assert!(solution.cost >= distance, "seed {seed}");
        assert!(solution.states.iter().all(MazeState::is_hero_alive));
        assert!(solution.states.last().unwrap().is_at_goal());
    }
}
