use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    hash::Hash,
};

use log::{debug, warn};

use crate::{Action, Heuristic, maze::MazeState};

/// What a state must offer to be explored by [`Solver`].
///
/// Successors are produced by cloning, so a state handed to the search is
/// never mutated again.
pub trait SearchState: Clone + Eq + Hash {
    type Action: Copy;

    /// Actions that are legal from this state.
    fn actions(&self) -> Vec<Self::Action>;

    /// The state reached by applying a legal `action` to a copy of `self`.
    fn successor(&self, action: Self::Action) -> Self;

    fn is_goal(&self) -> bool;

    /// Terminal states that are not goals; never expanded.
    fn is_dead_end(&self) -> bool;

    fn estimate(&self, heuristic: Heuristic) -> u32;
}

impl SearchState for MazeState {
    type Action = Action;

    fn actions(&self) -> Vec<Action> {
        self.legal_actions()
    }

    fn successor(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.execute_action_quietly(action);
        next
    }

    fn is_goal(&self) -> bool {
        self.is_at_goal()
    }

    fn is_dead_end(&self) -> bool {
        !self.is_hero_alive()
    }

    fn estimate(&self, heuristic: Heuristic) -> u32 {
        heuristic.evaluate(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Search gave up after expanding {expanded} states")]
    BudgetExhausted { expanded: usize },
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
}

/// A path from the start state to a goal.
#[derive(Debug, Clone)]
pub struct Solution<S: SearchState> {
    pub actions: Vec<S::Action>,
    /// Every state along the path, the start state included.
    pub states: Vec<S>,
    pub cost: u32,
    pub stats: SearchStats,
}

/// A* over unit-cost moves, keyed by state equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    heuristic: Heuristic,
    max_expansions: Option<usize>,
}

struct Node<S: SearchState> {
    state: S,
    parent: Option<usize>,
    action: Option<S::Action>,
    cost: u32,
}

impl Solver {
    pub fn new(heuristic: Heuristic) -> Self {
        Solver {
            heuristic,
            max_expansions: None,
        }
    }

    /// Gives up with [`SearchError::BudgetExhausted`] after `limit` expansions.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Finds a cheapest path from `start` to a goal state.
    ///
    /// Returns `Ok(None)` when every reachable state has been explored
    /// without reaching a goal.
    pub fn solve<S: SearchState>(&self, start: &S) -> Result<Option<Solution<S>>, SearchError> {
        // For priority queue
        #[derive(PartialEq, Eq)]
        struct PrioritizedItem {
            priority: u32,
            cost: u32,
            node: usize,
        }

        impl Ord for PrioritizedItem {
            fn cmp(&self, other: &Self) -> Ordering {
                // Min-heap on priority, deeper nodes first on ties, then FIFO.
                other
                    .priority
                    .cmp(&self.priority)
                    .then_with(|| self.cost.cmp(&other.cost))
                    .then_with(|| other.node.cmp(&self.node))
            }
        }

        impl PartialOrd for PrioritizedItem {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        let mut nodes: Vec<Node<S>> = vec![Node {
            state: start.clone(),
            parent: None,
            action: None,
            cost: 0,
        }];
        let mut frontier = BinaryHeap::new();
        let mut cost_so_far: HashMap<S, u32> = HashMap::new();
        let mut stats = SearchStats::default();

        frontier.push(PrioritizedItem {
            priority: start.estimate(self.heuristic),
            cost: 0,
            node: 0,
        });
        cost_so_far.insert(start.clone(), 0);

        while let Some(PrioritizedItem { cost, node, .. }) = frontier.pop() {
            let current = &nodes[node].state;
            // Stale entry: a cheaper route to this state was found later.
            if cost_so_far.get(current).is_some_and(|best| *best < cost) {
                continue;
            }

            if current.is_goal() {
                debug!(
                    "solved with cost {} ({} expanded, {} generated)",
                    cost, stats.expanded, stats.generated
                );
                return Ok(Some(Self::reconstruct(nodes, node, stats)));
            }

            if let Some(limit) = self.max_expansions {
                if stats.expanded >= limit {
                    warn!("search budget of {} expansions exhausted", limit);
                    return Err(SearchError::BudgetExhausted {
                        expanded: stats.expanded,
                    });
                }
            }
            stats.expanded += 1;

            let current = current.clone();
            for action in current.actions() {
                let next = current.successor(action);
                stats.generated += 1;
                if next.is_dead_end() {
                    continue;
                }

                let new_cost = cost + 1;
                if cost_so_far.get(&next).is_some_and(|best| *best <= new_cost) {
                    continue;
                }
                cost_so_far.insert(next.clone(), new_cost);

                let priority = new_cost + next.estimate(self.heuristic);
                nodes.push(Node {
                    state: next,
                    parent: Some(node),
                    action: Some(action),
                    cost: new_cost,
                });
                frontier.push(PrioritizedItem {
                    priority,
                    cost: new_cost,
                    node: nodes.len() - 1,
                });
            }
        }

        debug!(
            "no escape found ({} expanded, {} generated)",
            stats.expanded, stats.generated
        );
        Ok(None)
    }

    fn reconstruct<S: SearchState>(
        nodes: Vec<Node<S>>,
        goal: usize,
        stats: SearchStats,
    ) -> Solution<S> {
        let cost = nodes[goal].cost;
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(index) = current {
            path.push(index);
            current = nodes[index].parent;
        }
        path.reverse();

        let mut actions = Vec::with_capacity(path.len().saturating_sub(1));
        let mut states = Vec::with_capacity(path.len());
        for index in path {
            let node = &nodes[index];
            if let Some(action) = node.action {
                actions.push(action);
            }
            states.push(node.state.clone());
        }

        Solution {
            actions,
            states,
            cost,
            stats,
        }
    }
}
