use std::collections::VecDeque;

use log::debug;

use super::{Solution, SolveError};
use crate::cube_state::CubeState;
use crate::graph::{NodeId, TransitionGraph};
use crate::moves::Move;

/// Breadth-first shortest-path search over a prebuilt [`TransitionGraph`].
///
/// The search walks outward from the solved state until it dequeues the
/// requested state, then reads the solution off the reverse edges of the
/// discovered path. Each call allocates its own bookkeeping, so one graph can
/// serve any number of solvers, including on other threads.
#[derive(Clone, Copy)]
pub struct PathSolver<'g> {
    graph: &'g TransitionGraph,
}

impl<'g> PathSolver<'g> {
    pub fn new(graph: &'g TransitionGraph) -> Self {
        PathSolver { graph }
    }

    pub fn graph(&self) -> &'g TransitionGraph {
        self.graph
    }

    /// Parses `text` (surrounding whitespace ignored) and solves it.
    pub fn solve_str(&self, text: &str) -> Result<Solution, SolveError> {
        let state: CubeState = text.trim().parse()?;
        self.solve(&state)
    }

    pub fn solve(&self, input: &CubeState) -> Result<Solution, SolveError> {
        let target = self
            .graph
            .node_id(input)
            .ok_or(SolveError::NotFound(*input))?;
        let parents = self
            .search(target)
            .ok_or(SolveError::Unreachable(*input))?;
        let path = reconstruct_path(&parents, target);
        let moves = self.directions(&path)?;
        debug!("Solved {} in {} moves", input, moves.len());
        Ok(Solution::new(*input, moves))
    }

    /// Returns each visited node's parent, or `None` if `target` is never dequeued.
    fn search(&self, target: NodeId) -> Option<Vec<Option<NodeId>>> {
        let root = self.graph.solved_id();
        let mut visited = vec![false; self.graph.len()];
        let mut parents: Vec<Option<NodeId>> = vec![None; self.graph.len()];
        let mut frontier = VecDeque::from([root]);
        visited[root as usize] = true;

        while let Some(node) = frontier.pop_front() {
            if node == target {
                return Some(parents);
            }
            for (_, neighbor) in self.graph.neighbor_ids(node) {
                if !visited[neighbor as usize] {
                    visited[neighbor as usize] = true;
                    parents[neighbor as usize] = Some(node);
                    frontier.push_back(neighbor);
                }
            }
        }
        None
    }

    /// Labels each step of `path` with the move on the edge `current -> next`.
    fn directions(&self, path: &[NodeId]) -> Result<Vec<Move>, SolveError> {
        path.windows(2)
            .map(|pair| {
                let (current, next) = (pair[0], pair[1]);
                self.graph
                    .move_between_ids(current, next)
                    .ok_or_else(|| SolveError::MissingEdge {
                        from: *self.graph.state(current),
                        to: *self.graph.state(next),
                    })
            })
            .collect()
    }
}

/// Follows parent links from `target` back to the root: `[target, ..., root]`.
fn reconstruct_path(parents: &[Option<NodeId>], target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut node = target;
    while let Some(parent) = parents[node as usize] {
        path.push(parent);
        node = parent;
    }
    path
}
