use std::collections::VecDeque;

use log::info;

use super::{canonical_moves, NodeTable, TransitionGraph};
use crate::cube_state::SOLVED;
use crate::moves::Move;

/// Number of configurations reachable from the solved state with all six moves.
pub const REACHABLE_STATES: usize = 3_674_160;

impl TransitionGraph {
    /// Enumerates every state reachable from [`SOLVED`] using `moves`,
    /// breadth first, recording an edge for every move at every state.
    ///
    /// Duplicate moves are ignored and moves are always tried in
    /// [`Move::ALL`] order, so the result only depends on the move set.
    pub fn build(moves: &[Move]) -> TransitionGraph {
        let moves = canonical_moves(moves);
        let capacity = if moves.len() == Move::ALL.len() {
            REACHABLE_STATES
        } else {
            0
        };
        let mut nodes = NodeTable::with_capacity(capacity);
        let mut depths: Vec<u16> = Vec::with_capacity(capacity);

        let (solved, _) = nodes.intern(SOLVED);
        depths.push(0);
        let mut frontier = VecDeque::from([solved]);

        while let Some(current) = frontier.pop_front() {
            let current_state = *nodes.state(current);
            let next_depth = depths[current as usize] + 1;
            for &turn in &moves {
                let (next, is_new) = nodes.intern(turn.apply(&current_state));
                if is_new {
                    depths.push(next_depth);
                    frontier.push_back(next);
                }
                nodes.set_edge(current, turn, next);
            }
        }

        let graph = TransitionGraph::from_parts(moves, nodes, depths, solved);
        info!(
            "Built transition graph: {} states, {} edges, max depth {}",
            graph.len(),
            graph.edge_count(),
            graph.max_depth()
        );
        info!("States per depth: {:?}", graph.depth_histogram());
        graph
    }

    /// The graph for the full move set.
    pub fn build_full() -> TransitionGraph {
        TransitionGraph::build(&Move::ALL)
    }
}
