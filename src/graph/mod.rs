use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::cube_state::{CubeState, SOLVED};
use crate::moves::{Move, MOVE_COUNT};

mod builder;
pub mod store;

pub type NodeId = u32;

const NO_EDGE: NodeId = NodeId::MAX;
const UNREACHED: u16 = u16::MAX;

/// Every state reachable from [`SOLVED`] together with its labeled outgoing edges.
///
/// `graph[s][t] = m` (applying `m` to `s` yields `t`) is answered by
/// [`TransitionGraph::move_between`]. States are stored once and addressed by
/// dense node ids in discovery order; each node keeps one neighbor slot per
/// move. The graph is never mutated after construction, so it can be shared
/// between concurrent solves.
#[derive(Debug)]
pub struct TransitionGraph {
    // Always in `Move::ALL` order
    moves: Vec<Move>,
    nodes: NodeTable,
    depths: Vec<u16>,
    solved: NodeId,
}

#[derive(Debug, Default)]
pub(crate) struct NodeTable {
    states: Vec<CubeState>,
    index: FxHashMap<CubeState, NodeId>,
    edges: Vec<[NodeId; MOVE_COUNT]>,
}

impl NodeTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        NodeTable {
            states: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            edges: Vec::with_capacity(capacity),
        }
    }

    /// Returns the id of `state`, adding it without edges if it is new.
    pub(crate) fn intern(&mut self, state: CubeState) -> (NodeId, bool) {
        if let Some(&id) = self.index.get(&state) {
            return (id, false);
        }
        let id = self.states.len() as NodeId;
        self.states.push(state);
        self.edges.push([NO_EDGE; MOVE_COUNT]);
        self.index.insert(state, id);
        (id, true)
    }

    #[inline]
    pub(crate) fn edge(&self, from: NodeId, turn: Move) -> Option<NodeId> {
        match self.edges[from as usize][turn.index()] {
            NO_EDGE => None,
            to => Some(to),
        }
    }

    #[inline]
    pub(crate) fn set_edge(&mut self, from: NodeId, turn: Move, to: NodeId) {
        self.edges[from as usize][turn.index()] = to;
    }

    pub(crate) fn state(&self, id: NodeId) -> &CubeState {
        &self.states[id as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}

/// Sorts into `Move::ALL` order and drops duplicates.
pub(crate) fn canonical_moves(moves: &[Move]) -> Vec<Move> {
    let mut moves = moves.to_vec();
    moves.sort_unstable();
    moves.dedup();
    moves
}

impl TransitionGraph {
    pub(crate) fn from_parts(
        moves: Vec<Move>,
        nodes: NodeTable,
        depths: Vec<u16>,
        solved: NodeId,
    ) -> Self {
        debug_assert_eq!(nodes.len(), depths.len());
        TransitionGraph {
            moves,
            nodes,
            depths,
            solved,
        }
    }

    /// Assembles a graph whose depths were not recorded, computing them by
    /// breadth-first search from the solved state. Returns `None` when the
    /// solved state is absent.
    pub(crate) fn from_nodes(moves: Vec<Move>, nodes: NodeTable) -> Option<Self> {
        let solved = *nodes.index.get(&SOLVED)?;
        let mut depths = vec![UNREACHED; nodes.len()];
        depths[solved as usize] = 0;
        let mut frontier = VecDeque::from([solved]);
        while let Some(node) = frontier.pop_front() {
            let next_depth = depths[node as usize].saturating_add(1);
            for &turn in &moves {
                if let Some(neighbor) = nodes.edge(node, turn) {
                    if depths[neighbor as usize] == UNREACHED {
                        depths[neighbor as usize] = next_depth;
                        frontier.push_back(neighbor);
                    }
                }
            }
        }
        Some(Self::from_parts(moves, nodes, depths, solved))
    }

    /// Number of states.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.nodes
            .edges
            .iter()
            .map(|slots| slots.iter().filter(|&&to| to != NO_EDGE).count())
            .sum()
    }

    /// The move set the graph was generated with.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn solved_id(&self) -> NodeId {
        self.solved
    }

    pub fn contains(&self, state: &CubeState) -> bool {
        self.nodes.index.contains_key(state)
    }

    pub fn node_id(&self, state: &CubeState) -> Option<NodeId> {
        self.nodes.index.get(state).copied()
    }

    pub fn state(&self, id: NodeId) -> &CubeState {
        self.nodes.state(id)
    }

    /// States in node id order.
    pub fn states(&self) -> impl Iterator<Item = &CubeState> + '_ {
        self.nodes.states.iter()
    }

    pub(crate) fn neighbor_ids(&self, id: NodeId) -> impl Iterator<Item = (Move, NodeId)> + '_ {
        self.moves
            .iter()
            .filter_map(move |&turn| self.nodes.edge(id, turn).map(|to| (turn, to)))
    }

    /// Outgoing edges of `state` as `(move, resulting state)`, or `None` if
    /// `state` is not in the graph.
    pub fn neighbors(
        &self,
        state: &CubeState,
    ) -> Option<impl Iterator<Item = (Move, &CubeState)> + '_> {
        let id = self.node_id(state)?;
        Some(
            self.neighbor_ids(id)
                .map(move |(turn, to)| (turn, self.nodes.state(to))),
        )
    }

    /// Every edge as `(source, move, target)`, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&CubeState, Move, &CubeState)> + '_ {
        (0..self.len() as NodeId).flat_map(move |from| {
            self.neighbor_ids(from)
                .map(move |(turn, to)| (self.nodes.state(from), turn, self.nodes.state(to)))
        })
    }

    pub fn out_degree(&self, state: &CubeState) -> Option<usize> {
        self.node_id(state)
            .map(|id| self.neighbor_ids(id).count())
    }

    pub(crate) fn move_between_ids(&self, from: NodeId, to: NodeId) -> Option<Move> {
        self.neighbor_ids(from)
            .find(|&(_, neighbor)| neighbor == to)
            .map(|(turn, _)| turn)
    }

    /// The label on the edge `from -> to`, if there is one.
    pub fn move_between(&self, from: &CubeState, to: &CubeState) -> Option<Move> {
        self.move_between_ids(self.node_id(from)?, self.node_id(to)?)
    }

    /// Fewest moves separating `state` from the solved state, if reachable.
    pub fn depth(&self, state: &CubeState) -> Option<u16> {
        self.node_id(state)
            .map(|id| self.depths[id as usize])
            .filter(|&depth| depth != UNREACHED)
    }

    pub fn max_depth(&self) -> u16 {
        self.depths
            .iter()
            .copied()
            .filter(|&depth| depth != UNREACHED)
            .max()
            .unwrap_or(0)
    }

    /// Number of states at each depth, starting with the solved state at depth 0.
    pub fn depth_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.max_depth() as usize + 1];
        for &depth in &self.depths {
            if depth != UNREACHED {
                histogram[depth as usize] += 1;
            }
        }
        histogram
    }

    /// Finds an edge `s -> t` for which `t` has no edge back to `s`.
    ///
    /// Shortest-path search walks edges outward from the solved state and then
    /// reads the labels of the reverse edges, so a complete graph must return
    /// `None` here.
    pub fn find_asymmetric_edge(&self) -> Option<(CubeState, Move, CubeState)> {
        (0..self.len() as NodeId).find_map(|from| {
            self.neighbor_ids(from)
                .find(|&(_, to)| self.move_between_ids(to, from).is_none())
                .map(|(turn, to)| (*self.state(from), turn, *self.state(to)))
        })
    }

    /// Finds a state with no edge for one of the graph's moves.
    pub fn find_missing_edge(&self) -> Option<(CubeState, Move)> {
        (0..self.len() as NodeId).find_map(|from| {
            self.moves
                .iter()
                .find(|&&turn| self.nodes.edge(from, turn).is_none())
                .map(|&turn| (*self.state(from), turn))
        })
    }

    /// Finds a state that no path from the solved state reaches.
    pub fn find_unreached_state(&self) -> Option<CubeState> {
        self.depths
            .iter()
            .position(|&depth| depth == UNREACHED)
            .map(|id| *self.state(id as NodeId))
    }
}
