use wasm_bindgen::prelude::*;

pub mod cube_state;
pub mod face_map;
pub mod graph;
pub mod menu;
pub mod moves;
pub mod solver;
pub mod stats;

pub use cube_state::{CubeState, Facelet, ParseStateError, SOLVED};
pub use graph::TransitionGraph;
pub use moves::{Move, ParseMoveError};
pub use solver::{PathSolver, Solution, SolveError};

/// Browser-facing solver. Builds the full transition graph once and answers
/// solve requests against it.
#[wasm_bindgen]
pub struct CubeSolver {
    graph: TransitionGraph,
}

#[wasm_bindgen]
impl CubeSolver {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CubeSolver {
        CubeSolver {
            graph: TransitionGraph::build_full(),
        }
    }

    pub fn num_states(&self) -> usize {
        self.graph.len()
    }

    /// The solution as `[D, L, X]`, or `None` when the input is not a
    /// solvable configuration.
    pub fn solve(&self, state: &str) -> Option<String> {
        PathSolver::new(&self.graph)
            .solve_str(state)
            .ok()
            .map(|solution| solution.to_string())
    }
}

impl Default for CubeSolver {
    fn default() -> Self {
        CubeSolver::new()
    }
}

impl From<TransitionGraph> for CubeSolver {
    fn from(graph: TransitionGraph) -> Self {
        CubeSolver { graph }
    }
}
