use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::cube_state::{CubeState, ParseStateError};
use crate::moves::Move;

mod shortest_path;
pub use shortest_path::PathSolver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("input is not a cube configuration: {0}")]
    Malformed(#[from] ParseStateError),
    #[error("configuration {0} was not found in the transition graph")]
    NotFound(CubeState),
    #[error("configuration {0} is in the transition graph but unreachable from the solved state")]
    Unreachable(CubeState),
    #[error("transition graph has no edge from {from} to {to}")]
    MissingEdge { from: CubeState, to: CubeState },
}

impl SolveError {
    /// True for bad user input, as opposed to a damaged transition graph.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SolveError::Malformed(_) | SolveError::NotFound(_))
    }
}

/// The moves that take `start` to the solved state, in the order to perform them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    start: CubeState,
    moves: Vec<Move>,
}

impl Solution {
    pub fn new(start: CubeState, moves: Vec<Move>) -> Self {
        Solution { start, moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn end_state(&self) -> CubeState {
        Move::apply_all(&self.start, &self.moves)
    }

    /// Replays the solution one move at a time.
    pub fn steps(&self) -> SolutionSteps<'_> {
        SolutionSteps {
            state: self.start,
            moves: self.moves.iter(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, turn) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", turn)?;
        }
        write!(f, "]")
    }
}

pub struct SolutionSteps<'a> {
    state: CubeState,
    moves: std::slice::Iter<'a, Move>,
}

impl Iterator for SolutionSteps<'_> {
    /// A move and the state it produces.
    type Item = (Move, CubeState);

    fn next(&mut self) -> Option<Self::Item> {
        let &turn = self.moves.next()?;
        self.state = turn.apply(&self.state);
        Some((turn, self.state))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}

impl ExactSizeIterator for SolutionSteps<'_> {}
