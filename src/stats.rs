use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use rand::Rng;
use serde::Serialize;

use crate::cube_state::CubeState;
use crate::graph::{NodeId, TransitionGraph};
use crate::solver::{PathSolver, SolveError};

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveSample {
    pub cube: CubeState,
    /// Seconds, rounded to the millisecond
    #[serde(rename = "solveTime")]
    pub solve_time: f64,
    #[serde(rename = "numMoves")]
    pub num_moves: usize,
}

/// `count` states drawn uniformly (with replacement) from the graph.
pub fn random_states<R: Rng>(graph: &TransitionGraph, count: usize, rng: &mut R) -> Vec<CubeState> {
    (0..count)
        .map(|_| *graph.state(rng.gen_range(0..graph.len()) as NodeId))
        .collect()
}

/// Times the solve of `count` random states.
pub fn collect<R: Rng>(
    solver: &PathSolver,
    count: usize,
    rng: &mut R,
) -> Result<Vec<SolveSample>, SolveError> {
    let cubes = random_states(solver.graph(), count, rng);
    let mut samples = Vec::with_capacity(count);
    for (i, cube) in cubes.into_iter().enumerate() {
        if (i + 1) % 5 == 0 {
            info!("Testing cube {} of {}", i + 1, count);
        }
        let start = Instant::now();
        let solution = solver.solve(&cube)?;
        let elapsed = start.elapsed().as_secs_f64();
        samples.push(SolveSample {
            cube,
            solve_time: (elapsed * 1000.0).round() / 1000.0,
            num_moves: solution.len(),
        });
    }
    Ok(samples)
}

pub fn default_output_path(count: usize) -> PathBuf {
    PathBuf::from(format!("solveStats_{}Cubes.csv", count))
}

pub fn write_samples<W: Write>(samples: &[SolveSample], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    if samples.is_empty() {
        csv_writer.write_record(["cube", "solveTime", "numMoves"])?;
    }
    for sample in samples {
        csv_writer.serialize(sample)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_samples(samples: &[SolveSample], path: &Path) -> Result<(), csv::Error> {
    write_samples(samples, std::fs::File::create(path)?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_moves: f64,
    pub max_moves: usize,
    pub mean_solve_time: f64,
    /// Index `n` holds the number of samples solved in `n` moves
    pub move_distribution: Vec<usize>,
}

impl Summary {
    pub fn new(samples: &[SolveSample]) -> Summary {
        let count = samples.len();
        let max_moves = samples.iter().map(|s| s.num_moves).max().unwrap_or(0);
        let mut move_distribution = vec![0; max_moves + 1];
        for sample in samples {
            move_distribution[sample.num_moves] += 1;
        }
        let mean = |total: f64| if count == 0 { 0.0 } else { total / count as f64 };
        Summary {
            count,
            mean_moves: mean(samples.iter().map(|s| s.num_moves as f64).sum()),
            max_moves,
            mean_solve_time: mean(samples.iter().map(|s| s.solve_time).sum()),
            move_distribution,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} cubes, {:.2} moves on average (max {}), {:.3}s per solve",
            self.count, self.mean_moves, self.max_moves, self.mean_solve_time
        )?;
        for (moves, &cubes) in self.move_distribution.iter().enumerate() {
            if cubes > 0 {
                writeln!(f, "{:>3} moves: {}", moves, cubes)?;
            }
        }
        Ok(())
    }
}
