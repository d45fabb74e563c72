//! The interactive text menu: solve typed-in cubes, or time a batch of random
//! solves and save the results.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::warn;
use rand::Rng;

use crate::moves::Move;
use crate::solver::PathSolver;
use crate::stats::{self, Summary, DEFAULT_SAMPLE_COUNT};

const QUIT: &str = "quit";
const COLLECT_DATA: &str = "collect data";

pub struct Menu<'g, G> {
    solver: PathSolver<'g>,
    stats_dir: PathBuf,
    rng: G,
}

impl<'g, G: Rng> Menu<'g, G> {
    pub fn new(solver: PathSolver<'g>, rng: G) -> Self {
        Menu {
            solver,
            stats_dir: PathBuf::from("."),
            rng,
        }
    }

    /// Directory that `collect data` writes its CSV files into.
    pub fn with_stats_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stats_dir = dir.into();
        self
    }

    /// Runs until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        print_introduction(&mut output)?;
        loop {
            writeln!(output, "Options:")?;
            writeln!(output, "1. Enter your cube's sequence to solve")?;
            writeln!(output, "2. Quit the program by entering the word \"{}\"", QUIT)?;
            writeln!(
                output,
                "3. Get the solving-time and number-of-moves distribution of this tool by entering \"{}\"",
                COLLECT_DATA
            )?;
            output.flush()?;

            let line = match read_trimmed_line(&mut input)? {
                Some(line) => line,
                None => return Ok(()),
            };
            match line.as_str() {
                QUIT => {
                    writeln!(output, "Thank you for visiting the cube solver!")?;
                    return Ok(());
                }
                COLLECT_DATA => {
                    self.prompt_collect_data(&mut input, &mut output)?;
                }
                text => match self.solver.solve_str(text) {
                    Ok(solution) => writeln!(output, "Directions: {}", solution)?,
                    Err(err) if err.is_invalid_input() => writeln!(output, "Input invalid.")?,
                    Err(err) => writeln!(output, "Could not solve: {}", err)?,
                },
            }
            writeln!(output)?;
        }
    }

    fn prompt_collect_data<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        writeln!(
            output,
            "How many cubes do you want to test? If you enter nothing, the default is {}.",
            DEFAULT_SAMPLE_COUNT
        )?;
        output.flush()?;
        let answer = read_trimmed_line(input)?.unwrap_or_default();
        match parse_sample_count(&answer) {
            Some(count) => self.collect_data(count, output),
            None => writeln!(
                output,
                "Input is invalid. For this question, you need to either press enter, or enter \
                 a positive integer with no + sign. Going back to main menu..."
            ),
        }
    }

    fn collect_data<W: Write>(&mut self, count: usize, output: &mut W) -> io::Result<()> {
        let samples = match stats::collect(&self.solver, count, &mut self.rng) {
            Ok(samples) => samples,
            Err(err) => {
                warn!("Stopped collecting solve stats: {}", err);
                return writeln!(output, "Could not collect solve stats: {}", err);
            }
        };
        let path = self.stats_dir.join(stats::default_output_path(count));
        match stats::save_samples(&samples, &path) {
            Ok(()) => writeln!(output, "Solve stats saved in: {}", path.display())?,
            Err(err) => {
                warn!("Could not save solve stats to {}: {}", path.display(), err);
                writeln!(output, "Could not save solve stats: {}", err)?;
            }
        }
        write!(output, "{}", Summary::new(&samples))
    }
}

/// Empty means the default; otherwise only unsigned positive integers.
fn parse_sample_count(answer: &str) -> Option<usize> {
    if answer.is_empty() {
        return Some(DEFAULT_SAMPLE_COUNT);
    }
    if !answer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    answer.parse().ok().filter(|&count| count > 0)
}

fn read_trimmed_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn print_introduction<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "---------------------------------------------")?;
    writeln!(output, "Welcome to the mini rubik's cube solver!")?;
    writeln!(output)?;
    writeln!(
        output,
        "PURPOSE: For any unsolved mini cube, this program provides step by step directions \
         to solve it using the minimum number of moves."
    )?;
    writeln!(output)?;
    writeln!(output, "INPUT SPECIFICATION:")?;
    writeln!(
        output,
        "Input = a character sequence representing the configuration of the cube you want to solve."
    )?;
    writeln!(
        output,
        "Each position in the sequence corresponds to a specific location on the cube."
    )?;
    writeln!(
        output,
        "The char at each position in the sequence corresponds to the color of the corresponding \
         location on the cube."
    )?;
    writeln!(
        output,
        "Legal chars: W=white, R=red, B=blue, O=orange, G=green, Y=yellow."
    )?;
    writeln!(
        output,
        "Restriction: when you enter the cube, the lower right corner of the bottom face must be \
         yellow, the bottom right corner of the right face must be orange, and the bottom left \
         corner of the back face must be green."
    )?;
    writeln!(
        output,
        "This restriction should be attainable with any valid cube configuration. You may need \
         to rotate the cube in space to figure out which faces need to be on top, middle, etc \
         to meet the restriction."
    )?;
    writeln!(output)?;
    writeln!(output, "DEFINITIONS OF EACH MOVE:")?;
    for turn in [Move::U, Move::D, Move::R, Move::L, Move::Y, Move::X] {
        writeln!(output, "{} = {}.", turn, turn.description())?;
    }
    writeln!(output)
}
