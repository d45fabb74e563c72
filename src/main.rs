use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use serde::Serialize;

use pocket_cube::graph::store::{self, DEFAULT_CACHE_PATH};
use pocket_cube::menu::Menu;
use pocket_cube::stats::{self, Summary, DEFAULT_SAMPLE_COUNT};
use pocket_cube::{Move, PathSolver, Solution, TransitionGraph};

#[derive(Parser)]
#[command(version, about = "Optimal solver for the 2x2x2 cube", long_about = None)]
struct Cli {
    /// CSV file the transition graph is cached in between runs.
    #[arg(long, default_value = DEFAULT_CACHE_PATH, value_name = "PATH")]
    cache: PathBuf,

    /// Always build the graph in memory, never read or write the cache.
    #[arg(long)]
    no_cache: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shortest solution for each configuration.
    Solve {
        /// 24 facelet colors, e.g. RWRRGGGYYYBRBBWOOWGWOBOY
        #[arg(required = true)]
        states: Vec<String>,
        /// Print one JSON object per configuration.
        #[arg(long)]
        json: bool,
    },
    /// Time the solves of random configurations and save them as CSV.
    Stats {
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,
        /// Seed for picking configurations; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Defaults to solveStats_<COUNT>Cubes.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive menu (the default).
    Menu,
}

#[derive(Serialize)]
struct SolveReport<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Solution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .parse_default_env()
        .init();

    let graph = if cli.no_cache {
        TransitionGraph::build_full()
    } else {
        store::load_or_build(&cli.cache, &Move::ALL)
    };
    let solver = PathSolver::new(&graph);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Solve { states, json } => {
            for input in states.iter().map(String::as_str) {
                let result = solver.solve_str(input);
                if json {
                    let report = match result {
                        Ok(solution) => SolveReport {
                            input,
                            solution: Some(solution),
                            error: None,
                        },
                        Err(err) => SolveReport {
                            input,
                            solution: None,
                            error: Some(err.to_string()),
                        },
                    };
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    match result {
                        Ok(solution) => println!("Directions: {}", solution),
                        Err(err) if err.is_invalid_input() => println!("Input invalid."),
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }
        Commands::Stats {
            count,
            seed,
            output,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let samples = stats::collect(&solver, count, &mut rng)?;
            let path = output.unwrap_or_else(|| stats::default_output_path(count));
            stats::save_samples(&samples, &path)?;
            info!("Solve stats saved in: {}", path.display());
            print!("{}", Summary::new(&samples));
        }
        Commands::Menu => {
            Menu::new(solver, thread_rng()).run(io::stdin().lock(), io::stdout().lock())?;
        }
    }
    Ok(())
}
