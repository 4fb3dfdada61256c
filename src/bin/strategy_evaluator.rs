use clap::Parser;
use fifteen_solver::config::SolverConfig;
use fifteen_solver::engine::Board;
use fifteen_solver::heuristics::Difficulty;
use fifteen_solver::solver::{Solver, Strategy};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of shuffled boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Number of random blank moves per shuffle
    #[clap(long, default_value_t = 60)]
    walk: usize,

    /// Path to a TOML file with strategy limits
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    failed: usize,
    total_steps: usize,
    total_nodes: usize,
    total_time: Duration,
}

impl Tally {
    fn average(&self, total: usize) -> f64 {
        if self.solved == 0 {
            0.0
        } else {
            total as f64 / self.solved as f64
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match SolverConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SolverConfig::default(),
    };
    let solver = Solver::new(config);
    let goal = Board::solved();
    let mut tallies: HashMap<Strategy, Tally> = HashMap::new();

    println!(
        "Evaluating {} strategies on {} boards ({} random moves each)...",
        Strategy::ALL.len(),
        args.boards,
        args.walk
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let start = Board::new_shuffled_with_seed(&goal, args.walk, seed);
        println!(
            "\nBoard {} (Seed: {}, Difficulty: {})",
            board_idx,
            seed,
            Difficulty::assess(&start, &goal)
        );

        for strategy in Strategy::ALL {
            let tally = tallies.entry(strategy).or_default();
            match solver.solve(&start, &goal, strategy) {
                Ok(result) => {
                    println!(
                        "  Strategy: {:<18} Steps: {:<5} Nodes: {:<9} Time: {:.3?}",
                        result.algorithm_name, result.steps, result.nodes_explored, result.time_taken
                    );
                    tally.solved += 1;
                    tally.total_steps += result.steps;
                    tally.total_nodes += result.nodes_explored;
                    tally.total_time += result.time_taken;
                }
                Err(e) => {
                    println!("  Strategy: {:<18} Failed: {}", strategy.name(), e);
                    tally.failed += 1;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Averages over solved boards ---");
    for strategy in Strategy::ALL {
        let Some(tally) = tallies.get(&strategy) else {
            continue;
        };
        let average_time = if tally.solved == 0 {
            Duration::ZERO
        } else {
            tally.total_time / tally.solved as u32
        };
        println!(
            "Strategy {:<18}: Steps = {:.2}, Nodes = {:.0}, Time = {:.3?}, Failures = {}",
            strategy.name(),
            tally.average(tally.total_steps),
            tally.average(tally.total_nodes),
            average_time,
            tally.failed
        );
    }
    ExitCode::SUCCESS
}
