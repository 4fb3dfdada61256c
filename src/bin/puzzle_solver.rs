use clap::Parser;
use fifteen_solver::config::SolverConfig;
use fifteen_solver::engine::Board;
use fifteen_solver::heuristics::{complexity_score, Difficulty};
use fifteen_solver::solver::{Solver, SolverResult, Strategy};
use fifteen_solver::utils::parse_board;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_WALK: usize = 600;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Start board: 16 numbers in row-major order, 0 for the blank
    #[clap(short, long, conflicts_with = "seed")]
    start: Option<String>,

    /// Shuffle the goal with this seed instead of passing --start
    #[clap(long)]
    seed: Option<u64>,

    /// Number of random blank moves used by --seed
    #[clap(long, default_value_t = DEFAULT_WALK)]
    walk: usize,

    /// Goal board (defaults to 1..15 with the blank last)
    #[clap(short, long)]
    goal: Option<String>,

    /// Strategy: iterative_deepening, greedy, weighted_a_star or bidirectional
    #[clap(long, conflicts_with = "all")]
    strategy: Option<Strategy>,

    /// Run every strategy on the same board
    #[clap(long)]
    all: bool,

    /// Path to a TOML file with strategy limits
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Print every board along the path
    #[clap(long)]
    show_boards: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_boards(args: &Args) -> Result<(Board, Board), String> {
    let goal = match &args.goal {
        Some(text) => parse_board(text).map_err(|e| format!("Invalid goal board: {}", e))?,
        None => Board::solved(),
    };
    let start = match (&args.start, args.seed) {
        (Some(text), _) => parse_board(text).map_err(|e| format!("Invalid start board: {}", e))?,
        (None, Some(seed)) => Board::new_shuffled_with_seed(&goal, args.walk, seed),
        (None, None) => return Err("Pass either --start or --seed".to_string()),
    };
    Ok((start, goal))
}

fn print_result(result: &SolverResult, show_boards: bool) {
    println!("{}:", result.algorithm_name);
    println!("  Steps: {}", result.steps);
    println!("  Nodes explored: {}", result.nodes_explored);
    println!("  Time: {:.3?}", result.time_taken);
    let moves: Vec<&str> = result.moves().map(|direction| direction.as_str()).collect();
    if moves.is_empty() {
        println!("  Already at the goal.");
    } else {
        println!("  Moves: {}", moves.join(" "));
    }
    if show_boards {
        for (i, board) in result.boards().enumerate() {
            println!("\n  Step {}:\n{}", i, board);
        }
    }
    println!();
}

fn main() -> ExitCode {
    init_logging();
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
    let (start, goal) = match read_boards(&args) {
        Ok(boards) => boards,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Start board:\n{}", start);
    println!("Goal board:\n{}", goal);
    println!(
        "Difficulty: {} (score {})\n",
        Difficulty::assess(&start, &goal),
        complexity_score(&start, &goal)
    );

    let strategies = if args.all {
        Strategy::ALL.to_vec()
    } else {
        vec![args.strategy.unwrap_or(config.default_strategy)]
    };

    let solver = Solver::new(config);
    let mut failed = false;
    for strategy in strategies {
        match solver.solve(&start, &goal, strategy) {
            Ok(result) => print_result(&result, args.show_boards),
            Err(e) => {
                println!("{}: {}\n", strategy, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
