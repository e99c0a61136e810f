use clap::{Parser, Subcommand, ValueEnum};
use horizon::mission::{Scenario, Sequence, play};
use horizon::search::{OverflowPolicy, ParallelSearch, SearchConfig, Searchable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "horizon")]
#[command(about = "horizon - Mars Horizon mission solver")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI overflow policy selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOverflow {
    /// Drop goals found after the result limit is reached
    Discard,
    /// Park workers that find goals after the result limit is reached
    Block,
}

impl From<CliOverflow> for OverflowPolicy {
    fn from(cli: CliOverflow) -> Self {
        match cli {
            CliOverflow::Discard => OverflowPolicy::Discard,
            CliOverflow::Block => OverflowPolicy::Block,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the best command sequences that complete a mission
    Solve {
        /// Path to the scenario JSON file
        scenario: PathBuf,
        /// Number of worker threads (defaults to the number of CPUs)
        #[arg(long, short = 'j')]
        pool_size: Option<usize>,
        /// Maximum number of actions to search (at most, and by default, turns * actions per turn)
        #[arg(long)]
        depth_limit: Option<u32>,
        /// Number of solutions to collect
        #[arg(long, default_value = "4")]
        search_limit: usize,
        /// What to do with solutions found after the limit is reached
        #[arg(long, value_enum, default_value = "discard")]
        overflow: CliOverflow,
        /// Stop waiting for solutions after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Print search statistics
        #[arg(long, short)]
        verbose: bool,
    },
    /// Replay a list of commands, showing the resources after each one
    Play {
        /// Path to the scenario JSON file
        scenario: PathBuf,
        /// Commands to take, in order
        #[arg(required = true)]
        commands: Vec<String>,
    },
}

/// Options for the solve command
struct SolveOptions {
    pool_size: usize,
    depth_limit: Option<u32>,
    search_limit: usize,
    overflow: OverflowPolicy,
    timeout: Option<Duration>,
    verbose: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr; stdout carries the solutions.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

const SEPARATOR: &str =
    "################################################################################";

// --- Solve ---

fn solve_scenario(path: &Path, options: &SolveOptions) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Arc::new(Scenario::load(path)?);
    // Sequences stop growing at the scenario's action budget, so deeper
    // levels would only be empty bookkeeping.
    let total_actions = scenario.total_actions();
    let depth_limit = options
        .depth_limit
        .map_or(total_actions, |limit| limit.min(total_actions));

    println!("Solving scenario: {}", path.display());
    println!(
        "Turns: {} x {} actions, {} commands",
        scenario.turns,
        scenario.actions_per_turn,
        scenario.commands.len()
    );
    println!("Start: {}", scenario.start);
    println!("Goal: {}", scenario.goal);

    let config = SearchConfig::new(options.pool_size, depth_limit, options.search_limit)
        .with_overflow_policy(options.overflow)
        .with_thread_name("mission");

    let search = ParallelSearch::new(config)?;
    search.start([Sequence::start(Arc::clone(&scenario))])?;

    let found = match options.timeout {
        Some(timeout) => search.wait_for_found_timeout(timeout),
        None => search.wait_for_found(),
    };

    if found.is_empty() {
        println!("\nNo solution found within {} actions.", depth_limit);
    } else {
        println!("\nFound {} solution(s), best first:", found.len());
        for (rank, sequence) in found.iter().enumerate() {
            println!("\n{}", SEPARATOR);
            println!(
                "#{} score {}: {}",
                rank + 1,
                sequence.score(),
                sequence.command_path()
            );
            print!("{}", sequence.turn_summary());
        }
    }

    if options.verbose {
        println!("\nSearch Statistics:");
        print!("{}", search.statistics().format_summary());
    }

    Ok(())
}

// --- Play ---

fn play_scenario(path: &Path, commands: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Arc::new(Scenario::load(path)?);
    println!("START: {}", scenario.start);

    for sequence in play(scenario, commands)? {
        println!("\n{}", SEPARATOR);
        println!("{}", sequence.command_path());
        print!("{}", sequence.turn_summary());
    }

    Ok(())
}

// --- Main Function ---
fn main() {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Commands::Solve {
            scenario,
            pool_size,
            depth_limit,
            search_limit,
            overflow,
            timeout,
            verbose,
        } => {
            let options = SolveOptions {
                pool_size: pool_size.unwrap_or_else(num_cpus::get),
                depth_limit,
                search_limit,
                overflow: overflow.into(),
                timeout: timeout.map(Duration::from_secs),
                verbose,
            };

            if let Err(e) = solve_scenario(&scenario, &options) {
                eprintln!("Error solving scenario: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Play { scenario, commands } => {
            if let Err(e) = play_scenario(&scenario, &commands) {
                eprintln!("Error playing commands: {}", e);
                std::process::exit(1);
            }
        }
    }
}
