//! Zoetrope CLI - terminal trace player
//!
//! # Commands
//! - `zoetrope list` - show every available runner
//! - `zoetrope play <algorithm>` - generate the canonical trace and reveal
//!   it step by step in the terminal
//! - `zoetrope battle <a> <b>` - race two sorting runners on one clock

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Notify;
use zoetrope_kit::prelude::*;

/// Zoetrope trace player
#[derive(Parser)]
#[command(name = "zoetrope")]
#[command(author, version, about = "Replay classic algorithms as step traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available runners
    List,

    /// Play one runner's trace on its canonical input
    Play {
        /// Runner id, e.g. bubble-sort (see `zoetrope list`)
        algorithm: String,

        /// Playback pacing
        #[arg(short, long, value_enum, default_value_t = SpeedArg::Fast)]
        speed: SpeedArg,

        /// Dump the full trace as JSON instead of playing it
        #[arg(long)]
        json: bool,
    },

    /// Race two sorting runners on one shared clock
    Battle {
        /// Left contender, e.g. bubble-sort
        a: String,

        /// Right contender, e.g. quick-sort
        b: String,

        /// Starting arrangement of the generated array
        #[arg(long, value_enum, default_value_t = ShapeArg::Random)]
        shape: ShapeArg,

        /// Array length
        #[arg(long, default_value_t = 20)]
        size: usize,

        /// Seed for reproducible input generation
        #[arg(long)]
        seed: Option<u64>,

        /// Battle pacing
        #[arg(short, long, value_enum, default_value_t = SpeedArg::Fast)]
        speed: SpeedArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpeedArg {
    Slow,
    Normal,
    Fast,
}

impl From<SpeedArg> for Speed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => Speed::Slow,
            SpeedArg::Normal => Speed::Normal,
            SpeedArg::Fast => Speed::Fast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    Random,
    Sorted,
    Reverse,
    NearlySorted,
}

impl From<ShapeArg> for ArrayShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Random => ArrayShape::Random,
            ShapeArg::Sorted => ArrayShape::Sorted,
            ShapeArg::Reverse => ArrayShape::Reverse,
            ShapeArg::NearlySorted => ArrayShape::NearlySorted,
        }
    }
}

const RUNNERS: &[(&str, &str)] = &[
    ("bubble-sort", "Bubble Sort (sorting)"),
    ("selection-sort", "Selection Sort (sorting)"),
    ("insertion-sort", "Insertion Sort (sorting)"),
    ("merge-sort", "Merge Sort (sorting)"),
    ("quick-sort", "Quick Sort, Lomuto partition (sorting)"),
    ("binary-search", "Binary Search (searching)"),
    ("linear-search", "Linear Search (searching)"),
    ("bfs", "Breadth-First Search (graph)"),
    ("dfs", "Depth-First Search (graph)"),
    ("n-queens", "N-Queens (backtracking)"),
    ("sudoku", "Sudoku Solver (backtracking)"),
    ("rat-maze", "Rat in a Maze (backtracking)"),
    ("knight-tour", "Knight's Tour, Warnsdorff order (backtracking)"),
    ("fibonacci", "Fibonacci (dynamic programming)"),
    ("knapsack", "0/1 Knapsack (dynamic programming)"),
    ("lcs", "Longest Common Subsequence (dynamic programming)"),
    ("bellman-ford", "Bellman-Ford shortest paths (greedy/other)"),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List => {
            for (id, blurb) in RUNNERS {
                println!("{id:<16} {blurb}");
            }
            Ok(())
        }
        Commands::Play {
            algorithm,
            speed,
            json,
        } => dispatch_play(&algorithm, speed.into(), json).await,
        Commands::Battle {
            a,
            b,
            shape,
            size,
            seed,
            speed,
        } => battle(&a, &b, shape.into(), size, seed, speed.into()).await,
    }
}

async fn dispatch_play(algorithm: &str, speed: Speed, json: bool) -> Result<()> {
    match algorithm {
        "bubble-sort" => play(BubbleSortRunner, speed, json).await,
        "selection-sort" => play(SelectionSortRunner, speed, json).await,
        "insertion-sort" => play(InsertionSortRunner, speed, json).await,
        "merge-sort" => play(MergeSortRunner, speed, json).await,
        "quick-sort" => play(QuickSortRunner, speed, json).await,
        "binary-search" => play(BinarySearchRunner, speed, json).await,
        "linear-search" => play(LinearSearchRunner, speed, json).await,
        "bfs" => play(BfsRunner, speed, json).await,
        "dfs" => play(DfsRunner, speed, json).await,
        "n-queens" => play(NQueensRunner, speed, json).await,
        "sudoku" => play(SudokuRunner, speed, json).await,
        "rat-maze" => play(RatMazeRunner, speed, json).await,
        "knight-tour" => play(KnightTourRunner, speed, json).await,
        "fibonacci" => play(FibonacciRunner, speed, json).await,
        "knapsack" => play(Knapsack01Runner, speed, json).await,
        "lcs" => play(LcsRunner, speed, json).await,
        "bellman-ford" => play(BellmanFordRunner, speed, json).await,
        other => bail!("unknown runner '{other}'; try `zoetrope list`"),
    }
}

async fn play<R: Runner>(runner: R, speed: Speed, json: bool) -> Result<()> {
    let input = runner.initial_input();
    runner.validate(&input)?;
    let trace = runner.generate(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    println!("{} steps recorded; playing...", trace.len());
    let engine = PlaybackEngine::new(trace, Arc::new(TokioScheduler::new()));
    engine.set_speed(speed);

    let done = Arc::new(Notify::new());
    {
        let trace = engine.trace();
        let done = Arc::clone(&done);
        engine.subscribe(move |event| match event {
            EngineEvent::StepRevealed { index } => {
                if let Some(step) = trace.get(*index) {
                    match &step.description {
                        Some(text) => println!("[{index:>5}] {text}"),
                        None => println!("[{index:>5}] {}", step.kind()),
                    }
                }
            }
            EngineEvent::StateChanged {
                state: ExecutionState::Completed,
            } => done.notify_one(),
            _ => {}
        });
    }

    engine.run();
    done.notified().await;
    println!("done ({} log lines)", engine.logs().len());
    Ok(())
}

fn sorting_trace(algorithm: &str, input: &SortingInput) -> Result<Trace<SortPayload>> {
    let trace = match algorithm {
        "bubble-sort" => BubbleSortRunner.generate(input),
        "selection-sort" => SelectionSortRunner.generate(input),
        "insertion-sort" => InsertionSortRunner.generate(input),
        "merge-sort" => MergeSortRunner.generate(input),
        "quick-sort" => QuickSortRunner.generate(input),
        other => bail!("'{other}' is not a sorting runner; battles race sorts"),
    };
    Ok(trace)
}

async fn battle(
    a: &str,
    b: &str,
    shape: ArrayShape,
    size: usize,
    seed: Option<u64>,
    speed: Speed,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let input = battle_array(&mut rng, shape, size);
    BubbleSortRunner.validate(&input)?;

    let trace_a = sorting_trace(a, &input)?;
    let trace_b = sorting_trace(b, &input)?;
    println!("{a}: {} steps vs {b}: {} steps", trace_a.len(), trace_b.len());

    let engine = BattleEngine::new(trace_a, trace_b, Arc::new(TokioScheduler::new()));
    engine.set_speed(speed);

    let done = Arc::new(Notify::new());
    {
        let done = Arc::clone(&done);
        engine.subscribe(move |event| {
            if let BattleEvent::Finished { .. } = event {
                done.notify_one();
            }
        });
    }

    engine.run();
    done.notified().await;

    match engine.winner() {
        Some(Winner::A) => println!("winner: {a} (fewer steps)"),
        Some(Winner::B) => println!("winner: {b} (fewer steps)"),
        Some(Winner::Tie) => println!("tie: equal step counts"),
        None => println!("battle did not finish"),
    }
    Ok(())
}
