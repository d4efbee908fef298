//! fastats: window statistics over sorted BED/BedGraph input.
//!
//! Usage: fastats <COMMAND> [OPTIONS]

use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use fastats::bed::{BedError, BedReader};
use fastats::commands::autocorr::{DEFAULT_AUTOCORR_SIZE, DEFAULT_AUTOCORR_STEP, DEFAULT_LAG};
use fastats::commands::{AutoCorrCommand, MeanWinCommand, SortCommand, WinAvgCommand, WinSumCommand};
use fastats::config::{WindowConfig, DEFAULT_WINDOW_SIZE, DEFAULT_WINDOW_STEP};
use fastats::streaming::buffers::DEFAULT_INPUT_BUFFER;

#[derive(Parser)]
#[command(name = "fastats")]
#[command(version)]
#[command(about = "Streaming window statistics over sorted genomic intervals", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print command statistics to stderr
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WindowArgs {
    /// Input BED file (use - for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Window size in base pairs
    #[arg(short = 'w', long = "size", default_value_t = DEFAULT_WINDOW_SIZE)]
    size: u64,

    /// Window step in base pairs
    #[arg(short = 's', long = "step", default_value_t = DEFAULT_WINDOW_STEP)]
    step: u64,

    /// Input is already sorted (streamed with inline validation instead of
    /// sorted in memory)
    #[arg(long)]
    sorted: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean value per covered base pair in each window (NaN values ignored)
    MeanWin {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Arithmetic mean of the BedGraph values overlapping each window
    AvgWin {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Sum of the BedGraph values overlapping each window
    SumWin {
        #[command(flatten)]
        window: WindowArgs,

        /// Divide each sum by the window size
        #[arg(short = 'b', long)]
        per_bp: bool,
    },

    /// Lag autocorrelations of per-base values in each window
    Autocorr {
        /// Input BED file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Highest lag; coefficients for lags 1..=LAG are written in order
        #[arg(short = 'l', long, default_value_t = DEFAULT_LAG)]
        lag: usize,

        /// Window size in base pairs
        #[arg(short = 'w', long = "size", default_value_t = DEFAULT_AUTOCORR_SIZE)]
        size: u64,

        /// Window step in base pairs
        #[arg(short = 's', long = "step", default_value_t = DEFAULT_AUTOCORR_STEP)]
        step: u64,

        /// Value column, 0 = first column after end
        #[arg(short = 'c', long, default_value_t = 0)]
        column: usize,

        /// Input is already sorted
        #[arg(long)]
        sorted: bool,
    },

    /// Sort a BED file by chromosome, start and end
    Sort {
        /// Input BED file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::MeanWin { window } => run_mean_win(window, cli.stats),
        Commands::AvgWin { window } => run_avg_win(window, cli.stats),
        Commands::SumWin { window, per_bp } => run_sum_win(window, per_bp, cli.stats),
        Commands::Autocorr {
            input,
            lag,
            size,
            step,
            column,
            sorted,
        } => run_autocorr(input, lag, size, step, column, sorted, cli.stats),
        Commands::Sort { input, reverse } => run_sort(input, reverse, cli.stats),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_input(input: Option<PathBuf>) -> Result<BedReader<Box<dyn Read>>, BedError> {
    let source: Box<dyn Read> = match input {
        Some(path) if path.to_string_lossy() != "-" => Box::new(File::open(&path)?),
        _ => Box::new(io::stdin().lock()),
    };
    Ok(BedReader::with_capacity(source, DEFAULT_INPUT_BUFFER))
}

fn run_mean_win(args: WindowArgs, stats: bool) -> Result<(), BedError> {
    let config = WindowConfig::new(args.size, args.step)?;
    let cmd = MeanWinCommand::new(config).with_sorted(args.sorted);
    let result = cmd.run(open_input(args.input)?, &mut io::stdout().lock())?;
    if stats {
        eprintln!("Mean-win stats: {}", result);
    }
    Ok(())
}

fn run_avg_win(args: WindowArgs, stats: bool) -> Result<(), BedError> {
    let config = WindowConfig::new(args.size, args.step)?;
    let cmd = WinAvgCommand::new(config).with_sorted(args.sorted);
    let result = cmd.run(open_input(args.input)?, &mut io::stdout().lock())?;
    if stats {
        eprintln!("Avg-win stats: {}", result);
    }
    Ok(())
}

fn run_sum_win(args: WindowArgs, per_bp: bool, stats: bool) -> Result<(), BedError> {
    let config = WindowConfig::new(args.size, args.step)?;
    let cmd = WinSumCommand::new(config)
        .with_per_bp(per_bp)
        .with_sorted(args.sorted);
    let result = cmd.run(open_input(args.input)?, &mut io::stdout().lock())?;
    if stats {
        eprintln!("Sum-win stats: {}", result);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_autocorr(
    input: Option<PathBuf>,
    lag: usize,
    size: u64,
    step: u64,
    column: usize,
    sorted: bool,
    stats: bool,
) -> Result<(), BedError> {
    let config = WindowConfig::new(size, step)?;
    let cmd = AutoCorrCommand::new(config, lag)
        .with_column(column)
        .with_sorted(sorted);
    let result = cmd.run(open_input(input)?, &mut io::stdout().lock())?;
    if stats {
        eprintln!("Autocorr stats: {}", result);
    }
    Ok(())
}

fn run_sort(input: Option<PathBuf>, reverse: bool, stats: bool) -> Result<(), BedError> {
    let cmd = SortCommand { reverse };
    let result = cmd.run(open_input(input)?, &mut io::stdout().lock())?;
    if stats {
        eprintln!("Sort stats: {}", result);
    }
    Ok(())
}
