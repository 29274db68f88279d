/// PLX command-line tool: convert, inspect and summarise legacy price-list
/// exports.
///
/// # Command overview
///
/// ```text
/// plx <COMMAND> [OPTIONS]
///
/// Commands:
///   convert    Decode an export and write `name;discount;price` rows
///   inspect    Print one line per record with its layout and fields
///   stats      Print record counts, unmatched flags and stop reason
///   help       Print help information
///
/// Global options:
///   -v, --verbose    More log output (repeat for debug, trace)
///   -q, --quiet      Log errors only
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// Logs go to stderr. `PLX_LOG` overrides the level flags with an
/// `EnvFilter` directive such as `plx_decoder=debug`.
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, bad option, write error) |
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use plx_driver::MissingPrice;

mod cmd_convert;
mod cmd_inspect;
mod cmd_stats;
mod logging;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decoder for legacy price-list binary exports.
#[derive(Parser)]
#[command(name = "plx", version, about = "Price-list export decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode an export and write its rows as delimited text.
    Convert(ConvertArgs),
    /// Print a per-record listing of an export.
    Inspect(InspectArgs),
    /// Print decoding statistics for an export.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `plx convert`.
///
/// ```text
/// ┌─────────────────┬────────────────────────────────────────────────┐
/// │ Flag            │ Effect                                         │
/// ├─────────────────┼────────────────────────────────────────────────┤
/// │ -o / --output   │ Write rows to this file instead of stdout      │
/// │ --delimiter C   │ Field separator (default `;`)                  │
/// │ --no-header     │ Omit the `name;discount;price` row             │
/// │ --missing-price │ empty (default) | skip | fail                  │
/// │ --max-records N │ Stop after N records, whatever their outcome   │
/// └─────────────────┴────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Path to the binary export.
    pub input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field separator.
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Do not write the header row.
    #[arg(long)]
    pub no_header: bool,

    /// What to write for records that carry no price.
    #[arg(long, value_enum, default_value_t = MissingPriceArg::Empty)]
    pub missing_price: MissingPriceArg,

    /// Stop after this many records (decoded, unmatched or failed).
    #[arg(long)]
    pub max_records: Option<usize>,
}

/// Command-line spelling of [`MissingPrice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MissingPriceArg {
    Empty,
    Skip,
    Fail,
}

impl From<MissingPriceArg> for MissingPrice {
    fn from(arg: MissingPriceArg) -> Self {
        match arg {
            MissingPriceArg::Empty => Self::Empty,
            MissingPriceArg::Skip => Self::Skip,
            MissingPriceArg::Fail => Self::Fail,
        }
    }
}

/// Arguments for `plx inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the binary export.
    pub input: PathBuf,

    /// Show only the record at this zero-based index.
    #[arg(long)]
    pub record: Option<usize>,

    /// Include a hex dump of each record (16 bytes per line).
    #[arg(long)]
    pub show_hex: bool,
}

/// Arguments for `plx stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the binary export.
    pub input: PathBuf,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Convert(args) => cmd_convert::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
