/// Subscriber setup for the `plx` binary.
///
/// Library crates only emit events; this is the one place a subscriber is
/// installed. Output goes to stderr so converted rows can be piped from
/// stdout.
///
/// ```text
/// ┌──────────────┬──────────────────────────┐
/// │ Flags        │ Default filter           │
/// ├──────────────┼──────────────────────────┤
/// │ -q           │ error                    │
/// │ (none)       │ warn                     │
/// │ -v           │ info                     │
/// │ -vv          │ debug                    │
/// │ -vvv or more │ trace                    │
/// └──────────────┴──────────────────────────┘
/// ```
///
/// A set `PLX_LOG` replaces the default filter entirely.
use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "PLX_LOG";

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global stderr subscriber.
///
/// # Errors
///
/// Returns an error if `PLX_LOG` holds an invalid directive or a global
/// subscriber is already set.
pub fn init(verbose: u8, quiet: bool) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {LOG_ENV} value {directives:?}"))?,
        Err(_) => EnvFilter::default().add_directive(level_for(verbose, quiet).into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("cannot install log subscriber")
}
