//! Writes a synthetic price-list export for manual `plx` runs.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_sample -p plx-tests -- sample.bin 500
//! plx stats sample.bin
//! ```
//!
//! Every seventh record carries an unknown flag.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plx_tests::fixture::synthetic_export;

#[derive(Parser)]
#[command(name = "generate_sample", about = "Write a synthetic PLX export")]
struct Args {
    /// Output file.
    #[arg(default_value = "sample.bin")]
    path: PathBuf,

    /// Number of records to generate.
    #[arg(default_value_t = 100)]
    records: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bytes = synthetic_export(args.records);
    std::fs::write(&args.path, &bytes)
        .with_context(|| format!("cannot write {}", args.path.display()))?;

    println!(
        "Wrote {} records ({} bytes) to {}",
        args.records,
        bytes.len(),
        args.path.display()
    );
    Ok(())
}
