/// Implementation of `plx stats`.
///
/// Decodes the whole export and prints how many records each flag value
/// produced, which flags had no layout, and where and why decoding
/// stopped.
///
/// # Example output
///
/// ```text
/// File:     export.bin  (4096 bytes)
/// Consumed: 4096 bytes  (end_of_buffer)
///
/// Flag      Layout                            Records
/// ────────────────────────────────────────────────────
/// 0xA001    name+discount                          12
/// 0xB001    name+price+discount                   140
/// 0x1234    unmatched                               3
/// ────────────────────────────────────────────────────
/// Decoded 152, unmatched 3, failed 0
/// Unmatched flags: 0x1234
/// ```
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use anyhow::{Context, Result};
use plx_decoder::{DecodeError, NullSink, RecordEvent, RecordStream, StopReason};
use plx_driver::render_unmatched;
use plx_types::UnmatchedFlag;
use plx_wire::{LayoutClass, RecordFlag};
use serde::Serialize;

use crate::StatsArgs;

/// Per-flag record count.
#[derive(Debug, Serialize)]
struct FlagCount {
    flag: String,
    layout: &'static str,
    records: usize,
}

/// Everything `plx stats` reports, in the shape `--json` emits.
#[derive(Debug, Serialize)]
struct StatsReport {
    file: String,
    total_bytes: usize,
    bytes_consumed: usize,
    stop: StopReason,
    records_decoded: usize,
    records_unmatched: usize,
    records_failed: usize,
    flags: Vec<FlagCount>,
    unmatched_flags: BTreeSet<UnmatchedFlag>,
}

/// Run the `plx stats` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the JSON report cannot
/// be serialised.
pub fn run(args: &StatsArgs) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    let report = build_report(&args.input.display().to_string(), &bytes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File:     {}  ({} bytes)", report.file, report.total_bytes);
    println!("Consumed: {} bytes  ({})", report.bytes_consumed, report.stop);
    println!();

    let sep = "─".repeat(52);
    println!("{:<10}{:<34}{:>8}", "Flag", "Layout", "Records");
    println!("{sep}");
    for row in &report.flags {
        println!("{:<10}{:<34}{:>8}", row.flag, row.layout, row.records);
    }
    println!("{sep}");
    println!(
        "Decoded {}, unmatched {}, failed {}",
        report.records_decoded, report.records_unmatched, report.records_failed
    );
    println!("Unmatched flags: {}", render_unmatched(&report.unmatched_flags));

    Ok(())
}

fn build_report(file: &str, bytes: &[u8]) -> StatsReport {
    let mut per_flag: BTreeMap<RecordFlag, usize> = BTreeMap::new();
    let mut stream = RecordStream::with_sink(bytes, NullSink);

    for event in stream.by_ref() {
        let flag = match event {
            Ok(RecordEvent::Decoded { flag, .. }) => flag,
            Ok(RecordEvent::Unmatched { flag, .. }) => flag.0,
            Err(DecodeError::FieldExtraction { flag, .. }) => flag,
            Err(_) => continue,
        };
        *per_flag.entry(flag).or_default() += 1;
    }
    let summary = stream.finish();

    let flags = per_flag
        .into_iter()
        .map(|(flag, records)| FlagCount {
            flag: flag.to_string(),
            layout: LayoutClass::classify(flag).label(),
            records,
        })
        .collect();

    StatsReport {
        file: file.to_string(),
        total_bytes: summary.total_bytes,
        bytes_consumed: summary.bytes_consumed,
        stop: summary.stop,
        records_decoded: summary.records_decoded,
        records_unmatched: summary.records_unmatched,
        records_failed: summary.records_failed,
        flags,
        unmatched_flags: summary.unmatched_flags,
    }
}
