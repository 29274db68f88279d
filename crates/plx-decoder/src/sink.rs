use plx_types::{DecodedRecord, UnmatchedFlag};
use plx_wire::RecordFlag;
use tracing::{debug, error, info, warn};

use crate::error::DecodeError;
use crate::stream::DecodeSummary;

/// Receives the events of one decoding pass.
///
/// A sink is handed to [`RecordStream::with_sink`](crate::RecordStream::with_sink)
/// and lives as long as that pass. All methods default to doing nothing,
/// so implementations only override what they report.
///
/// ```text
///   record_decoded  ── once per record with a known layout
///   flag_unmatched  ── once per record with an unknown flag
///   record_failed   ── once per record-level error
///   finished        ── once, when the pass is closed
/// ```
pub trait DecodeSink {
    /// `raw` holds the record's `length + 2` bytes starting at its header.
    fn record_decoded(
        &mut self,
        _offset: usize,
        _flag: RecordFlag,
        _raw: &[u8],
        _record: &DecodedRecord,
    ) {
    }

    /// `first_seen` is true the first time this flag value appears in
    /// the pass.
    fn flag_unmatched(&mut self, _offset: usize, _flag: UnmatchedFlag, _first_seen: bool) {}

    fn record_failed(&mut self, _error: &DecodeError) {}

    fn finished(&mut self, _summary: &DecodeSummary) {}
}

impl<S: DecodeSink + ?Sized> DecodeSink for &mut S {
    fn record_decoded(
        &mut self,
        offset: usize,
        flag: RecordFlag,
        raw: &[u8],
        record: &DecodedRecord,
    ) {
        (**self).record_decoded(offset, flag, raw, record);
    }

    fn flag_unmatched(&mut self, offset: usize, flag: UnmatchedFlag, first_seen: bool) {
        (**self).flag_unmatched(offset, flag, first_seen);
    }

    fn record_failed(&mut self, error: &DecodeError) {
        (**self).record_failed(error);
    }

    fn finished(&mut self, summary: &DecodeSummary) {
        (**self).finished(summary);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DecodeSink for NullSink {}

/// Reports events through `tracing`.
///
/// ```text
/// ┌────────────────┬───────┬──────────────────────────────────────────┐
/// │ Event          │ Level │ Fields                                   │
/// ├────────────────┼───────┼──────────────────────────────────────────┤
/// │ record_decoded │ debug │ offset, raw (hex)                        │
/// │                │ info  │ offset, flag, name, discount, price      │
/// │ flag_unmatched │ debug │ offset, flag, first_seen                 │
/// │ record_failed  │ warn  │ offset, error (error level if fatal)     │
/// │ finished       │ warn  │ unmatched flag list, when non-empty      │
/// │                │ debug │ counters                                 │
/// └────────────────┴───────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DecodeSink for TracingSink {
    fn record_decoded(
        &mut self,
        offset: usize,
        flag: RecordFlag,
        raw: &[u8],
        record: &DecodedRecord,
    ) {
        debug!(offset, raw = %hex::encode(raw), "record bytes");
        let price = record.price.map(|p| p.to_string());
        info!(
            offset,
            %flag,
            name = %record.name,
            discount = %record.discount_code,
            price = price.as_deref().unwrap_or("-"),
            "decoded record"
        );
    }

    fn flag_unmatched(&mut self, offset: usize, flag: UnmatchedFlag, first_seen: bool) {
        debug!(offset, %flag, first_seen, "unmatched flag");
    }

    fn record_failed(&mut self, error: &DecodeError) {
        if error.ends_stream() {
            error!(offset = error.offset(), %error, "stopping at unreadable record");
        } else {
            warn!(offset = error.offset(), %error, "skipping record");
        }
    }

    fn finished(&mut self, summary: &DecodeSummary) {
        if !summary.unmatched_flags.is_empty() {
            let flags: Vec<String> = summary
                .unmatched_flags
                .iter()
                .map(ToString::to_string)
                .collect();
            warn!(flags = %flags.join(", "), "all unmatched flags");
        }
        debug!(
            decoded = summary.records_decoded,
            unmatched = summary.records_unmatched,
            failed = summary.records_failed,
            consumed = summary.bytes_consumed,
            total = summary.total_bytes,
            stop = ?summary.stop,
            "decode finished"
        );
    }
}
