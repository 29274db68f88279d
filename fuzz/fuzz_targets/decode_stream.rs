#![no_main]

use libfuzzer_sys::fuzz_target;
use plx_decoder::{ExportDecoder, RecordIndex, StopReason};

// Fuzz target: whole-buffer decoding.
//
// Catches bugs in:
// - Cursor arithmetic on huge declared lengths
// - Field ranges past the buffer end
// - Counter drift between the stream, its summary and the index
fuzz_target!(|data: &[u8]| {
    let decoded = ExportDecoder::decode(data);
    let summary = &decoded.summary;

    assert!(summary.bytes_consumed <= data.len());
    assert_eq!(summary.records_decoded, decoded.records.len());
    assert_eq!(summary.records_failed, decoded.failures.len());
    if summary.stop == StopReason::EndOfBuffer {
        assert_eq!(summary.bytes_consumed, data.len());
    }

    let index = RecordIndex::scan(data);
    assert_eq!(index.bytes_indexed(), summary.bytes_consumed);
});
