#![no_main]

use libfuzzer_sys::fuzz_target;
use plx_wire::header::PREAMBLE_SIZE;
use plx_wire::RecordHeader;

// Fuzz target: RecordHeader::read_from.
//
// Any input of at least five bytes must parse, and the record size is
// always the length field plus two.
fuzz_target!(|data: &[u8]| {
    match RecordHeader::read_from(data) {
        Ok(header) => {
            assert!(data.len() >= PREAMBLE_SIZE);
            assert_eq!(header.record_size(), usize::from(header.length) + 2);
        }
        Err(_) => assert!(data.len() < PREAMBLE_SIZE),
    }
});
