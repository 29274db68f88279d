#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use plx_types::DecodedRecord;
use plx_wire::{FieldLayout, LayoutClass, RecordFlag};

#[derive(Debug, Arbitrary)]
struct Input {
    flag: u16,
    name_len: u8,
    record: Vec<u8>,
}

// Fuzz target: layout derivation, field extraction and typing.
//
// Extracted slices always have the layout's widths, so typing them never
// fails.
fuzz_target!(|input: Input| {
    let flag = RecordFlag::from_raw(input.flag);
    let class = LayoutClass::classify(flag);
    let Some(layout) = FieldLayout::for_record(class, flag, input.name_len) else {
        assert!(!flag.is_known());
        return;
    };

    match layout.extract(&input.record) {
        Ok(fields) => {
            assert!(layout.end() <= input.record.len());
            assert_eq!(fields.name.len(), usize::from(input.name_len));
            DecodedRecord::try_from_fields(&fields).unwrap();
        }
        Err(_) => assert!(layout.end() > input.record.len()),
    }
});
