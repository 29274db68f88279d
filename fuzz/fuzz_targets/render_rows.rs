#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use plx_driver::{render_records, WriterConfig};
use plx_types::{DecodedRecord, Price};

#[derive(Debug, Arbitrary)]
struct Row {
    name: String,
    discount: String,
    cents: Option<u32>,
}

// Fuzz target: delimited rendering.
//
// Every row ends in the terminator and quoted fields are balanced, so the
// output has exactly one unquoted terminator per row plus the header.
fuzz_target!(|rows: Vec<Row>| {
    let records: Vec<DecodedRecord> = rows
        .into_iter()
        .map(|row| DecodedRecord {
            name: row.name,
            discount_code: row.discount,
            price: row.cents.map(Price::from_cents),
        })
        .collect();

    let out = render_records(&records, WriterConfig::default()).unwrap();

    let mut in_quotes = false;
    let mut line_ends = 0;
    let bytes = out.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes && i > 0 && bytes[i - 1] == b'\r' => line_ends += 1,
            _ => {}
        }
    }
    assert!(!in_quotes);
    assert_eq!(line_ends, records.len() + 1);
});
