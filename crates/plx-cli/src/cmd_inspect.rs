/// Implementation of `plx inspect`.
///
/// Scans record boundaries with [`RecordIndex`] and prints one line per
/// record: its offset, size, flag and layout class, followed by the decoded
/// fields or the reason they could not be read.
///
/// # Output format
///
/// ```text
/// File: export.bin (48 bytes), 3 records
/// Record 0 @ 0x0000: 14 bytes, flag=0xB001 [name+price+discount]
///          name="Bolt" discount="A" price=12.50
/// Record 1 @ 0x000e: 6 bytes, flag=0x1234 [unmatched]
/// Record 2 @ 0x0014: 28 bytes, flag=0xF001 [name+reserved+price?+discount]
///          name="Washer M8" discount="" price=0.35
/// ---
/// End of buffer at offset 48
/// ```
use std::fs;

use anyhow::{Context, Result};
use plx_decoder::{RecordEvent, RecordIndex, RecordSpan, decode_span};

use crate::InspectArgs;

/// Run the `plx inspect` command.
///
/// Record-level decode errors are printed inline rather than returned.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    let index = RecordIndex::scan(&bytes);
    let count = index.spans.len();
    println!(
        "File: {} ({} bytes), {count} record{}",
        args.input.display(),
        bytes.len(),
        if count == 1 { "" } else { "s" }
    );

    for (idx, span) in index.spans.iter().enumerate() {
        if let Some(target) = args.record
            && idx != target
        {
            continue;
        }

        println!(
            "Record {idx} @ {:#06x}: {} bytes, flag={} [{}]",
            span.offset,
            span.size(),
            span.header.flag,
            span.class()
        );

        match decode_span(&bytes, span) {
            Ok(RecordEvent::Decoded { record, .. }) => {
                let price = record
                    .price
                    .map_or_else(|| "-".to_string(), |p| p.to_string());
                println!(
                    "         name={:?} discount={:?} price={price}",
                    record.name, record.discount_code
                );
            }
            Ok(RecordEvent::Unmatched { .. }) => {}
            Err(e) => println!("         error: {e}"),
        }

        if args.show_hex {
            for line in hex_dump(record_bytes(&bytes, span)) {
                println!("           {line}");
            }
        }
    }

    println!("---");
    match &index.tail {
        Some(e) => println!("Stopped: {e}"),
        None => println!("End of buffer at offset {}", index.bytes_indexed()),
    }

    Ok(())
}

fn record_bytes<'a>(buf: &'a [u8], span: &RecordSpan) -> &'a [u8] {
    &buf[span.offset..span.offset + span.size()]
}

/// 16 bytes per line: relative offset, hex pairs, printable ASCII.
fn hex_dump(raw: &[u8]) -> Vec<String> {
    raw.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut pairs = String::with_capacity(chunk.len() * 3);
            for pair in hex::encode(chunk).as_bytes().chunks(2) {
                if !pairs.is_empty() {
                    pairs.push(' ');
                }
                pairs.push_str(&String::from_utf8_lossy(pair));
            }
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                .collect();
            format!("{:04x}  {pairs:<47}  {ascii}", i * 16)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_lines() {
        let raw: Vec<u8> = (0..20u8).map(|b| b + b'A').collect();
        let lines = hex_dump(&raw);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000  41 42 43"));
        assert!(lines[0].ends_with("ABCDEFGHIJKLMNOP"));
        assert!(lines[1].starts_with("0010  51 52 53 54 "));
        assert!(lines[1].ends_with("QRST"));
    }

    #[test]
    fn hex_dump_masks_unprintable() {
        let lines = hex_dump(&[0x00, b'O', b'K', 0xFF]);
        assert_eq!(lines, vec![format!("0000  {:<47}  .OK.", "00 4f 4b ff")]);
    }
}
