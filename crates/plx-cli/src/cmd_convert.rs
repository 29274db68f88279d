/// Implementation of `plx convert`.
///
/// Reads an export into memory, walks it with a [`RecordStream`] reporting
/// through [`TracingSink`], and writes each decoded record as one
/// delimited row. Unmatched and failed records produce no row; they show
/// up in the log.
///
/// # Example output
///
/// ```text
/// name;discount;price
/// Bolt M8;A;12.50
/// Washer;;0.35
/// ```
use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use plx_decoder::{RecordEvent, RecordStream, TracingSink};
use plx_driver::{DelimitedWriter, WriteStats, WriterConfig};
use tracing::info;

use crate::ConvertArgs;

/// Run the `plx convert` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the output cannot be
/// created or written, the delimiter is unusable, or a price-less record
/// is met under `--missing-price fail`.
pub fn run(args: &ConvertArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    convert(&bytes, out, args)?;
    Ok(())
}

/// Decode `bytes` and write the delimited rows to `out`.
fn convert<W: Write>(bytes: &[u8], out: W, args: &ConvertArgs) -> Result<WriteStats> {
    let config = WriterConfig {
        delimiter: args.delimiter,
        write_header: !args.no_header,
        missing_price: args.missing_price.into(),
        ..WriterConfig::default()
    };
    let mut writer = DelimitedWriter::new(out, config)?;

    let mut stream = RecordStream::with_sink(bytes, TracingSink);
    if let Some(max) = args.max_records {
        stream = stream.stop_when(move |progress| progress.records_seen >= max);
    }

    for event in stream.by_ref() {
        // Unmatched flags and record errors are already reported by the sink.
        if let Ok(RecordEvent::Decoded { offset, record, .. }) = event {
            writer
                .write_record(&record)
                .with_context(|| format!("cannot write record at offset {offset}"))?;
        }
    }

    let summary = stream.finish();
    let stats = writer.finish().context("cannot flush output")?;

    info!(
        rows = stats.rows_written,
        skipped = stats.rows_skipped,
        unmatched = summary.records_unmatched,
        failed = summary.records_failed,
        consumed = summary.bytes_consumed,
        total = summary.total_bytes,
        "conversion finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use plx_driver::{DriverError, MissingPrice};

    use super::*;
    use crate::MissingPriceArg;

    const B001: [u8; 14] = [
        0x0C, 0x00, 0x01, 0xB0, 0x02, b'N', b'M', 0x88, 0x13, 0x00, 0x00, b'O', b'K', 0x00,
    ];
    const UNKNOWN: [u8; 6] = [0x04, 0x00, 0x34, 0x12, 0x00, 0x00];

    fn args() -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from("in.bin"),
            output: None,
            delimiter: ';',
            no_header: false,
            missing_price: MissingPriceArg::Empty,
            max_records: None,
        }
    }

    fn sample() -> Vec<u8> {
        [&B001[..], &UNKNOWN, &B001, &[0x01, 0x00]].concat()
    }

    #[test]
    fn writes_rows_for_decoded_records_only() {
        let mut out = Vec::new();
        let stats = convert(&sample(), &mut out, &args()).unwrap();
        assert_eq!(stats.rows_written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name;discount;price\r\nNM;OK;50.00\r\nNM;OK;50.00\r\n"
        );
    }

    #[test]
    fn flags_reach_the_writer() {
        let args = ConvertArgs {
            delimiter: ',',
            no_header: true,
            ..args()
        };
        let mut out = Vec::new();
        convert(&B001, &mut out, &args).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "NM,OK,50.00\r\n");
        assert_eq!(MissingPrice::from(MissingPriceArg::Fail), MissingPrice::Fail);
    }

    #[test]
    fn max_records_counts_unmatched_too() {
        let args = ConvertArgs {
            max_records: Some(2),
            no_header: true,
            ..args()
        };
        let mut out = Vec::new();
        let stats = convert(&sample(), &mut out, &args).unwrap();
        assert_eq!(stats.rows_written, 1);
    }

    #[test]
    fn bad_delimiter_is_an_error() {
        let args = ConvertArgs {
            delimiter: '\n',
            ..args()
        };
        let err = convert(&B001, Vec::new(), &args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DriverError>(),
            Some(DriverError::InvalidDelimiter('\n'))
        ));
    }

    #[test]
    fn run_writes_output_file() {
        let dir = std::env::temp_dir().join(format!("plx-convert-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.bin");
        let output = dir.join("out.csv");
        std::fs::write(&input, sample()).unwrap();

        let args = ConvertArgs {
            input,
            output: Some(output.clone()),
            ..args()
        };
        run(&args).unwrap();
        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(csv.lines().count(), 3);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn run_reports_missing_input() {
        let args = ConvertArgs {
            input: PathBuf::from("/nonexistent/plx/in.bin"),
            ..args()
        };
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").starts_with("cannot read /nonexistent/plx/in.bin"));
    }
}
