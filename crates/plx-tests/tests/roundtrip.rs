//! Property tests: exports built from generated records decode back to the
//! same rows, and arbitrary bytes never break the stream's bookkeeping.

use std::collections::BTreeSet;

use plx_decoder::{ExportDecoder, RecordIndex, StopReason};
use plx_tests::fixture::ExportBuilder;
use plx_types::{Price, UnmatchedFlag};
use plx_wire::RecordFlag;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Item {
    Known {
        flag: RecordFlag,
        name: String,
        cents: u32,
        discount: [u8; 2],
    },
    Unknown {
        flag: u16,
        body_len: usize,
    },
}

fn known_flag() -> impl Strategy<Value = RecordFlag> {
    prop::sample::select(RecordFlag::KNOWN.to_vec())
}

fn discount_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        4 => prop::char::range('A', 'Z').prop_map(|c| c as u8),
        1 => Just(b' '),
        1 => Just(b'\r'),
        1 => Just(b'\n'),
    ]
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        4 => (known_flag(), "[A-Za-z0-9 ]{0,40}", any::<u32>(), [discount_byte(), discount_byte()])
            .prop_map(|(flag, name, cents, discount)| Item::Known { flag, name, cents, discount }),
        1 => (any::<u16>().prop_filter("unknown flag", |f| !RecordFlag::from_raw(*f).is_known()), 1..32usize)
            .prop_map(|(flag, body_len)| Item::Unknown { flag, body_len }),
    ]
}

fn build(items: &[Item]) -> Vec<u8> {
    items
        .iter()
        .fold(ExportBuilder::new(), |builder, item| match item {
            Item::Known { flag, name, cents, discount } => builder.record(*flag, name, *cents, discount),
            Item::Unknown { flag, body_len } => builder.unmatched(*flag, *body_len),
        })
        .build()
}

fn cleaned(discount: [u8; 2]) -> String {
    discount
        .iter()
        .filter(|b| !matches!(b, b' ' | b'\r' | b'\n'))
        .map(|&b| b as char)
        .collect()
}

proptest! {
    #[test]
    fn known_layouts_roundtrip(items in prop::collection::vec(item(), 0..40)) {
        let buf = build(&items);
        let decoded = ExportDecoder::decode(&buf);

        prop_assert!(decoded.failures.is_empty());
        prop_assert_eq!(decoded.summary.bytes_consumed, buf.len());
        prop_assert_eq!(decoded.summary.stop, StopReason::EndOfBuffer);

        let expected: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                Item::Known { flag, name, cents, discount } => {
                    Some((*flag, name.clone(), cleaned(*discount), Some(Price::from_cents(*cents))))
                }
                Item::Unknown { .. } => None,
            })
            .collect();
        let actual: Vec<_> = decoded
            .records
            .iter()
            .map(|r| (r.flag, r.record.name.clone(), r.record.discount_code.clone(), r.record.price))
            .collect();
        prop_assert_eq!(actual, expected);

        let unknown: BTreeSet<_> = items
            .iter()
            .filter_map(|item| match item {
                Item::Unknown { flag, .. } => Some(UnmatchedFlag::from(*flag)),
                Item::Known { .. } => None,
            })
            .collect();
        prop_assert_eq!(decoded.summary.unmatched_flags, unknown);
    }

    #[test]
    fn arbitrary_bytes_keep_counters_consistent(buf in prop::collection::vec(any::<u8>(), 0..512)) {
        let decoded = ExportDecoder::decode(&buf);
        let summary = &decoded.summary;

        prop_assert!(summary.bytes_consumed <= buf.len());
        prop_assert_eq!(summary.total_bytes, buf.len());
        prop_assert_eq!(summary.records_decoded, decoded.records.len());
        prop_assert_eq!(summary.records_failed, decoded.failures.len());
        prop_assert!(decoded.failures.iter().filter(|e| e.ends_stream()).count() <= 1);

        if summary.stop == StopReason::EndOfBuffer {
            prop_assert_eq!(summary.bytes_consumed, buf.len());
        } else {
            prop_assert!(summary.bytes_consumed < buf.len());
        }
    }

    #[test]
    fn index_agrees_with_stream(buf in prop::collection::vec(any::<u8>(), 0..512)) {
        let index = RecordIndex::scan(&buf);
        let decoded = ExportDecoder::decode(&buf);

        prop_assert_eq!(index.bytes_indexed(), decoded.summary.bytes_consumed);
        prop_assert_eq!(
            index.tail.as_ref(),
            decoded.failures.last().filter(|e| e.ends_stream())
        );
    }
}
