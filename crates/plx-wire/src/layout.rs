use std::fmt;
use std::ops::Range;

use crate::error::WireError;
use crate::header::{PREAMBLE_SIZE, RecordFlag};

/// The name always starts right after the name-length byte.
pub const NAME_OFFSET: usize = PREAMBLE_SIZE;

/// Width of the reserved gap some layouts place after the name.
pub const RESERVED_GAP: usize = 4;

/// Price: u32 little-endian, in cents.
pub const PRICE_SIZE: usize = 4;

/// Discount code: two raw bytes.
pub const DISCOUNT_SIZE: usize = 2;

/// Layout class selected by a record's flag word.
///
/// Classification compares the whole flag against the known values; the
/// price bit only matters afterwards, inside [`FieldLayout::for_record`].
///
/// ```text
/// ┌────────────────┬────────────────────────────┬────────────────────────────────────────┐
/// │ Flag           │ Class                      │ Fields after the name                  │
/// ├────────────────┼────────────────────────────┼────────────────────────────────────────┤
/// │ 0xF001         │ NameOptionalPriceDiscount  │ 4 reserved, [price], discount          │
/// │ 0xB001, 0xB401 │ NamePriceDiscount          │ price, discount                        │
/// │ 0xA001         │ NameDiscountOnly           │ price, discount | 4 reserved, discount │
/// │ anything else  │ Unmatched                  │ none, record is skipped                │
/// └────────────────┴────────────────────────────┴────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutClass {
    NamePriceDiscount,
    NameDiscountOnly,
    NameOptionalPriceDiscount,
    Unmatched,
}

impl LayoutClass {
    /// Classify a flag word. First match wins.
    pub fn classify(flag: RecordFlag) -> Self {
        match flag {
            RecordFlag::F001 => Self::NameOptionalPriceDiscount,
            RecordFlag::B001 | RecordFlag::B401 => Self::NamePriceDiscount,
            RecordFlag::A001 => Self::NameDiscountOnly,
            _ => Self::Unmatched,
        }
    }

    /// Short label used by `inspect` and the log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::NamePriceDiscount => "name+price+discount",
            Self::NameDiscountOnly => "name+discount",
            Self::NameOptionalPriceDiscount => "name+reserved+price?+discount",
            Self::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for LayoutClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Byte ranges of a record's fields, relative to the record's first byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: Range<usize>,
    pub price: Option<Range<usize>>,
    pub discount: Range<usize>,
}

impl FieldLayout {
    /// Derive the field layout for a record of the given class.
    ///
    /// Returns `None` for [`LayoutClass::Unmatched`]; such records have no
    /// fields to extract.
    pub fn for_record(class: LayoutClass, flag: RecordFlag, name_len: u8) -> Option<Self> {
        let name = NAME_OFFSET..NAME_OFFSET + usize::from(name_len);

        let (gap, with_price) = match class {
            LayoutClass::NameOptionalPriceDiscount => (RESERVED_GAP, flag.has_price()),
            LayoutClass::NamePriceDiscount => (0, true),
            // The reserved gap stands in for the price slot when the price
            // bit is clear.
            LayoutClass::NameDiscountOnly if flag.has_price() => (0, true),
            LayoutClass::NameDiscountOnly => (RESERVED_GAP, false),
            LayoutClass::Unmatched => return None,
        };

        let mut cursor = name.end + gap;
        let price = with_price.then(|| {
            let range = cursor..cursor + PRICE_SIZE;
            cursor = range.end;
            range
        });
        let discount = cursor..cursor + DISCOUNT_SIZE;

        Some(Self {
            name,
            price,
            discount,
        })
    }

    /// One past the last byte any field touches.
    pub fn end(&self) -> usize {
        self.discount.end
    }

    /// Slice the fields out of `record`, which starts at the record's
    /// first header byte and may extend to the end of the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::FieldOutOfBounds`] for the first field whose
    /// range does not fit inside `record`.
    pub fn extract<'a>(&self, record: &'a [u8]) -> Result<RawFields<'a>, WireError> {
        let name = slice_field(record, "name", &self.name)?;

        let price = self
            .price
            .as_ref()
            .map(|range| slice_field(record, "price", range))
            .transpose()?;
        let discount = slice_field(record, "discount", &self.discount)?;

        Ok(RawFields {
            name,
            price,
            discount,
        })
    }
}

fn slice_field<'a>(
    record: &'a [u8],
    field: &'static str,
    range: &Range<usize>,
) -> Result<&'a [u8], WireError> {
    record
        .get(range.clone())
        .ok_or(WireError::FieldOutOfBounds {
            field,
            end: range.end,
            available: record.len(),
        })
}

/// Undecoded field bytes borrowed from the export buffer.
///
/// Slices produced by [`FieldLayout::extract`] are always
/// [`PRICE_SIZE`] and [`DISCOUNT_SIZE`] bytes wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub name: &'a [u8],
    pub price: Option<&'a [u8]>,
    pub discount: &'a [u8],
}
