use std::fmt;

use plx_wire::layout::DISCOUNT_SIZE;
use plx_wire::{RawFields, RecordFlag};
use serde::Serialize;

use crate::error::TypeError;
use crate::price::Price;
use crate::text::{decode_discount, decode_name};

/// One price-list row decoded from a record with a known layout.
///
/// `price` is `None` only for layouts whose price bit is clear. Every flag
/// value seen in real exports carries the bit, but writers still have to
/// decide what an absent price looks like.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecodedRecord {
    pub name: String,
    #[serde(rename = "discount")]
    pub discount_code: String,
    pub price: Option<Price>,
}

impl DecodedRecord {
    /// Decode the raw field bytes of one record.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::FieldWidth`] if the price or discount slice has
    /// the wrong width. Slices cut by `FieldLayout::extract` never do.
    pub fn try_from_fields(fields: &RawFields<'_>) -> Result<Self, TypeError> {
        if fields.discount.len() != DISCOUNT_SIZE {
            return Err(TypeError::FieldWidth {
                field: "discount",
                expected: DISCOUNT_SIZE,
                actual: fields.discount.len(),
            });
        }

        Ok(Self {
            name: decode_name(fields.name),
            discount_code: decode_discount(fields.discount),
            price: fields.price.map(Price::from_le_slice).transpose()?,
        })
    }
}

/// A flag value with no known layout.
///
/// Not an error: the record is skipped, its length is honoured, and the
/// flag is collected for the end-of-run report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnmatchedFlag(pub RecordFlag);

impl UnmatchedFlag {
    pub fn raw(self) -> u16 {
        self.0.raw()
    }
}

impl From<u16> for UnmatchedFlag {
    fn from(raw: u16) -> Self {
        Self(RecordFlag::from_raw(raw))
    }
}

impl fmt::Display for UnmatchedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for UnmatchedFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
