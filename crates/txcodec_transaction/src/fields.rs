//! Conversions between RLP byte strings and fixed-width transaction fields.

use txcodec_primitives::{Address, B256, Bytes, TxKind, U256};
use txcodec_rlp::RlpItem;

use crate::DecodeError;

/// Strips leading zero bytes, yielding the canonical RLP representation of
/// an unsigned integer.
pub fn trim_leading_zeroes(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(bytes.len());

    bytes.split_at(start).1
}

/// Parses a big-endian unsigned integer. The empty byte string is zero.
pub fn big_int_from(field: &'static str, bytes: &[u8]) -> Result<U256, DecodeError> {
    let trimmed = trim_leading_zeroes(bytes);

    U256::try_from_be_slice(trimmed).ok_or(DecodeError::FieldTooWide {
        field,
        max: 32,
        actual: trimmed.len(),
    })
}

/// Parses a big-endian unsigned integer that must fit in `T`.
pub fn uint_from<T: TryFrom<U256>>(field: &'static str, bytes: &[u8]) -> Result<T, DecodeError> {
    let value = big_int_from(field, bytes)?;

    T::try_from(value).map_err(|_error| DecodeError::FieldTooWide {
        field,
        max: std::mem::size_of::<T>(),
        actual: trim_leading_zeroes(bytes).len(),
    })
}

/// Left-pads an integer's bytes with zeroes to exactly 32 bytes.
pub fn pad_to_32(field: &'static str, bytes: &[u8]) -> Result<B256, DecodeError> {
    let trimmed = trim_leading_zeroes(bytes);
    if trimmed.len() > 32 {
        return Err(DecodeError::FieldTooWide {
            field,
            max: 32,
            actual: trimmed.len(),
        });
    }

    Ok(B256::left_padding_from(trimmed))
}

fn check_width(
    field: &'static str,
    bytes: &[u8],
    width: usize,
    expected: &'static str,
) -> Result<(), DecodeError> {
    match bytes.len().cmp(&width) {
        std::cmp::Ordering::Equal => Ok(()),
        std::cmp::Ordering::Less => Err(DecodeError::SchemaViolation { field, expected }),
        std::cmp::Ordering::Greater => Err(DecodeError::FieldTooWide {
            field,
            max: width,
            actual: bytes.len(),
        }),
    }
}

/// Parses a 20-byte address.
pub fn address_from(field: &'static str, bytes: &[u8]) -> Result<Address, DecodeError> {
    check_width(field, bytes, 20, "a 20-byte address")?;

    Ok(Address::from_slice(bytes))
}

/// Parses a 32-byte hash or storage key.
pub fn b256_from(field: &'static str, bytes: &[u8]) -> Result<B256, DecodeError> {
    check_width(field, bytes, 32, "a 32-byte value")?;

    Ok(B256::from_slice(bytes))
}

/// Parses a recipient. The empty byte string denotes contract creation.
pub fn kind_from(field: &'static str, bytes: &[u8]) -> Result<TxKind, DecodeError> {
    if bytes.is_empty() {
        Ok(TxKind::Create)
    } else {
        address_from(field, bytes).map(TxKind::Call)
    }
}

/// Returns the byte string held by `item`.
pub(crate) fn string_item<'item>(
    field: &'static str,
    item: &'item RlpItem,
) -> Result<&'item Bytes, DecodeError> {
    item.as_bytes().ok_or(DecodeError::SchemaViolation {
        field,
        expected: "a byte string",
    })
}

/// Checks that a byte string has exactly `width` bytes.
pub(crate) fn fixed_width<'bytes>(
    field: &'static str,
    bytes: &'bytes [u8],
    width: usize,
    expected: &'static str,
) -> Result<&'bytes [u8], DecodeError> {
    check_width(field, bytes, width, expected)?;

    Ok(bytes)
}

/// Encodes a recipient; contract creation is the empty byte string.
pub(crate) fn kind_item(kind: &TxKind) -> RlpItem {
    match kind {
        TxKind::Create => RlpItem::bytes(Bytes::new()),
        TxKind::Call(address) => RlpItem::bytes(address.to_vec()),
    }
}

/// Encodes a 32-byte value without trimming.
pub(crate) fn b256_item(value: &B256) -> RlpItem {
    RlpItem::bytes(value.to_vec())
}

/// Encodes a fixed-width integer, such as a signature's `r` or `s`, as a
/// minimal byte string.
pub(crate) fn trimmed_item(value: &B256) -> RlpItem {
    RlpItem::bytes(trim_leading_zeroes(value.as_slice()).to_vec())
}

/// Positional reader over the elements of a decoded RLP list.
pub(crate) struct Fields<'items> {
    items: std::slice::Iter<'items, RlpItem>,
}

impl<'items> Fields<'items> {
    pub fn new(items: &'items [RlpItem]) -> Self {
        Self {
            items: items.iter(),
        }
    }

    fn next_item(&mut self, field: &'static str) -> Result<&'items RlpItem, DecodeError> {
        self.items
            .next()
            .ok_or_else(|| DecodeError::MalformedInput(format!("missing field `{field}`")))
    }

    pub fn bytes(&mut self, field: &'static str) -> Result<&'items Bytes, DecodeError> {
        string_item(field, self.next_item(field)?)
    }

    pub fn list(&mut self, field: &'static str) -> Result<&'items [RlpItem], DecodeError> {
        self.next_item(field)?
            .as_list()
            .ok_or(DecodeError::SchemaViolation {
                field,
                expected: "a list",
            })
    }

    pub fn uint<T: TryFrom<U256>>(&mut self, field: &'static str) -> Result<T, DecodeError> {
        uint_from(field, self.bytes(field)?)
    }

    pub fn u256(&mut self, field: &'static str) -> Result<U256, DecodeError> {
        big_int_from(field, self.bytes(field)?)
    }

    pub fn address(&mut self, field: &'static str) -> Result<Address, DecodeError> {
        address_from(field, self.bytes(field)?)
    }

    pub fn kind(&mut self, field: &'static str) -> Result<TxKind, DecodeError> {
        kind_from(field, self.bytes(field)?)
    }

    pub fn padded(&mut self, field: &'static str) -> Result<B256, DecodeError> {
        pad_to_32(field, self.bytes(field)?)
    }

    pub fn data(&mut self, field: &'static str) -> Result<Bytes, DecodeError> {
        self.bytes(field).cloned()
    }
}
