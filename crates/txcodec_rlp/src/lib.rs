//! Schema-less view of RLP-encoded data.
//!
//! Transaction layouts are told apart by list arity and element widths, so a
//! decoder needs the whole nested structure before it can pick a shape.
//! [`RlpItem`] provides that structure on top of `alloy-rlp` headers.

use alloy_rlp::{BufMut, Decodable, Encodable, Header, PayloadView};
use txcodec_primitives::{Bytes, U256, ruint::UintTryFrom};

/// Maximum list nesting accepted while decoding.
pub const MAX_DEPTH: usize = 16;

/// A decoded RLP item: either a byte string or a list of items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RlpItem {
    /// Byte string
    String(Bytes),
    /// Ordered list of nested items
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Creates an empty list.
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Creates a byte string item.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self::String(bytes.into())
    }

    /// Creates a byte string item holding the minimal big-endian encoding of
    /// an unsigned integer. Zero is encoded as the empty string.
    pub fn uint<T>(value: T) -> Self
    where
        U256: UintTryFrom<T>,
    {
        Self::String(U256::from(value).to_be_bytes_trimmed_vec().into())
    }

    /// Returns the byte string, if this item is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::String(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    /// Returns the list elements, if this item is a list.
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            Self::String(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// Whether this item is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Decodes exactly one item from `bytes`. Trailing bytes are rejected.
    pub fn decode_exact(bytes: &[u8]) -> alloy_rlp::Result<Self> {
        let mut buf = bytes;
        let item = Self::decode(&mut buf)?;

        if buf.is_empty() {
            Ok(item)
        } else {
            Err(alloy_rlp::Error::UnexpectedLength)
        }
    }

    fn decode_nested(buf: &mut &[u8], depth: usize) -> alloy_rlp::Result<Self> {
        if depth > MAX_DEPTH {
            return Err(alloy_rlp::Error::Custom("maximum RLP nesting depth exceeded"));
        }

        match Header::decode_raw(buf)? {
            PayloadView::String(bytes) => Ok(Self::String(Bytes::copy_from_slice(bytes))),
            PayloadView::List(raw_items) => raw_items
                .into_iter()
                .map(|mut raw_item| Self::decode_nested(&mut raw_item, depth + 1))
                .collect::<alloy_rlp::Result<Vec<_>>>()
                .map(Self::List),
        }
    }
}

fn list_payload_length(items: &[RlpItem]) -> usize {
    items.iter().map(Encodable::length).sum()
}

impl Decodable for RlpItem {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::decode_nested(buf, 0)
    }
}

impl Encodable for RlpItem {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::String(bytes) => <[u8] as Encodable>::encode(bytes, out),
            Self::List(items) => {
                Header {
                    list: true,
                    payload_length: list_payload_length(items),
                }
                .encode(out);

                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::String(bytes) => <[u8] as Encodable>::length(bytes),
            Self::List(items) => {
                let payload_length = list_payload_length(items);
                payload_length + alloy_rlp::length_of_length(payload_length)
            }
        }
    }
}

impl From<Bytes> for RlpItem {
    fn from(bytes: Bytes) -> Self {
        Self::String(bytes)
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        Self::List(items)
    }
}
