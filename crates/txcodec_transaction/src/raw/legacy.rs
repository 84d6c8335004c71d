use txcodec_primitives::{Bytes, TxKind, U256};
use txcodec_rlp::RlpItem;
use txcodec_signer::SignatureData;

use crate::{
    DecodeError,
    fields::{Fields, kind_item},
    signature,
};

/// A legacy transaction, optionally replay protected through EIP-155.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Legacy {
    // The order of these fields determines encoding order.
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
}

impl Legacy {
    /// Number of list elements of an unsigned legacy transaction.
    pub const UNSIGNED_FIELD_COUNT: usize = 6;

    /// Width of the trailing marker that identifies a private ("restricted")
    /// transaction.
    pub const PRIVATE_MARKER_LENGTH: usize = 10;

    /// Decodes the elements of a legacy transaction list.
    ///
    /// A list with 8 or 9 elements whose last element is a byte string of
    /// [`Self::PRIVATE_MARKER_LENGTH`] bytes is a private transaction
    /// extension and is decoded as unsigned. This is a best-effort
    /// disambiguation, not a protocol rule: a 9-element list whose `s`
    /// happens to be 10 bytes wide is also treated as unsigned.
    pub(crate) fn decode_fields(
        items: &[RlpItem],
    ) -> Result<(Self, Option<SignatureData>), DecodeError> {
        let signed = match items.len() {
            Self::UNSIGNED_FIELD_COUNT => false,
            8 | 9 if is_private_marker(items.last()) => {
                log::debug!(
                    "Decoding {}-element legacy transaction as unsigned private transaction",
                    items.len()
                );
                false
            }
            9 => true,
            actual => {
                return Err(DecodeError::MalformedInput(format!(
                    "Legacy transaction has {actual} fields, expected 6 or 9"
                )));
            }
        };

        let mut fields = Fields::new(items);
        let transaction = Self {
            nonce: fields.uint("nonce")?,
            gas_price: fields.uint("gas_price")?,
            gas_limit: fields.uint("gas_limit")?,
            kind: fields.kind("to")?,
            value: fields.u256("value")?,
            input: fields.data("input")?,
        };

        let signature = if signed {
            Some(signature::decode_legacy(&mut fields)?)
        } else {
            None
        };

        Ok((transaction, signature))
    }

    pub(crate) fn rlp_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(self.gas_limit),
            kind_item(&self.kind),
            RlpItem::uint(self.value),
            RlpItem::bytes(self.input.clone()),
        ]
    }

    /// Encodes the transaction; the signature's `v` is written verbatim.
    pub(crate) fn encode(&self, signature: Option<&SignatureData>) -> Bytes {
        let mut fields = self.rlp_fields();
        if let Some(signature) = signature {
            fields.extend(signature::legacy_items(signature));
        }

        alloy_rlp::encode(RlpItem::List(fields)).into()
    }

    /// The bytes that are hashed for signing, including the EIP-155 fields
    /// when a chain ID is provided.
    pub(crate) fn signing_payload(&self, chain_id: Option<u64>) -> Bytes {
        let mut fields = self.rlp_fields();
        if let Some(chain_id) = chain_id {
            fields.extend([
                RlpItem::uint(chain_id),
                RlpItem::uint(0u64),
                RlpItem::uint(0u64),
            ]);
        }

        alloy_rlp::encode(RlpItem::List(fields)).into()
    }
}

fn is_private_marker(item: Option<&RlpItem>) -> bool {
    item.and_then(RlpItem::as_bytes)
        .is_some_and(|marker| marker.len() == Legacy::PRIVATE_MARKER_LENGTH)
}
