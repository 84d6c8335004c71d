use txcodec_primitives::{Bytes, TxKind, U256};
use txcodec_rlp::RlpItem;
use txcodec_signer::SignatureData;

use crate::{
    DecodeError, TransactionType,
    access_list::{AccessListItem, access_list_item, decode_access_list},
    fields::{Fields, kind_item},
    signature,
};

/// An EIP-2930 transaction with an access list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Eip2930 {
    // The order of these fields determines encoding order.
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
    pub access_list: Vec<AccessListItem>,
}

impl Eip2930 {
    /// The type identifier for an EIP-2930 transaction.
    pub const TYPE: u8 = 1;

    /// Number of list elements of an unsigned EIP-2930 transaction.
    pub const UNSIGNED_FIELD_COUNT: usize = 8;

    pub(crate) fn decode_fields(
        items: &[RlpItem],
    ) -> Result<(Self, Option<SignatureData>), DecodeError> {
        let signed = signature::is_signed(
            TransactionType::Eip2930,
            Self::UNSIGNED_FIELD_COUNT,
            items.len(),
        )?;

        let mut fields = Fields::new(items);
        let transaction = Self {
            chain_id: fields.uint("chain_id")?,
            nonce: fields.uint("nonce")?,
            gas_price: fields.uint("gas_price")?,
            gas_limit: fields.uint("gas_limit")?,
            kind: fields.kind("to")?,
            value: fields.u256("value")?,
            input: fields.data("input")?,
            access_list: decode_access_list(fields.list("access_list")?)?,
        };

        let signature = signed
            .then(|| signature::decode_typed(&mut fields))
            .transpose()?;

        Ok((transaction, signature))
    }

    pub(crate) fn rlp_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(self.chain_id),
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(self.gas_limit),
            kind_item(&self.kind),
            RlpItem::uint(self.value),
            RlpItem::bytes(self.input.clone()),
            access_list_item(&self.access_list),
        ]
    }
}
