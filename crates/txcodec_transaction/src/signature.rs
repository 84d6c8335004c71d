//! Signature triples at the end of a transaction's field list.

use txcodec_primitives::U256;
use txcodec_rlp::RlpItem;
use txcodec_signer::{SignatureData, recovery_id_from_v, v_from_y_parity};

use crate::{
    DecodeError, EncodeError, TransactionType,
    fields::{Fields, big_int_from, trimmed_item},
};

/// Number of list elements a signature adds to an unsigned transaction.
pub(crate) const SIGNATURE_FIELD_COUNT: usize = 3;

/// Determines from the list arity whether a typed transaction carries a
/// signature.
pub(crate) fn is_signed(
    transaction_type: TransactionType,
    unsigned_field_count: usize,
    actual: usize,
) -> Result<bool, DecodeError> {
    if actual == unsigned_field_count {
        Ok(false)
    } else if actual == unsigned_field_count + SIGNATURE_FIELD_COUNT {
        Ok(true)
    } else {
        Err(DecodeError::MalformedInput(format!(
            "{transaction_type:?} transaction has {actual} fields, expected {unsigned_field_count} or {}",
            unsigned_field_count + SIGNATURE_FIELD_COUNT
        )))
    }
}

/// Reads a legacy signature. The recovery indicator is kept verbatim.
pub(crate) fn decode_legacy(fields: &mut Fields<'_>) -> Result<SignatureData, DecodeError> {
    let v = fields.data("v")?;
    let r = fields.padded("r")?;
    let s = fields.padded("s")?;

    Ok(SignatureData::new(v, r, s))
}

/// Reads a typed transaction's signature, mapping its Y-parity to the
/// in-memory recovery indicator.
pub(crate) fn decode_typed(fields: &mut Fields<'_>) -> Result<SignatureData, DecodeError> {
    let y_parity = big_int_from("y_parity", fields.bytes("y_parity")?)?;
    if y_parity > U256::from(1u64) {
        return Err(DecodeError::SchemaViolation {
            field: "y_parity",
            expected: "0 or 1",
        });
    }

    let r = fields.padded("r")?;
    let s = fields.padded("s")?;

    Ok(SignatureData::new(
        v_from_y_parity(y_parity == U256::from(1u64)),
        r,
        s,
    ))
}

/// Encodes a legacy signature: `v` verbatim, `r` and `s` without leading
/// zeroes.
pub(crate) fn legacy_items(signature: &SignatureData) -> [RlpItem; SIGNATURE_FIELD_COUNT] {
    [
        RlpItem::bytes(signature.v.clone()),
        trimmed_item(&signature.r),
        trimmed_item(&signature.s),
    ]
}

/// Encodes a typed transaction's signature. The Y-parity is derived from
/// the stored recovery indicator and the transaction's chain ID.
pub(crate) fn typed_items(
    signature: &SignatureData,
    chain_id: u64,
) -> Result<[RlpItem; SIGNATURE_FIELD_COUNT], EncodeError> {
    let y_parity = recovery_id_from_v(&signature.v, chain_id)?;

    Ok([
        RlpItem::uint(y_parity),
        trimmed_item(&signature.r),
        trimmed_item(&signature.s),
    ])
}
