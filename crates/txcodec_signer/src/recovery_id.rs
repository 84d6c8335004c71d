//! Conversions between recovery IDs, Y-parities and `v` recovery indicators.

use txcodec_primitives::{Bytes, U256};

use crate::SignatureError;

/// `v` of a signature without replay protection and an even Y coordinate.
pub const LOWER_REAL_V: u8 = 27;
/// Offset added to `2 * chain_id` in EIP-155 recovery indicators.
pub const CHAIN_ID_INC: u64 = 35;
/// Smallest recovery indicator treated as EIP-155 replay protected when
/// deriving a Y-parity.
pub const REPLAY_PROTECTED_V_MIN: u64 = 37;

/// Converts a recovery ID (0 or 1) into the in-memory recovery indicator
/// (27 or 28).
pub fn v_from_recovery_id(recovery_id: u8) -> Bytes {
    Bytes::from(vec![LOWER_REAL_V.wrapping_add(recovery_id)])
}

/// Converts the Y-parity of a typed transaction's signature into the same
/// in-memory recovery indicator used for legacy transactions.
pub fn v_from_y_parity(y_parity: bool) -> Bytes {
    v_from_recovery_id(u8::from(y_parity))
}

/// Computes the EIP-155 recovery indicator `recovery_id + 2 * chain_id + 35`.
pub fn eip155_v(recovery_id: u8, chain_id: u64) -> Bytes {
    let v = U256::from(chain_id) * U256::from(2u64)
        + U256::from(CHAIN_ID_INC)
        + U256::from(recovery_id);

    v.to_be_bytes_trimmed_vec().into()
}

/// Derives the Y-parity to encode for a typed transaction from a stored
/// recovery indicator.
///
/// Indicators 27 and 28 map to 0 and 1. Indicators of at least
/// [`REPLAY_PROTECTED_V_MIN`] are treated as EIP-155 values for `chain_id`,
/// yielding `v - 2 * chain_id - 35`. The result therefore depends on
/// `chain_id`, although the Y-parity of a typed transaction does not.
pub fn recovery_id_from_v(v: &[u8], chain_id: u64) -> Result<u64, SignatureError> {
    let unsupported = || SignatureError::UnsupportedRecoveryIndicator(Bytes::copy_from_slice(v));

    let v_value = U256::try_from_be_slice(v).ok_or_else(unsupported)?;
    let lower_real_v = U256::from(LOWER_REAL_V);

    let recovery_id = if v_value == lower_real_v || v_value == lower_real_v + U256::from(1u64) {
        v_value - lower_real_v
    } else if v_value >= U256::from(REPLAY_PROTECTED_V_MIN) {
        v_value
            .checked_sub(U256::from(chain_id) * U256::from(2u64) + U256::from(CHAIN_ID_INC))
            .ok_or_else(unsupported)?
    } else {
        return Err(unsupported());
    };

    u64::try_from(recovery_id).map_err(|_error| unsupported())
}

/// Derives the recovery ID used for public key recovery from a legacy
/// recovery indicator, which is either 27/28 or an EIP-155 value.
pub fn recovery_id_from_legacy_v(v: &[u8]) -> Result<u8, SignatureError> {
    let unsupported = || SignatureError::UnsupportedRecoveryIndicator(Bytes::copy_from_slice(v));

    let v_value = U256::try_from_be_slice(v).ok_or_else(unsupported)?;
    let lower_real_v = U256::from(LOWER_REAL_V);

    if v_value == lower_real_v || v_value == lower_real_v + U256::from(1u64) {
        Ok(u8::from(v_value != lower_real_v))
    } else if v_value >= U256::from(CHAIN_ID_INC) {
        Ok(u8::from((v_value - U256::from(CHAIN_ID_INC)).bit(0)))
    } else {
        Err(unsupported())
    }
}

/// The chain ID of an EIP-155 recovery indicator: `(v - 35) / 2`.
pub fn chain_id_from_v(v: &[u8]) -> Option<u64> {
    let v_value = U256::try_from_be_slice(v)?;
    let chain_id_inc = U256::from(CHAIN_ID_INC);

    if v_value < chain_id_inc {
        return None;
    }

    u64::try_from((v_value - chain_id_inc) / U256::from(2u64)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_parity_maps_to_lower_real_v() {
        assert_eq!(v_from_y_parity(false), Bytes::from(vec![27u8]));
        assert_eq!(v_from_y_parity(true), Bytes::from(vec![28u8]));
    }

    #[test]
    fn recovery_id_from_lower_real_v() -> anyhow::Result<()> {
        assert_eq!(recovery_id_from_v(&[27], 1)?, 0);
        assert_eq!(recovery_id_from_v(&[28], 1)?, 1);

        Ok(())
    }

    #[test]
    fn recovery_id_from_v_depends_on_chain_id() -> anyhow::Result<()> {
        // Chain 4, recovery ID 0
        assert_eq!(recovery_id_from_v(&[43], 4)?, 0);
        // The same indicator is misread for another chain.
        assert_eq!(recovery_id_from_v(&[43], 3)?, 2);
        assert!(recovery_id_from_v(&[43], 5).is_err());

        Ok(())
    }

    #[test]
    fn raw_parity_is_not_a_recovery_indicator() {
        assert!(recovery_id_from_v(&[0], 1).is_err());
        assert!(recovery_id_from_v(&[1], 1).is_err());
        assert!(recovery_id_from_v(&[36], 0).is_err());
    }

    #[test]
    fn eip155_round_trip() -> anyhow::Result<()> {
        let v = eip155_v(1, 1337);
        assert_eq!(U256::try_from_be_slice(&v), Some(U256::from(2710u64)));

        assert_eq!(chain_id_from_v(&v), Some(1337));
        assert_eq!(recovery_id_from_legacy_v(&v)?, 1);
        assert_eq!(recovery_id_from_v(&v, 1337)?, 1);

        Ok(())
    }

    #[test]
    fn chain_id_is_absent_without_replay_protection() {
        assert_eq!(chain_id_from_v(&[27]), None);
        assert_eq!(chain_id_from_v(&[28]), None);
    }
}
