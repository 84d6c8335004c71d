// Part of this code was adapted from ethers-rs and is distributed under their
// licenss:
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-APACHE
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-MIT
// For the original context see: https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/ethers-core/src/types/signature.rs

//! Ethereum signature types

mod ecdsa;
mod recovery_id;

pub use k256::SecretKey;
use k256::{FieldBytes, PublicKey, elliptic_curve::sec1::ToEncodedPoint};
use sha3::{Digest, Keccak256};
use txcodec_primitives::{Address, B256, Bytes, U256, hex};

pub use self::{
    ecdsa::{RecoverableSignature, recover_address, sign_hash},
    recovery_id::{
        CHAIN_ID_INC, LOWER_REAL_V, REPLAY_PROTECTED_V_MIN, chain_id_from_v, eip155_v,
        recovery_id_from_legacy_v, recovery_id_from_v, v_from_recovery_id, v_from_y_parity,
    },
};

/// An error involving a signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The recovery indicator cannot be mapped to a recovery ID.
    #[error("Unsupported recovery indicator: 0x{}", hex::encode(.0))]
    UnsupportedRecoveryIndicator(Bytes),
    /// Invalid secret key.
    #[error("Expected 32 byte secret key")]
    InvalidSecretKeyLength,
    /// When parsing a secret key from string to hex
    #[error(transparent)]
    DecodingError(#[from] hex::FromHexError),
    /// Thrown when signature verification failed (i.e. when the address that
    /// produced the signature did not match the expected address)
    #[error("Signature verification failed. Expected {0}, got {1}")]
    VerificationError(Address, Address),
    /// ECDSA error
    #[error(transparent)]
    ECDSAError(#[from] k256::ecdsa::signature::Error),
    /// Elliptic curve error
    #[error(transparent)]
    EllipticCurveError(#[from] k256::elliptic_curve::Error),
}

/// The signature attached to a transaction.
///
/// `v` is the recovery indicator exactly as it is held in memory: the
/// EIP-155 composite value or 27/28 for legacy transactions, and 27/28 for
/// typed transactions (see [`v_from_y_parity`]). `r` and `s` are always
/// 32 bytes wide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureData {
    /// Recovery indicator
    pub v: Bytes,
    /// R value
    pub r: B256,
    /// S value
    pub s: B256,
}

impl SignatureData {
    /// Constructs a new instance.
    pub fn new(v: impl Into<Bytes>, r: B256, s: B256) -> Self {
        Self { v: v.into(), r, s }
    }

    /// The recovery indicator as an integer, if it fits 256 bits.
    pub fn v_value(&self) -> Option<U256> {
        U256::try_from_be_slice(&self.v)
    }

    /// The chain ID encoded in an EIP-155 recovery indicator, if any.
    pub fn chain_id(&self) -> Option<u64> {
        chain_id_from_v(&self.v)
    }
}

/// Converts a [`PublicKey`] to an [`Address`].
pub fn public_key_to_address(public_key: PublicKey) -> Address {
    let public_key = public_key.to_encoded_point(/* compress = */ false);
    // First byte is header value
    let public_key = public_key
        .as_bytes()
        .get(1..)
        .expect("uncompressed public key is 65 bytes");
    let hash = Keccak256::digest(public_key);
    // Only take the lower 160 bits of the hash
    Address::from_slice(hash.get(12..).expect("hash is 32 bytes"))
}

/// Converts a hex string to a secret key.
pub fn secret_key_from_str(secret_key: &str) -> Result<SecretKey, SignatureError> {
    let secret_key = hex::decode(secret_key.strip_prefix("0x").unwrap_or(secret_key))?;
    let secret_key = FieldBytes::from_exact_iter(secret_key)
        .ok_or(SignatureError::InvalidSecretKeyLength)?;

    SecretKey::from_bytes(&secret_key).map_err(SignatureError::EllipticCurveError)
}
