use k256::{
    FieldBytes,
    ecdsa::{
        RecoveryId, Signature as ECDSASignature, SigningKey, VerifyingKey,
        signature::hazmat::PrehashSigner,
    },
};
use txcodec_primitives::{Address, B256};

use crate::{SecretKey, SignatureError, public_key_to_address};

/// An ECDSA signature over secp256k1 together with the recovery ID (0 or 1)
/// needed to recover the signer's public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// Recovery ID
    pub recovery_id: u8,
    /// R value
    pub r: B256,
    /// S value
    pub s: B256,
}

impl RecoverableSignature {
    /// Recovers the address which signed `message_hash`.
    pub fn recover(&self, message_hash: &B256) -> Result<Address, SignatureError> {
        recover_address(message_hash, self.recovery_id, &self.r, &self.s)
    }

    /// Verifies that the signature on `message_hash` was produced by
    /// `address`.
    pub fn verify(&self, message_hash: &B256, address: Address) -> Result<(), SignatureError> {
        let recovered = self.recover(message_hash)?;
        if recovered != address {
            return Err(SignatureError::VerificationError(address, recovered));
        }

        Ok(())
    }
}

/// Signs a 32-byte message hash with the provided secret key.
pub fn sign_hash(
    message_hash: &B256,
    secret_key: &SecretKey,
) -> Result<RecoverableSignature, SignatureError> {
    let signing_key: SigningKey = secret_key.into();
    let (signature, recovery_id) = PrehashSigner::<(ECDSASignature, RecoveryId)>::sign_prehash(
        &signing_key,
        message_hash.as_slice(),
    )
    .map_err(SignatureError::ECDSAError)?;

    let r = B256::from_slice(Into::<FieldBytes>::into(signature.r()).as_slice());
    let s = B256::from_slice(Into::<FieldBytes>::into(signature.s()).as_slice());

    Ok(RecoverableSignature {
        recovery_id: recovery_id.to_byte(),
        r,
        s,
    })
}

/// Recovers the address that produced the signature `(r, s)` over
/// `message_hash`.
pub fn recover_address(
    message_hash: &B256,
    recovery_id: u8,
    r: &B256,
    s: &B256,
) -> Result<Address, SignatureError> {
    let recovery_id = RecoveryId::try_from(recovery_id).map_err(SignatureError::ECDSAError)?;

    let mut bytes = [0u8; 64];
    let (r_bytes, s_bytes) = bytes.split_at_mut(32);
    r_bytes.copy_from_slice(r.as_slice());
    s_bytes.copy_from_slice(s.as_slice());
    let signature = ECDSASignature::from_slice(&bytes).map_err(SignatureError::ECDSAError)?;

    let verifying_key =
        VerifyingKey::recover_from_prehash(message_hash.as_slice(), &signature, recovery_id)
            .map_err(SignatureError::ECDSAError)?;

    Ok(public_key_to_address(verifying_key.into()))
}
