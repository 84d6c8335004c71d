use txcodec_primitives::{Address, B256, Bytes, keccak256};
use txcodec_signer::{
    SignatureData, SignatureError, recover_address, recovery_id_from_legacy_v, recovery_id_from_v,
};

use crate::{EncodeError, RawTransaction, TransactionType};

/// A transaction together with its signature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedTransaction {
    /// The unsigned transaction
    pub transaction: RawTransaction,
    /// The transaction's signature
    pub signature: SignatureData,
}

impl SignedTransaction {
    /// Constructs a new instance.
    pub fn new(transaction: RawTransaction, signature: SignatureData) -> Self {
        Self {
            transaction,
            signature,
        }
    }

    /// Returns the type of the transaction.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction.transaction_type()
    }

    /// Retrieves the chain ID. For legacy transactions, this is derived from
    /// an EIP-155 recovery indicator.
    pub fn chain_id(&self) -> Option<u64> {
        match &self.transaction {
            RawTransaction::Legacy(_) => self.signature.chain_id(),
            transaction => transaction.chain_id(),
        }
    }

    /// Encodes the transaction into its canonical wire format.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        self.transaction.encode(Some(&self.signature))
    }

    /// Recovers the Ethereum address which was used to sign the transaction.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn recover_sender(&self) -> Result<Address, SignatureError> {
        let (signing_hash, recovery_id) = match &self.transaction {
            RawTransaction::Legacy(_) => {
                let recovery_id = recovery_id_from_legacy_v(&self.signature.v)?;
                let signing_hash = self.transaction.signing_hash(self.signature.chain_id());

                (signing_hash, recovery_id)
            }
            transaction => {
                let chain_id = transaction.chain_id().unwrap_or_default();
                let recovery_id = recovery_id_from_v(&self.signature.v, chain_id)?;
                let recovery_id = u8::try_from(recovery_id).map_err(|_error| {
                    SignatureError::UnsupportedRecoveryIndicator(self.signature.v.clone())
                })?;

                (transaction.signing_hash(None), recovery_id)
            }
        };

        recover_address(
            &signing_hash,
            recovery_id,
            &self.signature.r,
            &self.signature.s,
        )
    }

    /// Computes the hash of the transaction.
    ///
    /// The sidecar of an EIP-4844 transaction is not part of the hashed
    /// encoding.
    pub fn transaction_hash(&self) -> Result<B256, EncodeError> {
        let encoded = match &self.transaction {
            RawTransaction::Eip4844(transaction) => {
                transaction.encode_payload(Some(&self.signature))?
            }
            transaction => transaction.encode(Some(&self.signature))?,
        };

        Ok(keccak256(encoded))
    }
}
