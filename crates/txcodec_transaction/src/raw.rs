mod eip1559;
mod eip2930;
mod eip4844;
mod eip7702;
mod legacy;

use txcodec_primitives::{B256, Bytes, TxKind, U256, keccak256};
use txcodec_rlp::RlpItem;
use txcodec_signer::{
    SecretKey, SignatureData, SignatureError, eip155_v, sign_hash, v_from_recovery_id,
    v_from_y_parity,
};

pub use self::{
    eip1559::Eip1559, eip2930::Eip2930, eip4844::Eip4844, eip7702::Eip7702, legacy::Legacy,
};
use crate::{
    EncodeError, SignedTransaction, TransactionType, access_list::AccessListItem, signature,
    utils::envelop,
};

/// An unsigned transaction of any supported type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawTransaction {
    /// Legacy transaction
    Legacy(Legacy),
    /// EIP-2930 transaction
    Eip2930(Eip2930),
    /// EIP-1559 transaction
    Eip1559(Eip1559),
    /// EIP-4844 transaction
    Eip4844(Eip4844),
    /// EIP-7702 transaction
    Eip7702(Eip7702),
}

impl RawTransaction {
    /// Retrieves the instance's transaction type.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            RawTransaction::Legacy(_) => TransactionType::Legacy,
            RawTransaction::Eip2930(_) => TransactionType::Eip2930,
            RawTransaction::Eip1559(_) => TransactionType::Eip1559,
            RawTransaction::Eip4844(_) => TransactionType::Eip4844,
            RawTransaction::Eip7702(_) => TransactionType::Eip7702,
        }
    }

    /// Retrieves the instance's chain ID. Legacy transactions carry theirs in
    /// the signature, if at all.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            RawTransaction::Legacy(_) => None,
            RawTransaction::Eip2930(transaction) => Some(transaction.chain_id),
            RawTransaction::Eip1559(transaction) => Some(transaction.chain_id),
            RawTransaction::Eip4844(transaction) => Some(transaction.chain_id),
            RawTransaction::Eip7702(transaction) => Some(transaction.chain_id),
        }
    }

    /// Retrieves the instance's nonce.
    pub fn nonce(&self) -> u64 {
        match self {
            RawTransaction::Legacy(transaction) => transaction.nonce,
            RawTransaction::Eip2930(transaction) => transaction.nonce,
            RawTransaction::Eip1559(transaction) => transaction.nonce,
            RawTransaction::Eip4844(transaction) => transaction.nonce,
            RawTransaction::Eip7702(transaction) => transaction.nonce,
        }
    }

    /// Retrieves the instance's gas limit.
    pub fn gas_limit(&self) -> u64 {
        match self {
            RawTransaction::Legacy(transaction) => transaction.gas_limit,
            RawTransaction::Eip2930(transaction) => transaction.gas_limit,
            RawTransaction::Eip1559(transaction) => transaction.gas_limit,
            RawTransaction::Eip4844(transaction) => transaction.gas_limit,
            RawTransaction::Eip7702(transaction) => transaction.gas_limit,
        }
    }

    /// Retrieves the instance's recipient, or [`TxKind::Create`] for contract
    /// creation.
    pub fn kind(&self) -> TxKind {
        match self {
            RawTransaction::Legacy(transaction) => transaction.kind,
            RawTransaction::Eip2930(transaction) => transaction.kind,
            RawTransaction::Eip1559(transaction) => transaction.kind,
            RawTransaction::Eip4844(transaction) => transaction.kind,
            RawTransaction::Eip7702(transaction) => transaction.kind,
        }
    }

    /// Retrieves the instance's value.
    pub fn value(&self) -> &U256 {
        match self {
            RawTransaction::Legacy(transaction) => &transaction.value,
            RawTransaction::Eip2930(transaction) => &transaction.value,
            RawTransaction::Eip1559(transaction) => &transaction.value,
            RawTransaction::Eip4844(transaction) => &transaction.value,
            RawTransaction::Eip7702(transaction) => &transaction.value,
        }
    }

    /// Retrieves the instance's input data.
    pub fn data(&self) -> &Bytes {
        match self {
            RawTransaction::Legacy(transaction) => &transaction.input,
            RawTransaction::Eip2930(transaction) => &transaction.input,
            RawTransaction::Eip1559(transaction) => &transaction.input,
            RawTransaction::Eip4844(transaction) => &transaction.input,
            RawTransaction::Eip7702(transaction) => &transaction.input,
        }
    }

    /// Retrieves the instance's access list. For EIP-4844 transactions this
    /// is the decoded access list, which is never encoded.
    pub fn access_list(&self) -> Option<&[AccessListItem]> {
        match self {
            RawTransaction::Legacy(_) => None,
            RawTransaction::Eip2930(transaction) => Some(&transaction.access_list),
            RawTransaction::Eip1559(transaction) => Some(&transaction.access_list),
            RawTransaction::Eip4844(transaction) => Some(&transaction.access_list),
            RawTransaction::Eip7702(transaction) => Some(&transaction.access_list),
        }
    }

    /// Encodes the transaction with an optional signature into its canonical
    /// wire format.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn encode(&self, signature: Option<&SignatureData>) -> Result<Bytes, EncodeError> {
        match self {
            RawTransaction::Legacy(transaction) => Ok(transaction.encode(signature)),
            RawTransaction::Eip2930(transaction) => encode_typed(
                Eip2930::TYPE,
                transaction.rlp_fields(),
                signature,
                transaction.chain_id,
            ),
            RawTransaction::Eip1559(transaction) => encode_typed(
                Eip1559::TYPE,
                transaction.rlp_fields(),
                signature,
                transaction.chain_id,
            ),
            RawTransaction::Eip4844(transaction) => transaction.encode(signature),
            RawTransaction::Eip7702(transaction) => encode_typed(
                Eip7702::TYPE,
                transaction.rlp_fields(),
                signature,
                transaction.chain_id,
            ),
        }
    }

    /// The bytes that are hashed for signing.
    ///
    /// `chain_id` only applies to legacy transactions, which append the
    /// EIP-155 fields when it is provided. Typed transactions sign
    /// `type || rlp(fields)`; for EIP-4844 this excludes the sidecar.
    pub fn signing_payload(&self, chain_id: Option<u64>) -> Bytes {
        let (transaction_type, fields) = match self {
            RawTransaction::Legacy(transaction) => return transaction.signing_payload(chain_id),
            RawTransaction::Eip2930(transaction) => (Eip2930::TYPE, transaction.rlp_fields()),
            RawTransaction::Eip1559(transaction) => (Eip1559::TYPE, transaction.rlp_fields()),
            RawTransaction::Eip4844(transaction) => (Eip4844::TYPE, transaction.signing_fields()),
            RawTransaction::Eip7702(transaction) => (Eip7702::TYPE, transaction.rlp_fields()),
        };

        envelop(transaction_type, &RlpItem::List(fields)).into()
    }

    /// Computes the hash that is signed. See [`Self::signing_payload`].
    pub fn signing_hash(&self, chain_id: Option<u64>) -> B256 {
        keccak256(self.signing_payload(chain_id))
    }

    /// Signs the transaction with the provided secret key.
    ///
    /// Legacy transactions are replay protected through EIP-155 when
    /// `chain_id` is provided; typed transactions ignore it.
    pub fn sign(
        self,
        secret_key: &SecretKey,
        chain_id: Option<u64>,
    ) -> Result<SignedTransaction, SignatureError> {
        let chain_id = match self {
            RawTransaction::Legacy(_) => chain_id,
            _ => None,
        };

        let signature = sign_hash(&self.signing_hash(chain_id), secret_key)?;
        let v = match (&self, chain_id) {
            (RawTransaction::Legacy(_), Some(chain_id)) => {
                eip155_v(signature.recovery_id, chain_id)
            }
            (RawTransaction::Legacy(_), None) => v_from_recovery_id(signature.recovery_id),
            _ => v_from_y_parity(signature.recovery_id == 1),
        };

        Ok(SignedTransaction::new(
            self,
            SignatureData::new(v, signature.r, signature.s),
        ))
    }
}

impl From<Legacy> for RawTransaction {
    fn from(transaction: Legacy) -> Self {
        Self::Legacy(transaction)
    }
}

impl From<Eip2930> for RawTransaction {
    fn from(transaction: Eip2930) -> Self {
        Self::Eip2930(transaction)
    }
}

impl From<Eip1559> for RawTransaction {
    fn from(transaction: Eip1559) -> Self {
        Self::Eip1559(transaction)
    }
}

impl From<Eip4844> for RawTransaction {
    fn from(transaction: Eip4844) -> Self {
        Self::Eip4844(transaction)
    }
}

impl From<Eip7702> for RawTransaction {
    fn from(transaction: Eip7702) -> Self {
        Self::Eip7702(transaction)
    }
}

/// Encodes `type || rlp(fields [, y_parity, r, s])`.
pub(crate) fn encode_typed(
    transaction_type: u8,
    mut fields: Vec<RlpItem>,
    signature: Option<&SignatureData>,
    chain_id: u64,
) -> Result<Bytes, EncodeError> {
    if let Some(signature) = signature {
        fields.extend(signature::typed_items(signature, chain_id)?);
    }

    Ok(envelop(transaction_type, &RlpItem::List(fields)).into())
}
