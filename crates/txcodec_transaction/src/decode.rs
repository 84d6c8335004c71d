use txcodec_primitives::Bytes;
use txcodec_rlp::RlpItem;
use txcodec_signer::SignatureData;

use crate::{
    DecodeError, EncodeError, Eip1559, Eip2930, Eip4844, Eip7702, Legacy, RawTransaction,
    SignedTransaction, TransactionType,
};

/// The result of decoding a transaction: either an unsigned transaction or a
/// transaction with its signature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodedTransaction {
    /// A transaction without signature
    Unsigned(RawTransaction),
    /// A signed transaction
    Signed(SignedTransaction),
}

impl DecodedTransaction {
    fn new(transaction: RawTransaction, signature: Option<SignatureData>) -> Self {
        match signature {
            Some(signature) => Self::Signed(SignedTransaction::new(transaction, signature)),
            None => Self::Unsigned(transaction),
        }
    }

    /// Returns the unsigned transaction.
    pub fn transaction(&self) -> &RawTransaction {
        match self {
            DecodedTransaction::Unsigned(transaction) => transaction,
            DecodedTransaction::Signed(signed) => &signed.transaction,
        }
    }

    /// Returns the signature, if any.
    pub fn signature(&self) -> Option<&SignatureData> {
        match self {
            DecodedTransaction::Unsigned(_) => None,
            DecodedTransaction::Signed(signed) => Some(&signed.signature),
        }
    }

    /// Returns the type of the transaction.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction().transaction_type()
    }

    /// Whether the transaction carries a signature.
    pub fn is_signed(&self) -> bool {
        matches!(self, DecodedTransaction::Signed(_))
    }

    /// Encodes the transaction, including its signature if any.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        self.transaction().encode(self.signature())
    }
}

impl From<RawTransaction> for DecodedTransaction {
    fn from(transaction: RawTransaction) -> Self {
        Self::Unsigned(transaction)
    }
}

impl From<SignedTransaction> for DecodedTransaction {
    fn from(transaction: SignedTransaction) -> Self {
        Self::Signed(transaction)
    }
}

/// Decodes a hex-encoded transaction. The `0x` prefix is optional.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn decode_transaction(encoded: &str) -> Result<DecodedTransaction, DecodeError> {
    let bytes = hex::decode(encoded)
        .map_err(|error| DecodeError::MalformedInput(format!("invalid hex: {error}")))?;

    decode_transaction_bytes(&bytes)
}

/// Decodes a transaction from its wire format.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn decode_transaction_bytes(encoded: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let transaction_type = TransactionType::detect(encoded)?;

    let (transaction, signature) = match transaction_type {
        TransactionType::Legacy => {
            let items = decode_list(encoded)?;
            let (transaction, signature) = Legacy::decode_fields(&items)?;

            (RawTransaction::Legacy(transaction), signature)
        }
        TransactionType::Eip2930 => {
            let items = decode_typed_body(encoded)?;
            let (transaction, signature) = Eip2930::decode_fields(&items)?;

            (RawTransaction::Eip2930(transaction), signature)
        }
        TransactionType::Eip1559 => {
            let items = decode_typed_body(encoded)?;
            let (transaction, signature) = Eip1559::decode_fields(&items)?;

            (RawTransaction::Eip1559(transaction), signature)
        }
        TransactionType::Eip4844 => {
            let items = decode_typed_body(encoded)?;
            let (transaction, signature) = Eip4844::decode_fields(&items)?;

            (RawTransaction::Eip4844(transaction), signature)
        }
        TransactionType::Eip7702 => {
            let items = decode_typed_body(encoded)?;
            let (transaction, signature) = Eip7702::decode_fields(&items)?;

            (RawTransaction::Eip7702(transaction), signature)
        }
    };

    Ok(DecodedTransaction::new(transaction, signature))
}

/// Decodes a legacy transaction, which must be a bare RLP list.
fn decode_list(encoded: &[u8]) -> Result<Vec<RlpItem>, DecodeError> {
    match encoded.first() {
        Some(&leading_byte) if leading_byte < alloy_rlp::EMPTY_LIST_CODE => {
            Err(DecodeError::UnsupportedType(leading_byte))
        }
        _ => into_list(RlpItem::decode_exact(encoded)?),
    }
}

/// Decodes the RLP list following the type byte of a typed transaction.
fn decode_typed_body(encoded: &[u8]) -> Result<Vec<RlpItem>, DecodeError> {
    let body = encoded.get(1..).unwrap_or_default();
    if body.is_empty() {
        return Err(DecodeError::MalformedInput(
            "typed transaction without body".to_string(),
        ));
    }

    into_list(RlpItem::decode_exact(body)?)
}

fn into_list(item: RlpItem) -> Result<Vec<RlpItem>, DecodeError> {
    match item {
        RlpItem::List(items) => Ok(items),
        RlpItem::String(_) => Err(DecodeError::MalformedInput(
            "expected an RLP list".to_string(),
        )),
    }
}
