//! Decoding and encoding of Ethereum transactions.
//!
//! Supports legacy (optionally EIP-155 replay protected), EIP-2930,
//! EIP-1559, EIP-4844 and EIP-7702 transactions. The type of an encoded
//! transaction is determined by its leading byte; each type is then decoded
//! positionally from its RLP list, where the number of elements determines
//! whether a signature is present.

mod access_list;
mod authorization;
mod decode;
mod error;
/// Conversions between RLP byte strings and fixed-width fields
pub mod fields;
mod raw;
mod signature;
mod signed;
mod r#type;
/// Transaction envelope utilities
pub mod utils;

pub use txcodec_eip4844::{BlobSidecar, SidecarError};
pub use txcodec_signer::{SecretKey, SignatureData, SignatureError};

pub use self::{
    access_list::AccessListItem,
    authorization::AuthorizationTuple,
    decode::{DecodedTransaction, decode_transaction, decode_transaction_bytes},
    error::{DecodeError, EncodeError},
    raw::{Eip1559, Eip2930, Eip4844, Eip7702, Legacy, RawTransaction},
    signed::SignedTransaction,
    r#type::TransactionType,
};
