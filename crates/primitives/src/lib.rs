//! Primitive value types shared by all transaction codec crates.
//!
//! They are the `alloy-primitives` types, so that values decoded here can be
//! handed to the wider alloy ecosystem without conversion.

pub use alloy_primitives::{
    Address, B256, Bytes, ChainId, TxKind, U256, address, b256, bytes, hex, keccak256, ruint,
};
