use txcodec_primitives::{Address, B256};
use txcodec_rlp::RlpItem;

use crate::{
    DecodeError,
    fields::{Fields, b256_from, b256_item, string_item},
};

const ENTRY_SHAPE: &str = "a list of [address, [storage keys]]";

/// An EIP-2930 access list entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListItem {
    /// Accessed address
    pub address: Address,
    /// Accessed storage keys, in declaration order
    pub storage_keys: Vec<B256>,
}

impl AccessListItem {
    fn decode_entry(entry: &RlpItem) -> Result<Self, DecodeError> {
        let values = entry
            .as_list()
            .filter(|values| values.len() == 2)
            .ok_or(DecodeError::SchemaViolation {
                field: "access_list",
                expected: ENTRY_SHAPE,
            })?;

        let mut fields = Fields::new(values);
        let address = fields.address("access_list.address")?;
        let storage_keys = fields
            .list("access_list.storage_keys")?
            .iter()
            .map(|key| {
                let key = string_item("access_list.storage_keys", key)?;
                b256_from("access_list.storage_keys", key)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            address,
            storage_keys,
        })
    }

    fn to_item(&self) -> RlpItem {
        RlpItem::List(vec![
            RlpItem::bytes(self.address.to_vec()),
            RlpItem::List(self.storage_keys.iter().map(b256_item).collect()),
        ])
    }
}

/// Decodes the entries of an access list, preserving their order.
pub(crate) fn decode_access_list(entries: &[RlpItem]) -> Result<Vec<AccessListItem>, DecodeError> {
    entries.iter().map(AccessListItem::decode_entry).collect()
}

/// Encodes an access list.
pub(crate) fn access_list_item(access_list: &[AccessListItem]) -> RlpItem {
    RlpItem::List(access_list.iter().map(AccessListItem::to_item).collect())
}
