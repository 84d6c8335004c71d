use txcodec_primitives::{Address, U256};
use txcodec_rlp::RlpItem;

use crate::{DecodeError, fields::Fields};

/// Number of elements in an encoded authorization tuple.
const TUPLE_FIELD_COUNT: usize = 6;

/// An EIP-7702 authorization: a signed permission for `address`'s code to
/// be delegated to by the signing account.
///
/// The tuple's own `y_parity`, `r` and `s` are unrelated to the signature of
/// the enclosing transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AuthorizationTuple {
    /// Chain ID the authorization is valid on; zero for any chain
    pub chain_id: U256,
    /// Address of the delegated code
    pub address: Address,
    /// Nonce of the authorizing account
    pub nonce: U256,
    /// Y-parity of the authorization signature
    pub y_parity: u8,
    /// R value of the authorization signature
    pub r: U256,
    /// S value of the authorization signature
    pub s: U256,
}

impl AuthorizationTuple {
    fn decode_entry(entry: &RlpItem) -> Result<Self, DecodeError> {
        let values = entry
            .as_list()
            .filter(|values| values.len() == TUPLE_FIELD_COUNT)
            .ok_or(DecodeError::SchemaViolation {
                field: "authorization_list",
                expected: "a list of [chain_id, address, nonce, y_parity, r, s]",
            })?;

        let mut fields = Fields::new(values);

        Ok(Self {
            chain_id: fields.u256("authorization_list.chain_id")?,
            address: fields.address("authorization_list.address")?,
            nonce: fields.u256("authorization_list.nonce")?,
            y_parity: fields.uint("authorization_list.y_parity")?,
            r: fields.u256("authorization_list.r")?,
            s: fields.u256("authorization_list.s")?,
        })
    }

    fn to_item(&self) -> RlpItem {
        RlpItem::List(vec![
            RlpItem::uint(self.chain_id),
            RlpItem::bytes(self.address.to_vec()),
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.y_parity),
            RlpItem::uint(self.r),
            RlpItem::uint(self.s),
        ])
    }
}

/// Decodes the tuples of an authorization list, preserving their order.
pub(crate) fn decode_authorization_list(
    entries: &[RlpItem],
) -> Result<Vec<AuthorizationTuple>, DecodeError> {
    entries
        .iter()
        .map(AuthorizationTuple::decode_entry)
        .collect()
}

/// Encodes an authorization list.
pub(crate) fn authorization_list_item(authorization_list: &[AuthorizationTuple]) -> RlpItem {
    RlpItem::List(
        authorization_list
            .iter()
            .map(AuthorizationTuple::to_item)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use txcodec_primitives::address;

    use super::*;

    fn authorization() -> AuthorizationTuple {
        AuthorizationTuple {
            chain_id: U256::from(1337u64),
            address: address!("0x1234567890123456789012345678901234567890"),
            nonce: U256::from(5u64),
            y_parity: 1,
            r: U256::from(0xdeadbeefu64),
            s: U256::MAX,
        }
    }

    #[test]
    fn round_trips_tuples() -> anyhow::Result<()> {
        let authorization_list = vec![authorization(), AuthorizationTuple::default()];

        let encoded = authorization_list_item(&authorization_list);
        let entries = encoded.as_list().unwrap_or_default();
        assert_eq!(decode_authorization_list(entries)?, authorization_list);

        Ok(())
    }

    #[test]
    fn rejects_tuple_of_wrong_arity() {
        let encoded = authorization_list_item(&[authorization()]);
        let mut entries = encoded.as_list().unwrap_or_default().to_vec();
        if let Some(RlpItem::List(values)) = entries.first_mut() {
            values.pop();
        }

        assert!(matches!(
            decode_authorization_list(&entries),
            Err(DecodeError::SchemaViolation {
                field: "authorization_list",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nested_list_in_place_of_scalar() {
        let encoded = authorization_list_item(&[authorization()]);
        let mut entries = encoded.as_list().unwrap_or_default().to_vec();
        if let Some(nonce) = entries
            .first_mut()
            .and_then(|entry| match entry {
                RlpItem::List(values) => values.get_mut(2),
                RlpItem::String(_) => None,
            })
        {
            *nonce = RlpItem::List(vec![RlpItem::uint(5u64)]);
        }

        assert!(matches!(
            decode_authorization_list(&entries),
            Err(DecodeError::SchemaViolation {
                field: "authorization_list.nonce",
                ..
            })
        ));
    }

    #[test]
    fn accepts_nonce_wider_than_64_bits() -> anyhow::Result<()> {
        let entry = RlpItem::List(vec![
            RlpItem::uint(1u64),
            RlpItem::bytes(vec![0xaau8; 20]),
            RlpItem::bytes(vec![0x01u8; 9]),
            RlpItem::uint(0u64),
            RlpItem::uint(1u64),
            RlpItem::uint(1u64),
        ]);

        let decoded = decode_authorization_list(std::slice::from_ref(&entry))?;
        let nonce = decoded.first().map(|authorization| authorization.nonce);
        assert_eq!(nonce, Some(U256::from(0x0101_0101_0101_0101_01u128)));

        assert_eq!(authorization_list_item(&decoded), RlpItem::List(vec![entry]));

        Ok(())
    }

    #[test]
    fn rejects_wide_y_parity() {
        let entry = RlpItem::List(vec![
            RlpItem::uint(1u64),
            RlpItem::bytes(vec![0xaau8; 20]),
            RlpItem::uint(0u64),
            RlpItem::uint(256u64),
            RlpItem::uint(1u64),
            RlpItem::uint(1u64),
        ]);

        assert!(matches!(
            decode_authorization_list(&[entry]),
            Err(DecodeError::FieldTooWide {
                field: "authorization_list.y_parity",
                max: 1,
                actual: 2
            })
        ));
    }
}
