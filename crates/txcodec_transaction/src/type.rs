use crate::DecodeError;

/// The type of transaction.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactionType {
    /// Legacy transaction, encoded without a type byte
    Legacy = 0,
    /// EIP-2930 transaction
    Eip2930 = 1,
    /// EIP-1559 transaction
    Eip1559 = 2,
    /// EIP-4844 transaction
    Eip4844 = 3,
    /// EIP-7702 transaction
    Eip7702 = 4,
}

impl TransactionType {
    /// Maps the leading byte of an encoded transaction to its type. Bytes
    /// that match no typed transaction are assumed to start a legacy RLP
    /// list.
    pub fn from_leading_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::Eip2930,
            0x02 => Self::Eip1559,
            0x03 => Self::Eip4844,
            0x04 => Self::Eip7702,
            _ => Self::Legacy,
        }
    }

    /// Determines the type of an encoded transaction from its leading byte.
    pub fn detect(encoded: &[u8]) -> Result<Self, DecodeError> {
        let leading_byte = encoded
            .first()
            .ok_or_else(|| DecodeError::MalformedInput("empty transaction".to_string()))?;

        let transaction_type = Self::from_leading_byte(*leading_byte);
        log::debug!("Leading byte 0x{leading_byte:02x} selects {transaction_type:?} transaction");

        Ok(transaction_type)
    }

    /// The byte that prefixes the RLP encoding of a typed transaction.
    pub fn envelope_byte(self) -> Option<u8> {
        match self {
            Self::Legacy => None,
            typed => Some(typed.into()),
        }
    }
}

impl From<TransactionType> for u8 {
    fn from(t: TransactionType) -> u8 {
        t as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_bytes_are_recognized() {
        assert_eq!(TransactionType::from_leading_byte(0x01), TransactionType::Eip2930);
        assert_eq!(TransactionType::from_leading_byte(0x02), TransactionType::Eip1559);
        assert_eq!(TransactionType::from_leading_byte(0x03), TransactionType::Eip4844);
        assert_eq!(TransactionType::from_leading_byte(0x04), TransactionType::Eip7702);
    }

    #[test]
    fn other_bytes_fall_back_to_legacy() {
        assert_eq!(TransactionType::from_leading_byte(0x00), TransactionType::Legacy);
        assert_eq!(TransactionType::from_leading_byte(0x05), TransactionType::Legacy);
        assert_eq!(TransactionType::from_leading_byte(0xf8), TransactionType::Legacy);
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(
            TransactionType::detect(&[]),
            Err(DecodeError::MalformedInput(_))
        ));
    }

    #[test]
    fn envelope_byte_round_trip() {
        assert_eq!(TransactionType::Legacy.envelope_byte(), None);

        for transaction_type in [
            TransactionType::Eip2930,
            TransactionType::Eip1559,
            TransactionType::Eip4844,
            TransactionType::Eip7702,
        ] {
            let byte = transaction_type.envelope_byte();
            assert_eq!(byte.map(TransactionType::from_leading_byte), Some(transaction_type));
        }
    }
}
