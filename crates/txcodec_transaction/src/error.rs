use txcodec_signer::SignatureError;

/// An error that occurs while decoding a transaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is truncated, has invalid length prefixes or does not match
    /// any known shape for the detected transaction type.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// An element has the wrong shape, e.g. a list where a byte string is
    /// expected.
    #[error("Invalid field `{field}`: expected {expected}")]
    SchemaViolation {
        /// Name of the field
        field: &'static str,
        /// Description of the expected shape
        expected: &'static str,
    },
    /// A field exceeds its fixed byte width.
    #[error("Field `{field}` is {actual} bytes wide, exceeding the maximum of {max} bytes")]
    FieldTooWide {
        /// Name of the field
        field: &'static str,
        /// Maximum width in bytes
        max: usize,
        /// Actual width in bytes
        actual: usize,
    },
    /// The leading byte is neither a known transaction type nor the start of
    /// a legacy RLP list.
    #[error("Unsupported transaction type: 0x{0:02x}")]
    UnsupportedType(u8),
}

impl From<alloy_rlp::Error> for DecodeError {
    fn from(error: alloy_rlp::Error) -> Self {
        Self::MalformedInput(error.to_string())
    }
}

/// An error that occurs while encoding a transaction.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The recovery indicator cannot be converted into a Y-parity.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}
