use txcodec_eip4844::{
    BYTES_PER_BLOB, BYTES_PER_COMMITMENT, BYTES_PER_PROOF, Blob, BlobSidecar, Bytes48,
    KzgSettings, SidecarError, blob_from_bytes,
};
use txcodec_primitives::{B256, Bytes, TxKind, U256};
use txcodec_rlp::RlpItem;
use txcodec_signer::SignatureData;

use crate::{
    DecodeError, EncodeError, TransactionType,
    access_list::{AccessListItem, access_list_item, decode_access_list},
    fields::{Fields, b256_from, b256_item, fixed_width, kind_item, string_item},
    signature,
    utils::envelop,
};

/// Number of elements of the envelope `[payload, blobs, commitments, proofs]`.
const ENVELOPE_FIELD_COUNT: usize = 4;

/// An EIP-4844 blob transaction.
///
/// The access list is always encoded as empty. An access list received on the
/// wire is kept only for the signing payload and the transaction hash. The
/// optional sidecar is not covered by the transaction's signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Eip4844 {
    // The order of these fields determines encoding order.
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
    /// Access list that was decoded; never encoded
    pub access_list: Vec<AccessListItem>,
    pub max_fee_per_blob_gas: u128,
    pub blob_hashes: Vec<B256>,
    /// Blobs held locally by the sender, if any
    pub sidecar: Option<BlobSidecar>,
}

impl Eip4844 {
    /// The type identifier for an EIP-4844 transaction.
    pub const TYPE: u8 = 3;

    /// Number of elements of an unsigned EIP-4844 payload list.
    pub const UNSIGNED_FIELD_COUNT: usize = 11;

    /// Attaches the provided blobs, deriving their commitments, proofs and
    /// versioned hashes. The blob hashes of the transaction are replaced.
    pub fn with_blobs(
        mut self,
        blobs: Vec<Box<Blob>>,
        settings: &KzgSettings,
    ) -> Result<Self, SidecarError> {
        let sidecar = BlobSidecar::from_blobs(blobs, settings)?;

        self.blob_hashes = sidecar.versioned_hashes();
        self.sidecar = Some(sidecar);

        Ok(self)
    }

    /// Verifies the sidecar, if any, against the transaction's blob hashes.
    pub fn verify_sidecar(&self, settings: &KzgSettings) -> Result<(), SidecarError> {
        self.sidecar
            .as_ref()
            .map_or(Ok(()), |sidecar| sidecar.verify(&self.blob_hashes, settings))
    }

    /// Decodes the elements following the type byte.
    ///
    /// These are either the envelope `[payload, blobs, commitments, proofs]`
    /// or, when the first element is a byte string, the bare payload without
    /// a sidecar.
    pub(crate) fn decode_fields(
        items: &[RlpItem],
    ) -> Result<(Self, Option<SignatureData>), DecodeError> {
        if !items.first().is_some_and(RlpItem::is_list) {
            return Self::decode_payload(items);
        }

        if items.len() != ENVELOPE_FIELD_COUNT {
            return Err(DecodeError::MalformedInput(format!(
                "Eip4844 envelope has {} elements, expected {ENVELOPE_FIELD_COUNT}",
                items.len()
            )));
        }

        let mut fields = Fields::new(items);
        let (mut transaction, signature) = Self::decode_payload(fields.list("payload")?)?;
        transaction.sidecar = decode_sidecar(
            fields.list("blobs")?,
            fields.list("commitments")?,
            fields.list("proofs")?,
        )?;

        Ok((transaction, signature))
    }

    fn decode_payload(items: &[RlpItem]) -> Result<(Self, Option<SignatureData>), DecodeError> {
        let signed = signature::is_signed(
            TransactionType::Eip4844,
            Self::UNSIGNED_FIELD_COUNT,
            items.len(),
        )?;

        let mut fields = Fields::new(items);
        let chain_id = fields.uint("chain_id")?;
        let nonce = fields.uint("nonce")?;
        let max_priority_fee_per_gas = fields.uint("max_priority_fee_per_gas")?;
        let max_fee_per_gas = fields.uint("max_fee_per_gas")?;
        let gas_limit = fields.uint("gas_limit")?;
        let kind = fields.kind("to")?;
        let value = fields.u256("value")?;
        let input = fields.data("input")?;

        let access_list = decode_access_list(fields.list("access_list")?)?;
        if !access_list.is_empty() {
            log::warn!(
                "EIP-4844 access list with {} entries is hashed but will not be re-encoded",
                access_list.len()
            );
        }

        let max_fee_per_blob_gas = fields.uint("max_fee_per_blob_gas")?;
        let blob_hashes = fields
            .list("blob_versioned_hashes")?
            .iter()
            .map(|hash| {
                let hash = string_item("blob_versioned_hashes", hash)?;
                b256_from("blob_versioned_hashes", hash)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let signature = signed
            .then(|| signature::decode_typed(&mut fields))
            .transpose()?;

        let transaction = Self {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            kind,
            value,
            input,
            access_list,
            max_fee_per_blob_gas,
            blob_hashes,
            sidecar: None,
        };

        Ok((transaction, signature))
    }

    /// The unsigned payload fields. The access list is always empty.
    pub(crate) fn rlp_fields(&self) -> Vec<RlpItem> {
        self.fields_with_access_list(RlpItem::empty_list())
    }

    /// The unsigned payload fields as they were signed, including a decoded
    /// access list.
    pub(crate) fn signing_fields(&self) -> Vec<RlpItem> {
        self.fields_with_access_list(access_list_item(&self.access_list))
    }

    fn fields_with_access_list(&self, access_list: RlpItem) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(self.chain_id),
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.max_priority_fee_per_gas),
            RlpItem::uint(self.max_fee_per_gas),
            RlpItem::uint(self.gas_limit),
            kind_item(&self.kind),
            RlpItem::uint(self.value),
            RlpItem::bytes(self.input.clone()),
            access_list,
            RlpItem::uint(self.max_fee_per_blob_gas),
            RlpItem::List(self.blob_hashes.iter().map(b256_item).collect()),
        ]
    }

    fn payload_item(
        &self,
        mut fields: Vec<RlpItem>,
        signature: Option<&SignatureData>,
    ) -> Result<RlpItem, EncodeError> {
        if let Some(signature) = signature {
            fields.extend(signature::typed_items(signature, self.chain_id)?);
        }

        Ok(RlpItem::List(fields))
    }

    /// Encodes the transaction as `type || rlp([payload, blobs, commitments,
    /// proofs])`. The sidecar lists are empty when no sidecar is held.
    pub fn encode(&self, signature: Option<&SignatureData>) -> Result<Bytes, EncodeError> {
        let (blobs, commitments, proofs) = match &self.sidecar {
            Some(sidecar) => (
                sidecar
                    .blobs()
                    .iter()
                    .map(|blob| RlpItem::bytes(blob.to_vec()))
                    .collect(),
                sidecar
                    .commitments()
                    .iter()
                    .map(|commitment| RlpItem::bytes(commitment.to_vec()))
                    .collect(),
                sidecar
                    .proofs()
                    .iter()
                    .map(|proof| RlpItem::bytes(proof.to_vec()))
                    .collect(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        let envelope = RlpItem::List(vec![
            self.payload_item(self.rlp_fields(), signature)?,
            RlpItem::List(blobs),
            RlpItem::List(commitments),
            RlpItem::List(proofs),
        ]);

        Ok(envelop(Self::TYPE, &envelope).into())
    }

    /// Encodes the transaction without its sidecar: `type || rlp(payload)`.
    /// This is the form that is hashed, so a decoded access list is included.
    pub fn encode_payload(&self, signature: Option<&SignatureData>) -> Result<Bytes, EncodeError> {
        let payload = self.payload_item(self.signing_fields(), signature)?;

        Ok(envelop(Self::TYPE, &payload).into())
    }
}

fn decode_sidecar(
    blobs: &[RlpItem],
    commitments: &[RlpItem],
    proofs: &[RlpItem],
) -> Result<Option<BlobSidecar>, DecodeError> {
    if blobs.is_empty() && commitments.is_empty() && proofs.is_empty() {
        return Ok(None);
    }

    let mut decoded_blobs = Vec::with_capacity(blobs.len());
    for blob in blobs {
        let bytes = string_item("blobs", blob)?;
        let bytes = fixed_width("blobs", bytes, BYTES_PER_BLOB, "a 131072-byte blob")?;

        decoded_blobs.push(blob_from_bytes(bytes).map_err(|_error| {
            DecodeError::SchemaViolation {
                field: "blobs",
                expected: "a 131072-byte blob",
            }
        })?);
    }

    let commitments = decode_bytes48_list("commitments", commitments, BYTES_PER_COMMITMENT)?;
    let proofs = decode_bytes48_list("proofs", proofs, BYTES_PER_PROOF)?;

    BlobSidecar::new(decoded_blobs, commitments, proofs)
        .map(Some)
        .map_err(|_error| DecodeError::SchemaViolation {
            field: "blob_sidecar",
            expected: "equally many blobs, commitments and proofs",
        })
}

fn decode_bytes48_list(
    field: &'static str,
    items: &[RlpItem],
    width: usize,
) -> Result<Vec<Bytes48>, DecodeError> {
    items
        .iter()
        .map(|item| {
            let bytes = fixed_width(field, string_item(field, item)?, width, "a 48-byte value")?;

            Bytes48::from_bytes(bytes).map_err(|_error| DecodeError::SchemaViolation {
                field,
                expected: "a 48-byte value",
            })
        })
        .collect()
}
