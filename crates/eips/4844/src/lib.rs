//! EIP-4844 blob sidecars: KZG commitments, proofs and versioned hashes.

pub use c_kzg::{BYTES_PER_BLOB, BYTES_PER_COMMITMENT, BYTES_PER_PROOF, Blob, Bytes48, KzgSettings};
use sha2::{Digest, Sha256};
use txcodec_primitives::B256;

/// Precomputation level used when loading the embedded trusted setup.
pub const KZG_PRECOMPUTE: u64 = 0;

/// Version byte prefixed to the SHA-256 hash of a KZG commitment.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Returns the Ethereum mainnet trusted setup, loaded on first use.
pub fn default_kzg_settings() -> &'static KzgSettings {
    c_kzg::ethereum_kzg_settings(KZG_PRECOMPUTE)
}

/// Computes the versioned hash of a KZG commitment:
/// `0x01 || sha256(commitment)[1..]`.
pub fn kzg_to_versioned_hash(commitment: &Bytes48) -> B256 {
    let mut hash = B256::from_slice(&Sha256::digest(commitment.as_slice()));
    if let Some(version) = hash.first_mut() {
        *version = VERSIONED_HASH_VERSION_KZG;
    }

    hash
}

/// Copies `bytes` into a heap-allocated blob.
///
/// A blob is 128 KiB, so it is never moved through the stack by value.
pub fn blob_from_bytes(bytes: &[u8]) -> Result<Box<Blob>, SidecarError> {
    if bytes.len() != BYTES_PER_BLOB {
        return Err(SidecarError::BlobLength(bytes.len()));
    }

    let mut blob = Box::<Blob>::default();
    blob.copy_from_slice(bytes);

    Ok(blob)
}

/// An error that occurs when constructing or verifying a [`BlobSidecar`].
#[derive(Debug, thiserror::Error)]
pub enum SidecarError {
    /// A blob does not have exactly [`BYTES_PER_BLOB`] bytes.
    #[error("Blob has {0} bytes, expected 131072.")]
    BlobLength(usize),
    /// The three sidecar sequences have different lengths.
    #[error(
        "Blob sidecar is not aligned: {blobs} blobs, {commitments} commitments, {proofs} proofs."
    )]
    Misaligned {
        /// Number of blobs
        blobs: usize,
        /// Number of commitments
        commitments: usize,
        /// Number of proofs
        proofs: usize,
    },
    /// The number of blobs does not match the number of versioned hashes.
    #[error(
        "Number of blobs ({actual}) does not match the payload's number of blob hashes ({expected})."
    )]
    BlobCount {
        /// Number of versioned hashes
        expected: usize,
        /// Number of blobs
        actual: usize,
    },
    /// The versioned hash of a commitment does not match the payload.
    #[error(
        "The versioned hash of the commitment at index {idx} does not match the payload's blob hash. Expected: {expected}, actual: {actual}."
    )]
    InvalidCommitment {
        /// Index of the commitment
        idx: usize,
        /// Versioned hash in the payload
        expected: B256,
        /// Versioned hash of the commitment
        actual: B256,
    },
    /// The KZG library reported an error.
    #[error("An error occurred while computing or verifying a KZG proof: {0}")]
    Kzg(c_kzg::Error),
    /// The batch verification of the KZG proofs failed.
    #[error("The verification of the KZG proof failed.")]
    Unverified,
}

/// Blobs with their KZG commitments and proofs. Index `i` of each sequence
/// belongs to the same blob.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobSidecar {
    blobs: Vec<Box<Blob>>,
    commitments: Vec<Bytes48>,
    proofs: Vec<Bytes48>,
}

impl BlobSidecar {
    /// Constructs a sidecar from already derived commitments and proofs,
    /// if the three sequences are aligned.
    pub fn new(
        blobs: Vec<Box<Blob>>,
        commitments: Vec<Bytes48>,
        proofs: Vec<Bytes48>,
    ) -> Result<Self, SidecarError> {
        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Err(SidecarError::Misaligned {
                blobs: blobs.len(),
                commitments: commitments.len(),
                proofs: proofs.len(),
            });
        }

        Ok(Self {
            blobs,
            commitments,
            proofs,
        })
    }

    /// Derives one commitment and one proof per blob, in blob order.
    pub fn from_blobs(
        blobs: Vec<Box<Blob>>,
        settings: &KzgSettings,
    ) -> Result<Self, SidecarError> {
        let commitments = blobs
            .iter()
            .map(|blob| {
                settings
                    .blob_to_kzg_commitment(blob)
                    .map(|commitment| commitment.to_bytes())
                    .map_err(SidecarError::Kzg)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let proofs = blobs
            .iter()
            .zip(commitments.iter())
            .map(|(blob, commitment)| {
                settings
                    .compute_blob_kzg_proof(blob, commitment)
                    .map(|proof| proof.to_bytes())
                    .map_err(SidecarError::Kzg)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            blobs,
            commitments,
            proofs,
        })
    }

    /// The blobs.
    pub fn blobs(&self) -> &[Box<Blob>] {
        &self.blobs
    }

    /// The KZG commitments.
    pub fn commitments(&self) -> &[Bytes48] {
        &self.commitments
    }

    /// The KZG proofs.
    pub fn proofs(&self) -> &[Bytes48] {
        &self.proofs
    }

    /// Number of blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the sidecar holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// The versioned hash of each commitment, in order.
    pub fn versioned_hashes(&self) -> Vec<B256> {
        self.commitments.iter().map(kzg_to_versioned_hash).collect()
    }

    /// Verifies the sidecar against a payload's versioned hashes and checks
    /// the KZG proofs.
    pub fn verify(
        &self,
        versioned_hashes: &[B256],
        settings: &KzgSettings,
    ) -> Result<(), SidecarError> {
        if versioned_hashes.len() != self.blobs.len() {
            return Err(SidecarError::BlobCount {
                expected: versioned_hashes.len(),
                actual: self.blobs.len(),
            });
        }

        let invalid_blob_hash = versioned_hashes
            .iter()
            .zip(self.commitments.iter())
            .enumerate()
            .find_map(|(idx, (blob_hash, commitment))| {
                let commitment_hash = kzg_to_versioned_hash(commitment);

                if *blob_hash == commitment_hash {
                    None
                } else {
                    Some((idx, *blob_hash, commitment_hash))
                }
            });

        if let Some((idx, expected, actual)) = invalid_blob_hash {
            return Err(SidecarError::InvalidCommitment {
                idx,
                expected,
                actual,
            });
        }

        // Blobs are boxed individually, so each is checked on its own
        // instead of as one contiguous batch.
        for ((blob, commitment), proof) in self
            .blobs
            .iter()
            .zip(self.commitments.iter())
            .zip(self.proofs.iter())
        {
            let verified = settings
                .verify_blob_kzg_proof(blob, commitment, proof)
                .map_err(SidecarError::Kzg)?;

            if !verified {
                return Err(SidecarError::Unverified);
            }
        }

        Ok(())
    }

    /// Consumes the sidecar, returning blobs, commitments and proofs.
    pub fn into_parts(self) -> (Vec<Box<Blob>>, Vec<Bytes48>, Vec<Bytes48>) {
        (self.blobs, self.commitments, self.proofs)
    }
}
