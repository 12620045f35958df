//! # Poseidon Hash Capability
//!
//! Wrapper over the circom-parameterized Poseidon permutation. All tree
//! hashing goes through this handle, so the rest of the crate never
//! touches the hasher crate directly.
//!
//! ## Security Invariant
//!
//! The circom parameter set is part of the commitment definition: the
//! fixed-structure verifier hard-codes the same round constants, so any
//! other Poseidon parameterization produces roots the verifier rejects.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use sdvc_core::{CommitmentError, FieldElement};

/// Maximum number of inputs one Poseidon call accepts under the circom
/// parameter set.
const MAX_ARITY: usize = 12;

/// Handle to the Poseidon hash primitive.
///
/// Construction probes the parameter tables once; a handle that exists
/// can hash any supported arity without further fallibility beyond the
/// per-call arity check.
#[derive(Debug, Clone, Copy)]
pub struct PoseidonHash;

impl PoseidonHash {
    /// Obtain the hash capability.
    ///
    /// Fails with `PrimitiveUnavailable` if the circom parameter tables
    /// cannot be instantiated.
    pub fn init() -> Result<Self, CommitmentError> {
        Poseidon::<Fr>::new_circom(1)
            .map_err(|e| CommitmentError::PrimitiveUnavailable(format!("poseidon init: {e}")))?;
        Ok(Self)
    }

    /// Hash a fixed-arity input tuple.
    ///
    /// Arity must be between 1 and 12 inclusive; the parameter tables do
    /// not extend further.
    pub fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CommitmentError> {
        if inputs.is_empty() || inputs.len() > MAX_ARITY {
            return Err(CommitmentError::PrimitiveUnavailable(format!(
                "poseidon arity {} unsupported (1..={MAX_ARITY})",
                inputs.len()
            )));
        }
        let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
            .map_err(|e| CommitmentError::PrimitiveUnavailable(format!("poseidon init: {e}")))?;
        let raw: Vec<Fr> = inputs.iter().map(|x| x.0).collect();
        let out = hasher
            .hash(&raw)
            .map_err(|e| CommitmentError::PrimitiveUnavailable(format!("poseidon hash: {e}")))?;
        Ok(FieldElement(out))
    }

    /// Hash two elements, the internal-node combiner.
    pub fn hash2(
        &self,
        left: FieldElement,
        right: FieldElement,
    ) -> Result<FieldElement, CommitmentError> {
        self.hash(&[left, right])
    }

    /// Hash three elements, the tagged leaf combiner.
    pub fn hash3(
        &self,
        a: FieldElement,
        b: FieldElement,
        c: FieldElement,
    ) -> Result<FieldElement, CommitmentError> {
        self.hash(&[a, b, c])
    }
}
