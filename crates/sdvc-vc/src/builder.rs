//! # Commitment Builder
//!
//! Turns an ordered claim set into a sparse Merkle commitment. Each
//! claim's key is its declaration index; integer and text values encode
//! directly, and nested claim groups become their own sub-commitment
//! whose root is the parent leaf value.
//!
//! ## Security Invariant
//!
//! Key assignment is positional and starts at zero in every claim set,
//! including nested ones. A verifier that knows the credential schema
//! therefore knows every key without seeing any claim, which is what
//! lets it ask for "claim at index 1" without learning the others.

use std::collections::BTreeMap;

use sdvc_core::{ClaimSet, ClaimValue, CommitmentError, FieldElement};
use sdvc_crypto::{
    encode_int, encode_text, DisclosureProof, PoseidonHash, SparseMerkleTree,
};

/// Builds credential commitments. Cheap to clone and reuse.
#[derive(Debug, Clone, Copy)]
pub struct CommitmentBuilder {
    hasher: PoseidonHash,
}

impl CommitmentBuilder {
    /// Create a builder, probing the hash primitive once.
    pub fn new() -> Result<Self, CommitmentError> {
        Ok(Self {
            hasher: PoseidonHash::init()?,
        })
    }

    /// The hash capability, shared with proof verification.
    pub fn hasher(&self) -> &PoseidonHash {
        &self.hasher
    }

    /// Commit to a claim set, recursing into nested groups depth-first.
    pub fn build(&self, claims: &ClaimSet) -> Result<CredentialCommitment, CommitmentError> {
        let mut tree = SparseMerkleTree::new(self.hasher);
        let mut keys = BTreeMap::new();
        let mut subtrees = BTreeMap::new();

        for (index, (name, value)) in claims.iter().enumerate() {
            let key = FieldElement::from(index as u64);
            let encoded = match value {
                ClaimValue::Int(v) => encode_int(*v),
                ClaimValue::Text(s) => encode_text(&self.hasher, s)?,
                ClaimValue::Nested(inner) => {
                    let sub = self.build(inner)?;
                    let sub_root = sub.root();
                    subtrees.insert(name.to_string(), sub);
                    sub_root
                }
            };
            tree.insert(key, encoded)?;
            keys.insert(name.to_string(), key);
        }

        let root = tree.root()?;
        Ok(CredentialCommitment {
            root,
            tree,
            keys,
            subtrees,
        })
    }
}

/// A built commitment: the tree, its root, and the name-to-key map
/// needed to prove individual claims later.
#[derive(Debug, Clone)]
pub struct CredentialCommitment {
    root: FieldElement,
    tree: SparseMerkleTree,
    keys: BTreeMap<String, FieldElement>,
    subtrees: BTreeMap<String, CredentialCommitment>,
}

impl CredentialCommitment {
    /// The root, the value that gets signed.
    pub fn root(&self) -> FieldElement {
        self.root
    }

    /// The key assigned to a claim name, if the claim exists.
    pub fn key_of(&self, name: &str) -> Option<FieldElement> {
        self.keys.get(name).copied()
    }

    /// The sub-commitment of a nested claim group.
    pub fn subtree(&self, name: &str) -> Option<&CredentialCommitment> {
        self.subtrees.get(name)
    }

    /// Prove a claim by name. Always an inclusion proof; an unknown
    /// name is an error, not an exclusion.
    pub fn prove_claim(&self, name: &str) -> Result<DisclosureProof, CommitmentError> {
        let key = self
            .key_of(name)
            .ok_or_else(|| CommitmentError::UnknownClaim(name.to_string()))?;
        self.tree.prove(key)
    }

    /// Prove an arbitrary key, inclusion or exclusion as the tree
    /// dictates. This is how absence of a claim index is demonstrated.
    pub fn prove_key(&self, key: FieldElement) -> Result<DisclosureProof, CommitmentError> {
        self.tree.prove(key)
    }
}
