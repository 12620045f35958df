//! # Sparse Merkle Tree
//!
//! The commitment structure: a binary trie over field-element keys, with
//! Poseidon-hashed nodes and fixed-depth disclosure proofs. Key bits are
//! consumed least-significant first; bit `i` selects the child at depth
//! `i`, `1` going right. Leaves sit at the first depth where their key
//! diverges from every other key, not at the bottom of the key space.
//!
//! ## Security Invariant
//!
//! Node hashing is domain-separated. An empty subtree hashes to zero, a
//! leaf hashes to `H(1, key, value)` with the constant tag first, and an
//! internal node hashes to `H(left, right)`. The tag keeps a leaf from
//! being reinterpreted as an internal node, and zero is reserved for
//! absence, so a real sibling on a proof path is never zero.
//!
//! The tree shape is a function of the key set alone. Two trees holding
//! the same key/value pairs have the same root regardless of insertion
//! order, which is what makes the root a canonical commitment.

use serde::{Deserialize, Serialize};

use sdvc_core::{CommitmentError, FieldElement};

use crate::poseidon::PoseidonHash;

/// Fixed proof depth shared with the verifier.
///
/// Every proof carries exactly this many siblings, zero-padded past the
/// real path, so proof shape never leaks tree population.
pub const PROOF_DEPTH: usize = 64;

/// Leaf domain-separation tag, hashed first in every leaf.
const LEAF_TAG: u64 = 1;

// ---------------------------------------------------------------------------
// Tree structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
enum Node {
    #[default]
    Empty,
    Leaf {
        key: FieldElement,
        value: FieldElement,
    },
    Internal {
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A sparse Merkle tree over field-element keys and values.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree {
    root: Node,
    hasher: PoseidonHash,
}

impl SparseMerkleTree {
    /// Create an empty tree. The empty root is the field zero.
    pub fn new(hasher: PoseidonHash) -> Self {
        Self {
            root: Node::Empty,
            hasher,
        }
    }

    /// Insert a key/value pair.
    ///
    /// Fails with `KeyTooLarge` if the key (or the divergence point with
    /// an existing key) needs more bits than the fixed proof depth, and
    /// with `DuplicateKey` if the key is already present.
    pub fn insert(
        &mut self,
        key: FieldElement,
        value: FieldElement,
    ) -> Result<(), CommitmentError> {
        if key.num_bits() > PROOF_DEPTH as u32 {
            return Err(CommitmentError::KeyTooLarge {
                key: key.to_decimal(),
                bits: key.num_bits(),
                max: PROOF_DEPTH as u32,
            });
        }
        let root = std::mem::take(&mut self.root);
        self.root = Self::insert_node(root, 0, key, value)?;
        Ok(())
    }

    fn insert_node(
        node: Node,
        depth: usize,
        key: FieldElement,
        value: FieldElement,
    ) -> Result<Node, CommitmentError> {
        match node {
            Node::Empty => Ok(Node::Leaf { key, value }),
            Node::Leaf {
                key: old_key,
                value: old_value,
            } => {
                if old_key == key {
                    return Err(CommitmentError::DuplicateKey(key.to_decimal()));
                }
                Self::split_leaves(old_key, old_value, key, value, depth)
            }
            Node::Internal { left, right } => {
                if key.bit(depth) {
                    let new_right = Self::insert_node(*right, depth + 1, key, value)?;
                    Ok(Node::Internal {
                        left,
                        right: Box::new(new_right),
                    })
                } else {
                    let new_left = Self::insert_node(*left, depth + 1, key, value)?;
                    Ok(Node::Internal {
                        left: Box::new(new_left),
                        right,
                    })
                }
            }
        }
    }

    /// Push two distinct-key leaves down to their first divergence bit.
    fn split_leaves(
        old_key: FieldElement,
        old_value: FieldElement,
        new_key: FieldElement,
        new_value: FieldElement,
        depth: usize,
    ) -> Result<Node, CommitmentError> {
        if depth >= PROOF_DEPTH {
            return Err(CommitmentError::KeyTooLarge {
                key: new_key.to_decimal(),
                bits: (depth + 1) as u32,
                max: PROOF_DEPTH as u32,
            });
        }
        let old_bit = old_key.bit(depth);
        let new_bit = new_key.bit(depth);
        if old_bit != new_bit {
            let old_leaf = Node::Leaf {
                key: old_key,
                value: old_value,
            };
            let new_leaf = Node::Leaf {
                key: new_key,
                value: new_value,
            };
            let (left, right) = if new_bit {
                (old_leaf, new_leaf)
            } else {
                (new_leaf, old_leaf)
            };
            Ok(Node::Internal {
                left: Box::new(left),
                right: Box::new(right),
            })
        } else {
            let child = Self::split_leaves(old_key, old_value, new_key, new_value, depth + 1)?;
            let (left, right) = if new_bit {
                (Node::Empty, child)
            } else {
                (child, Node::Empty)
            };
            Ok(Node::Internal {
                left: Box::new(left),
                right: Box::new(right),
            })
        }
    }

    fn node_hash(&self, node: &Node) -> Result<FieldElement, CommitmentError> {
        match node {
            Node::Empty => Ok(FieldElement::zero()),
            Node::Leaf { key, value } => {
                self.hasher
                    .hash3(FieldElement::from(LEAF_TAG), *key, *value)
            }
            Node::Internal { left, right } => {
                let l = self.node_hash(left)?;
                let r = self.node_hash(right)?;
                self.hasher.hash2(l, r)
            }
        }
    }

    /// The root commitment over everything inserted so far.
    pub fn root(&self) -> Result<FieldElement, CommitmentError> {
        self.node_hash(&self.root)
    }

    /// Walk the tree along a key's bit path.
    ///
    /// Siblings are collected root-first; padding to the fixed depth
    /// happens in `prove`.
    fn find(&self, key: FieldElement) -> Result<FindResult, CommitmentError> {
        let mut siblings = Vec::new();
        let mut cur = &self.root;
        let mut depth = 0;
        loop {
            match cur {
                Node::Empty => {
                    return Ok(FindResult {
                        found: false,
                        siblings,
                        value: FieldElement::zero(),
                        is_old0: true,
                        not_found_key: FieldElement::zero(),
                        not_found_value: FieldElement::zero(),
                    });
                }
                Node::Leaf {
                    key: leaf_key,
                    value,
                } => {
                    if *leaf_key == key {
                        return Ok(FindResult {
                            found: true,
                            siblings,
                            value: *value,
                            is_old0: false,
                            not_found_key: FieldElement::zero(),
                            not_found_value: FieldElement::zero(),
                        });
                    }
                    return Ok(FindResult {
                        found: false,
                        siblings,
                        value: FieldElement::zero(),
                        is_old0: false,
                        not_found_key: *leaf_key,
                        not_found_value: *value,
                    });
                }
                Node::Internal { left, right } => {
                    if key.bit(depth) {
                        siblings.push(self.node_hash(left)?);
                        cur = right;
                    } else {
                        siblings.push(self.node_hash(right)?);
                        cur = left;
                    }
                    depth += 1;
                }
            }
        }
    }

    /// Produce a fixed-depth disclosure proof for a key.
    ///
    /// Inclusion if the key is present, exclusion otherwise. Both shapes
    /// carry exactly `PROOF_DEPTH` siblings. Keys wider than the proof
    /// depth fail with `KeyTooLarge`; the verifier cannot navigate them.
    pub fn prove(&self, key: FieldElement) -> Result<DisclosureProof, CommitmentError> {
        if key.num_bits() > PROOF_DEPTH as u32 {
            return Err(CommitmentError::KeyTooLarge {
                key: key.to_decimal(),
                bits: key.num_bits(),
                max: PROOF_DEPTH as u32,
            });
        }
        let found = self.find(key)?;
        let mut siblings = [FieldElement::zero(); PROOF_DEPTH];
        for (slot, sib) in siblings.iter_mut().zip(found.siblings.iter()) {
            *slot = *sib;
        }
        Ok(DisclosureProof {
            siblings,
            old_key: found.not_found_key,
            old_value: found.not_found_value,
            is_old0: found.is_old0,
            key,
            value: found.value,
            mode: if found.found {
                ProofMode::Inclusion
            } else {
                ProofMode::Exclusion
            },
        })
    }
}

struct FindResult {
    found: bool,
    siblings: Vec<FieldElement>,
    value: FieldElement,
    is_old0: bool,
    not_found_key: FieldElement,
    not_found_value: FieldElement,
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

/// Whether a proof demonstrates presence or absence of its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofMode {
    /// The key is in the tree with the stated value.
    Inclusion,
    /// The key is not in the tree.
    Exclusion,
}

impl ProofMode {
    /// The function selector the fixed-structure verifier expects:
    /// `0` for inclusion, `1` for exclusion.
    pub fn as_flag(&self) -> u8 {
        match self {
            ProofMode::Inclusion => 0,
            ProofMode::Exclusion => 1,
        }
    }
}

/// A fixed-depth Merkle disclosure proof.
///
/// Siblings run root-first along the key's bit path, zero-padded to
/// `PROOF_DEPTH`. For an exclusion proof the `old_*` fields describe
/// what the walk terminated on: a different-key leaf (`is_old0` false)
/// or an empty subtree (`is_old0` true, both old fields zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclosureProof {
    /// Sibling hashes, root-first, zero-padded.
    #[serde(with = "sibling_serde")]
    pub siblings: [FieldElement; PROOF_DEPTH],
    /// Key of the colliding leaf for a non-empty exclusion, else zero.
    pub old_key: FieldElement,
    /// Value of the colliding leaf for a non-empty exclusion, else zero.
    pub old_value: FieldElement,
    /// True if the exclusion walk ended on an empty subtree.
    pub is_old0: bool,
    /// The key being proven.
    pub key: FieldElement,
    /// The disclosed value (zero for exclusion).
    pub value: FieldElement,
    /// Inclusion or exclusion.
    pub mode: ProofMode,
}

/// Serde for the fixed-depth sibling array, which is wider than the
/// array sizes serde derives handle. Length is checked on the way in.
pub mod sibling_serde {
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use sdvc_core::FieldElement;

    use super::PROOF_DEPTH;

    pub fn serialize<S: Serializer>(
        siblings: &[FieldElement; PROOF_DEPTH],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(PROOF_DEPTH))?;
        for sibling in siblings {
            seq.serialize_element(sibling)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[FieldElement; PROOF_DEPTH], D::Error> {
        let v = Vec::<FieldElement>::deserialize(deserializer)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::custom(format!("expected {PROOF_DEPTH} siblings, got {len}")))
    }
}

/// Verify a disclosure proof against a root commitment.
///
/// Recomputes the path bottom-up from the terminal hash and compares
/// with the claimed root. The real path length is recovered from the
/// padding: a genuine sibling is never zero, so the path ends at the
/// last non-zero sibling.
pub fn verify_proof(
    hasher: &PoseidonHash,
    root: FieldElement,
    proof: &DisclosureProof,
) -> Result<bool, CommitmentError> {
    let terminal = match proof.mode {
        ProofMode::Inclusion => {
            hasher.hash3(FieldElement::from(LEAF_TAG), proof.key, proof.value)?
        }
        ProofMode::Exclusion => {
            if proof.is_old0 {
                if !proof.old_key.is_zero() || !proof.old_value.is_zero() {
                    return Ok(false);
                }
                FieldElement::zero()
            } else {
                // A colliding leaf with the same key would be inclusion.
                if proof.old_key == proof.key {
                    return Ok(false);
                }
                hasher.hash3(FieldElement::from(LEAF_TAG), proof.old_key, proof.old_value)?
            }
        }
    };

    let levels = proof
        .siblings
        .iter()
        .rposition(|s| !s.is_zero())
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut cur = terminal;
    for i in (0..levels).rev() {
        let sib = proof.siblings[i];
        cur = if proof.key.bit(i) {
            hasher.hash2(sib, cur)?
        } else {
            hasher.hash2(cur, sib)?
        };
    }
    Ok(cur == root)
}
