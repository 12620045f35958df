//! # Commitment Cryptography
//!
//! The hashing, tree, and signature layer of the selective-disclosure
//! stack. Exposes the Poseidon capability handle, canonical claim
//! encoders, the sparse Merkle tree with fixed-depth proofs, and Baby
//! Jubjub EdDSA binding of tree roots to issuers.
//!
//! Everything here operates on `sdvc_core::FieldElement`; claim-level
//! orchestration lives in `sdvc-vc`.

pub mod eddsa;
pub mod encode;
pub mod poseidon;
pub mod smt;

pub use eddsa::{verify_root, IssuerKey, IssuerPublicKey, RootSignature};
pub use encode::{encode_int, encode_text};
pub use poseidon::PoseidonHash;
pub use smt::{verify_proof, DisclosureProof, ProofMode, SparseMerkleTree, PROOF_DEPTH};
