//! # Error Types — Commitment Error Hierarchy
//!
//! Structured errors for claim encoding, tree construction, and signature
//! binding. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Encoding and tree errors fail the whole build: a partially built
//!   tree has an undefined root, so no partial commitment is ever
//!   returned to a caller.
//! - All operations are deterministic; a failed call will fail the same
//!   way on retry. The correct response is to fix the input.

use thiserror::Error;

/// Errors from commitment construction and proof generation.
#[derive(Error, Debug)]
pub enum CommitmentError {
    /// A claim value cannot be canonically encoded as a field element.
    #[error("claim value cannot be canonically encoded: {0}")]
    ValueOutOfRange(String),

    /// A key requires more bits than the fixed proof depth supports.
    #[error("key {key} requires {bits} bits, exceeding the fixed proof depth {max}")]
    KeyTooLarge {
        /// Decimal rendering of the offending key.
        key: String,
        /// Number of bits the key occupies.
        bits: u32,
        /// The fixed proof depth shared with the verifier.
        max: u32,
    },

    /// The same key was inserted twice into one tree.
    #[error("duplicate key {0} in one tree")]
    DuplicateKey(String),

    /// The tree and signature primitives disagree on field modulus or
    /// element encoding.
    #[error("field domain mismatch between tree and signature primitives: {0}")]
    FieldMismatch(String),

    /// An external hash or signature capability is not available.
    #[error("cryptographic primitive unavailable: {0}")]
    PrimitiveUnavailable(String),

    /// A claim name was requested that is not part of the commitment.
    #[error("unknown claim: {0}")]
    UnknownClaim(String),
}
