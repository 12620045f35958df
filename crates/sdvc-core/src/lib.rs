//! # Core Types for Selective-Disclosure Credentials
//!
//! Foundational vocabulary shared by the whole stack: field elements in
//! the commitment domain, the ordered claim model, and the error
//! hierarchy. This crate holds no cryptography beyond the field
//! arithmetic itself; hashing and signing live in `sdvc-crypto`.

pub mod claims;
pub mod error;
pub mod field;

pub use claims::{ClaimSet, ClaimValue};
pub use error::CommitmentError;
pub use field::FieldElement;
