//! # Verifiable Credential Orchestration
//!
//! The top layer of the selective-disclosure stack: commits to an
//! ordered claim document, signs the commitment root, and produces both
//! the portable credential record and the circuit input records a
//! fixed-structure verifier consumes.

pub mod builder;
pub mod credential;
pub mod inputs;

pub use builder::{CommitmentBuilder, CredentialCommitment};
pub use credential::{
    issue, CommitmentProof, Issuance, IssuerRecord, PublicKeyRecord, SignatureRecord,
    SignedCredential, PROOF_TYPE,
};
pub use inputs::{SignatureCheckInput, VerifierInput};
