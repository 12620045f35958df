//! # Signed Credential Records
//!
//! The issuance surface: build a commitment over the claims, sign its
//! root, self-check the signature, and assemble the credential record
//! that travels with the claims. Field elements serialize as decimal
//! strings throughout, matching what fixed-structure verifiers parse.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use sdvc_core::{ClaimSet, CommitmentError, FieldElement};
use sdvc_crypto::{verify_root, IssuerKey, IssuerPublicKey, RootSignature};

use crate::builder::{CommitmentBuilder, CredentialCommitment};

/// Proof type identifier carried in every credential record.
pub const PROOF_TYPE: &str = "BabyJubJubSMTSignature2024";

/// A credential: the claims plus the commitment proof binding them to
/// an issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedCredential {
    /// The disclosed claim document, in declaration order.
    pub claims: ClaimSet,
    /// The commitment proof over those claims.
    pub proof: CommitmentProof,
    /// The issuer's public key record.
    pub issuer: IssuerRecord,
}

/// The commitment proof block of a credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentProof {
    /// Proof type identifier, always [`PROOF_TYPE`].
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Issuance timestamp, RFC 3339 in UTC.
    pub created: String,
    /// The signed tree root.
    #[serde(rename = "merkleRoot")]
    pub merkle_root: FieldElement,
    /// EdDSA signature over the root.
    pub signature: SignatureRecord,
}

/// Signature components in record form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    #[serde(rename = "R8x")]
    pub r8x: FieldElement,
    #[serde(rename = "R8y")]
    pub r8y: FieldElement,
    #[serde(rename = "S")]
    pub s: FieldElement,
}

impl SignatureRecord {
    fn from_signature(sig: &RootSignature) -> Self {
        Self {
            r8x: sig.r8x(),
            r8y: sig.r8y(),
            s: sig.s(),
        }
    }
}

/// Issuer block of a credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerRecord {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyRecord,
}

/// Issuer public key coordinates in record form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    #[serde(rename = "Ax")]
    pub ax: FieldElement,
    #[serde(rename = "Ay")]
    pub ay: FieldElement,
}

/// Result of issuance: the portable record plus the in-memory
/// commitment kept for later claim proofs.
#[derive(Debug, Clone)]
pub struct Issuance {
    pub credential: SignedCredential,
    pub commitment: CredentialCommitment,
}

/// Issue a credential over a claim set.
///
/// Builds the commitment, signs the root, and verifies the signature
/// before returning. The self-check turns a field-domain mismatch
/// between tree and signature primitives into an issuance failure
/// instead of an unverifiable credential in the wild.
pub fn issue(
    builder: &CommitmentBuilder,
    key: &IssuerKey,
    claims: ClaimSet,
) -> Result<Issuance, CommitmentError> {
    let commitment = builder.build(&claims)?;
    let root = commitment.root();
    let signature = key.sign_root(root)?;
    let public_key = key.public();
    if !verify_root(&public_key, root, &signature)? {
        return Err(CommitmentError::FieldMismatch(
            "freshly issued signature failed self-verification".to_string(),
        ));
    }

    let credential = SignedCredential {
        claims,
        proof: CommitmentProof {
            proof_type: PROOF_TYPE.to_string(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            merkle_root: root,
            signature: SignatureRecord::from_signature(&signature),
        },
        issuer: IssuerRecord {
            public_key: PublicKeyRecord {
                ax: public_key.ax(),
                ay: public_key.ay(),
            },
        },
    };
    Ok(Issuance {
        credential,
        commitment,
    })
}

impl SignedCredential {
    /// Check a credential record end to end: the proof type, the root
    /// recomputed from the claims, and the issuer's signature over it.
    pub fn verify(&self, builder: &CommitmentBuilder) -> Result<bool, CommitmentError> {
        if self.proof.proof_type != PROOF_TYPE {
            return Ok(false);
        }
        let commitment = builder.build(&self.claims)?;
        if commitment.root() != self.proof.merkle_root {
            return Ok(false);
        }
        let public_key = IssuerPublicKey::from_coordinates(
            self.issuer.public_key.ax,
            self.issuer.public_key.ay,
        )?;
        let signature = RootSignature::from_parts(
            self.proof.signature.r8x,
            self.proof.signature.r8y,
            self.proof.signature.s,
        )?;
        verify_root(&public_key, self.proof.merkle_root, &signature)
    }
}
