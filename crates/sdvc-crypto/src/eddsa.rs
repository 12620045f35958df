//! # Root Signature Binding
//!
//! Binds a tree root to an issuer with Baby Jubjub EdDSA. The signed
//! message is the root itself as one base-field element, with no
//! serialization step in between, so the signature check inside a
//! fixed-structure verifier is a single curve equation over the same
//! field the tree hashes in.
//!
//! ## Security Invariant
//!
//! The Baby Jubjub base field and the tree's commitment field share one
//! modulus, so a root always converts losslessly into a signable
//! message. The conversion is still checked: a mismatch between the two
//! primitives is a configuration error and must surface as
//! `FieldMismatch`, never as a silently reduced message.

use ark_babyjubjub::{EdwardsAffine, Fq};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use eddsa_babyjubjub::{EdDSAPrivateKey, EdDSAPublicKey, EdDSASignature};
use sdvc_core::{CommitmentError, FieldElement};

/// Lift a commitment-field element into the signature base field.
fn to_base_field(x: FieldElement) -> Result<Fq, CommitmentError> {
    Fq::from_bigint(x.0.into_bigint()).ok_or_else(|| {
        CommitmentError::FieldMismatch(format!(
            "element {} does not embed into the signature base field",
            x.to_decimal()
        ))
    })
}

/// Read a base-field coordinate back into the commitment field.
fn from_base_field(q: Fq) -> FieldElement {
    // Same modulus, so the canonical representation always fits.
    FieldElement(Fr::from_le_bytes_mod_order(&q.into_bigint().to_bytes_le()))
}

/// Read a subgroup scalar into the commitment field.
///
/// The subgroup order is far below the field modulus, so this never
/// reduces.
fn from_scalar(s: ark_babyjubjub::Fr) -> FieldElement {
    FieldElement(Fr::from_le_bytes_mod_order(&s.into_bigint().to_bytes_le()))
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// An issuer's Baby Jubjub signing key.
pub struct IssuerKey {
    sk: EdDSAPrivateKey,
}

impl IssuerKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            sk: EdDSAPrivateKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// The corresponding public key.
    pub fn public(&self) -> IssuerPublicKey {
        IssuerPublicKey::from_inner(self.sk.public())
    }

    /// Sign a tree root.
    pub fn sign_root(&self, root: FieldElement) -> Result<RootSignature, CommitmentError> {
        let msg = to_base_field(root)?;
        Ok(RootSignature::from_inner(self.sk.sign(msg)))
    }
}

impl std::fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IssuerKey(<private>)")
    }
}

/// An issuer's public verification key, with the Edwards coordinates
/// pre-converted into the commitment field for record serialization.
#[derive(Debug, Clone)]
pub struct IssuerPublicKey {
    inner: EdDSAPublicKey,
    ax: FieldElement,
    ay: FieldElement,
}

impl IssuerPublicKey {
    fn from_inner(inner: EdDSAPublicKey) -> Self {
        let ax = from_base_field(inner.pk.x);
        let ay = from_base_field(inner.pk.y);
        Self { inner, ax, ay }
    }

    /// Reconstruct a public key from its recorded coordinates.
    ///
    /// Fails with `FieldMismatch` if the coordinates do not name a
    /// point on the curve.
    pub fn from_coordinates(
        ax: FieldElement,
        ay: FieldElement,
    ) -> Result<Self, CommitmentError> {
        let point = EdwardsAffine::new_unchecked(to_base_field(ax)?, to_base_field(ay)?);
        if !point.is_on_curve() {
            return Err(CommitmentError::FieldMismatch(format!(
                "public key ({}, {}) is not on the curve",
                ax.to_decimal(),
                ay.to_decimal()
            )));
        }
        Ok(Self {
            inner: EdDSAPublicKey { pk: point },
            ax,
            ay,
        })
    }

    /// The x coordinate of the public point.
    pub fn ax(&self) -> FieldElement {
        self.ax
    }

    /// The y coordinate of the public point.
    pub fn ay(&self) -> FieldElement {
        self.ay
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// An EdDSA signature over a tree root.
///
/// Carries the curve-native signature plus its components in the
/// commitment field, the form credential records and circuit inputs use.
#[derive(Debug, Clone)]
pub struct RootSignature {
    inner: EdDSASignature,
    r8x: FieldElement,
    r8y: FieldElement,
    s: FieldElement,
}

impl RootSignature {
    fn from_inner(inner: EdDSASignature) -> Self {
        let r8x = from_base_field(inner.r.x);
        let r8y = from_base_field(inner.r.y);
        let s = from_scalar(inner.s);
        Self { inner, r8x, r8y, s }
    }

    /// Reconstruct a signature from its recorded components.
    ///
    /// Fails with `FieldMismatch` if `R8` is not on the curve or `S`
    /// exceeds the subgroup order.
    pub fn from_parts(
        r8x: FieldElement,
        r8y: FieldElement,
        s: FieldElement,
    ) -> Result<Self, CommitmentError> {
        let r8 = EdwardsAffine::new_unchecked(to_base_field(r8x)?, to_base_field(r8y)?);
        if !r8.is_on_curve() {
            return Err(CommitmentError::FieldMismatch(
                "signature nonce point is not on the curve".to_string(),
            ));
        }
        let s = ark_babyjubjub::Fr::from_bigint(s.0.into_bigint()).ok_or_else(|| {
            CommitmentError::FieldMismatch(format!(
                "signature scalar {} exceeds the subgroup order",
                s.to_decimal()
            ))
        })?;
        Ok(Self::from_inner(EdDSASignature { r: r8, s }))
    }

    /// The x coordinate of the nonce point `R8`.
    pub fn r8x(&self) -> FieldElement {
        self.r8x
    }

    /// The y coordinate of the nonce point `R8`.
    pub fn r8y(&self) -> FieldElement {
        self.r8y
    }

    /// The scalar component `S`.
    pub fn s(&self) -> FieldElement {
        self.s
    }
}

/// Check a root signature against an issuer's public key.
///
/// A well-formed but wrong signature returns `Ok(false)`; `Err` is
/// reserved for domain mismatches between the primitives.
pub fn verify_root(
    public_key: &IssuerPublicKey,
    root: FieldElement,
    signature: &RootSignature,
) -> Result<bool, CommitmentError> {
    let msg = to_base_field(root)?;
    Ok(public_key.inner.verify(msg, &signature.inner))
}
