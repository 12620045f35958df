//! # Field Elements
//!
//! The scalar domain shared by every key, value, and hash in the
//! commitment: integers in `[0, p)` for the BN254 scalar field prime `p`
//! (which is also the Baby Jubjub base field, so tree roots can be signed
//! without leaving the domain).
//!
//! ## Security Invariant
//!
//! All interchange serialization is base-10 decimal strings — never hex,
//! never raw bytes. The fixed-structure verifier parses decimal; a hex
//! value would silently parse to a different element.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;

/// An element of the commitment field.
///
/// Newtype over the BN254 scalar field. Serializes as a base-10 decimal
/// string for JSON interoperability with the verifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(pub Fr);

impl FieldElement {
    /// The additive identity. Also the canonical hash of an empty tree.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// The multiplicative identity. Also the leaf domain-separation tag.
    pub fn one() -> Self {
        Self(Fr::from(1u64))
    }

    /// True if this element is the field zero.
    pub fn is_zero(&self) -> bool {
        self.0 == Fr::from(0u64)
    }

    /// Interpret bytes as a big-endian unsigned integer, reduced mod `p`.
    ///
    /// This is the canonical byte-to-field mapping for string claims:
    /// values that do not fit the field are reduced before hashing, so
    /// re-encoding is always well defined.
    pub fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Parse a base-10 decimal string.
    ///
    /// Rejects values `>= p` rather than reducing them: a non-canonical
    /// decimal rendering is an interchange error, not a value.
    pub fn from_decimal(s: &str) -> Result<Self, CommitmentError> {
        let n: BigUint = s
            .trim()
            .parse()
            .map_err(|e| CommitmentError::ValueOutOfRange(format!("invalid decimal: {e}")))?;
        if n >= Self::modulus() {
            return Err(CommitmentError::ValueOutOfRange(format!(
                "{s} is not a canonical field element"
            )));
        }
        Ok(Self(Fr::from_le_bytes_mod_order(&n.to_bytes_le())))
    }

    /// Render as a base-10 decimal string (the interchange format).
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_le(&self.0.into_bigint().to_bytes_le()).to_string()
    }

    /// Bit `i` of the canonical integer representation (LSB is bit 0).
    ///
    /// Bit `i` selects the child at depth `i` during tree navigation:
    /// `1` goes right, `0` goes left.
    pub fn bit(&self, i: usize) -> bool {
        self.0.into_bigint().get_bit(i)
    }

    /// Number of bits in the canonical integer representation.
    pub fn num_bits(&self) -> u32 {
        self.0.into_bigint().num_bits()
    }

    /// The field modulus `p` as a big integer.
    pub fn modulus() -> BigUint {
        BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
    }
}

impl From<u64> for FieldElement {
    fn from(v: u64) -> Self {
        Self(Fr::from(v))
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_decimal())
    }
}
