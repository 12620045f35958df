//! # Canonical Claim Encoding
//!
//! Maps primitive claim values onto field elements before they enter the
//! tree. Nested claim groups are encoded by the commitment builder in
//! `sdvc-vc`, which recurses into a sub-tree and uses the sub-root as the
//! value here.
//!
//! ## Security Invariant
//!
//! The encoding is injective per type but not across types: `Int(120)`
//! and `Text("x")` encode differently (the text path hashes), so a text
//! claim can never be confused with the integer of its byte rendering.

use sdvc_core::{CommitmentError, FieldElement};

use crate::poseidon::PoseidonHash;

/// Encode a non-negative integer claim value.
///
/// Direct embedding: `u64` always fits the field, so this cannot fail
/// and needs no hashing.
pub fn encode_int(value: u64) -> FieldElement {
    FieldElement::from(value)
}

/// Encode a text claim value.
///
/// UTF-8 bytes are read as one big-endian integer, reduced into the
/// field, then hashed with arity-1 Poseidon. Hashing keeps long strings
/// from colliding after reduction and keeps every text value the same
/// distance from its preimage.
pub fn encode_text(hasher: &PoseidonHash, text: &str) -> Result<FieldElement, CommitmentError> {
    let reduced = FieldElement::from_be_bytes_reduce(text.as_bytes());
    hasher.hash(&[reduced])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_is_direct() {
        assert_eq!(encode_int(0), FieldElement::zero());
        assert_eq!(encode_int(25), FieldElement::from(25));
        assert_eq!(encode_int(u64::MAX), FieldElement::from(u64::MAX));
    }

    #[test]
    fn text_is_hashed_not_embedded() {
        let h = PoseidonHash::init().unwrap();
        // "x" reduces to 120 before hashing; the encoding must not equal
        // the raw integer.
        let enc = encode_text(&h, "x").unwrap();
        assert_ne!(enc, FieldElement::from(120));
        assert_eq!(enc, h.hash(&[FieldElement::from(120)]).unwrap());
    }

    #[test]
    fn text_is_deterministic_and_distinguishing() {
        let h = PoseidonHash::init().unwrap();
        assert_eq!(encode_text(&h, "ham").unwrap(), encode_text(&h, "ham").unwrap());
        assert_ne!(encode_text(&h, "ham").unwrap(), encode_text(&h, "spam").unwrap());
    }

    #[test]
    fn empty_text_encodes() {
        let h = PoseidonHash::init().unwrap();
        // Empty string reduces to 0 and is still hashed.
        let enc = encode_text(&h, "").unwrap();
        assert_eq!(enc, h.hash(&[FieldElement::zero()]).unwrap());
    }
}
