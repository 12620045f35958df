//! # Circuit Input Records
//!
//! Serialization of disclosure proofs and signature data into the flat
//! decimal-string form a fixed-structure verifier consumes. Shapes here
//! are wire formats: field names and flag encodings are fixed by the
//! verifier and must not drift.

use serde::{Deserialize, Serialize};

use sdvc_core::FieldElement;
use sdvc_crypto::{DisclosureProof, IssuerPublicKey, RootSignature, PROOF_DEPTH};

/// Membership-check input: one disclosure proof flattened against a
/// root. All elements render as decimal strings; flags as bare `0`/`1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierInput {
    /// The root commitment the proof is checked against.
    pub root: FieldElement,
    /// Always `1`; the verifier's enable line.
    pub enabled: u8,
    /// Sibling path, root-first, zero-padded to the fixed depth.
    #[serde(with = "sdvc_crypto::smt::sibling_serde")]
    pub siblings: [FieldElement; PROOF_DEPTH],
    #[serde(rename = "oldKey")]
    pub old_key: FieldElement,
    #[serde(rename = "oldValue")]
    pub old_value: FieldElement,
    /// `1` if the exclusion walk ended on an empty subtree.
    #[serde(rename = "isOld0")]
    pub is_old0: u8,
    pub key: FieldElement,
    pub value: FieldElement,
    /// Function selector: `0` inclusion, `1` exclusion.
    pub fnc: u8,
}

impl VerifierInput {
    /// Flatten a proof against the root it should verify under.
    pub fn from_proof(root: FieldElement, proof: &DisclosureProof) -> Self {
        Self {
            root,
            enabled: 1,
            siblings: proof.siblings,
            old_key: proof.old_key,
            old_value: proof.old_value,
            is_old0: u8::from(proof.is_old0),
            key: proof.key,
            value: proof.value,
            fnc: proof.mode.as_flag(),
        }
    }
}

/// Signature-check input: the issuer key, signature components, and the
/// signed message, which is always the root itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureCheckInput {
    #[serde(rename = "Ax")]
    pub ax: FieldElement,
    #[serde(rename = "Ay")]
    pub ay: FieldElement,
    #[serde(rename = "R8x")]
    pub r8x: FieldElement,
    #[serde(rename = "R8y")]
    pub r8y: FieldElement,
    #[serde(rename = "S")]
    pub s: FieldElement,
    #[serde(rename = "M")]
    pub message: FieldElement,
}

impl SignatureCheckInput {
    /// Assemble the signature check over a signed root.
    pub fn new(
        public_key: &IssuerPublicKey,
        signature: &RootSignature,
        root: FieldElement,
    ) -> Self {
        Self {
            ax: public_key.ax(),
            ay: public_key.ay(),
            r8x: signature.r8x(),
            r8y: signature.r8y(),
            s: signature.s(),
            message: root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdvc_core::ClaimSet;
    use sdvc_crypto::IssuerKey;

    use crate::builder::CommitmentBuilder;

    #[test]
    fn inclusion_input_shape() {
        let builder = CommitmentBuilder::new().unwrap();
        let claims = ClaimSet::from_json(r#"{"a": 1, "b": "x"}"#).unwrap();
        let commitment = builder.build(&claims).unwrap();
        let proof = commitment.prove_claim("b").unwrap();
        let input = VerifierInput::from_proof(commitment.root(), &proof);

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["enabled"], 1);
        assert_eq!(json["fnc"], 0);
        assert_eq!(json["isOld0"], 0);
        assert_eq!(json["siblings"].as_array().unwrap().len(), PROOF_DEPTH);
        // Every element is a decimal string, not a JSON number.
        assert!(json["root"].is_string());
        assert!(json["key"].is_string());
        assert!(json["value"].is_string());
        assert!(json["oldKey"].is_string());
        assert!(json["siblings"][0].is_string());
        assert_eq!(json["key"], "1");
    }

    #[test]
    fn exclusion_input_sets_fnc() {
        let builder = CommitmentBuilder::new().unwrap();
        let claims = ClaimSet::from_json(r#"{"a": 1, "b": "x"}"#).unwrap();
        let commitment = builder.build(&claims).unwrap();
        let proof = commitment.prove_key(FieldElement::from(5)).unwrap();
        let input = VerifierInput::from_proof(commitment.root(), &proof);
        assert_eq!(input.fnc, 1);
        assert_eq!(input.value, FieldElement::zero());
    }

    #[test]
    fn signature_input_message_is_root() {
        let key = IssuerKey::generate();
        let root = FieldElement::from(777);
        let sig = key.sign_root(root).unwrap();
        let input = SignatureCheckInput::new(&key.public(), &sig, root);
        assert_eq!(input.message, root);

        let json = serde_json::to_value(&input).unwrap();
        for field in ["Ax", "Ay", "R8x", "R8y", "S", "M"] {
            assert!(json[field].is_string(), "{field} must be a decimal string");
        }
        assert_eq!(json["M"], root.to_decimal());
    }
}
