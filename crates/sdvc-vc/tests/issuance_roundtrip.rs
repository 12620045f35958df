//! End-to-end issuance flow: parse a claim document, issue a signed
//! credential, then produce and check disclosure proofs and circuit
//! inputs for individual claims, including one from a nested group.

use sdvc_core::{ClaimSet, FieldElement};
use sdvc_crypto::{verify_proof, verify_root, IssuerKey, IssuerPublicKey, ProofMode, RootSignature};
use sdvc_vc::{issue, CommitmentBuilder, SignatureCheckInput, SignedCredential, VerifierInput, PROOF_TYPE};

const CLAIMS: &str = r#"{
    "name": "ham",
    "age": 25,
    "alumniOf": {
        "id": "did:example:c34fb4561237890",
        "name": "Example University"
    }
}"#;

#[test]
fn issue_then_selectively_disclose() {
    let builder = CommitmentBuilder::new().unwrap();
    let key = IssuerKey::generate();
    let claims = ClaimSet::from_json(CLAIMS).unwrap();

    let out = issue(&builder, &key, claims).unwrap();
    let root = out.commitment.root();
    assert_eq!(out.credential.proof.merkle_root, root);
    assert_eq!(out.credential.proof.proof_type, PROOF_TYPE);

    // Disclose just the age.
    let age_proof = out.commitment.prove_claim("age").unwrap();
    assert_eq!(age_proof.mode, ProofMode::Inclusion);
    assert_eq!(age_proof.key, FieldElement::from(1));
    assert_eq!(age_proof.value, FieldElement::from(25));
    assert!(verify_proof(builder.hasher(), root, &age_proof).unwrap());

    // Disclose a claim inside the nested group against the sub-root.
    let sub = out.commitment.subtree("alumniOf").unwrap();
    let id_proof = sub.prove_claim("id").unwrap();
    assert!(verify_proof(builder.hasher(), sub.root(), &id_proof).unwrap());
    // The sub-root itself is provable in the parent tree.
    let group_proof = out.commitment.prove_claim("alumniOf").unwrap();
    assert_eq!(group_proof.value, sub.root());
    assert!(verify_proof(builder.hasher(), root, &group_proof).unwrap());

    // Demonstrate absence of a fourth claim.
    let absent = out.commitment.prove_key(FieldElement::from(3)).unwrap();
    assert_eq!(absent.mode, ProofMode::Exclusion);
    assert!(verify_proof(builder.hasher(), root, &absent).unwrap());
}

#[test]
fn circuit_inputs_carry_the_signed_root() {
    let builder = CommitmentBuilder::new().unwrap();
    let key = IssuerKey::generate();
    let claims = ClaimSet::from_json(CLAIMS).unwrap();
    let out = issue(&builder, &key, claims).unwrap();
    let root = out.commitment.root();

    let proof = out.commitment.prove_claim("age").unwrap();
    let membership = VerifierInput::from_proof(root, &proof);
    assert_eq!(membership.root, root);
    assert_eq!(membership.enabled, 1);
    assert_eq!(membership.fnc, 0);

    // Rebuild the signature from the record, as a verifier would.
    let record = &out.credential;
    let public_key = IssuerPublicKey::from_coordinates(
        record.issuer.public_key.ax,
        record.issuer.public_key.ay,
    )
    .unwrap();
    let signature = RootSignature::from_parts(
        record.proof.signature.r8x,
        record.proof.signature.r8y,
        record.proof.signature.s,
    )
    .unwrap();
    assert!(verify_root(&public_key, root, &signature).unwrap());

    let sig_input = SignatureCheckInput::new(&public_key, &signature, root);
    assert_eq!(sig_input.message, root);
    assert_eq!(sig_input.ax, record.issuer.public_key.ax);
}

#[test]
fn credential_record_survives_transport() {
    let builder = CommitmentBuilder::new().unwrap();
    let key = IssuerKey::generate();
    let claims = ClaimSet::from_json(CLAIMS).unwrap();
    let out = issue(&builder, &key, claims).unwrap();

    let json = serde_json::to_string_pretty(&out.credential).unwrap();
    let parsed: SignedCredential = serde_json::from_str(&json).unwrap();
    assert!(parsed.verify(&builder).unwrap());

    // Claim order survives transport, so the root recomputes.
    let names: Vec<&str> = parsed.claims.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["name", "age", "alumniOf"]);
}

#[test]
fn holder_cannot_migrate_proof_between_credentials() {
    let builder = CommitmentBuilder::new().unwrap();
    let key = IssuerKey::generate();
    let a = issue(
        &builder,
        &key,
        ClaimSet::from_json(r#"{"name": "ham", "age": 25}"#).unwrap(),
    )
    .unwrap();
    let b = issue(
        &builder,
        &key,
        ClaimSet::from_json(r#"{"name": "ham", "age": 17}"#).unwrap(),
    )
    .unwrap();

    // A proof from credential a does not verify under credential b's root.
    let proof = a.commitment.prove_claim("age").unwrap();
    assert!(verify_proof(builder.hasher(), a.commitment.root(), &proof).unwrap());
    assert!(!verify_proof(builder.hasher(), b.commitment.root(), &proof).unwrap());
}
