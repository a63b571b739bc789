use blsct_curve::{Decode, Encode, HexCodec, Point};
use blsct_range_proof::{AmountRecoveryRequest, RangeProof, gamma_from_nonce};
use blsct_token::TokenId;

fn request(amount: u64, message: &str) -> AmountRecoveryRequest {
    let nonce = Point::random();
    let proof = RangeProof::build(&[amount], &nonce, message, &TokenId::native()).unwrap();
    AmountRecoveryRequest::new(proof, nonce)
}

#[test]
fn batch_recovery_matches_single_recovery() {
    let requests: Vec<_> = (0..5u64)
        .map(|i| request(1_000 * (i + 1), &format!("msg-{i}")))
        .collect();

    let batch = RangeProof::recover_amounts(&requests);
    assert_eq!(batch.len(), requests.len());

    for (i, (req, result)) in requests.iter().zip(&batch).enumerate() {
        let alone = RangeProof::recover_amounts(std::slice::from_ref(req));
        assert_eq!(&alone[0], result);
        assert!(result.success);
        assert_eq!(result.amount, 1_000 * (i as u64 + 1));
        assert_eq!(result.message, format!("msg-{i}"));
        assert_eq!(result.gamma, gamma_from_nonce(&req.nonce, 0));
    }

    // Order does not matter
    let reversed: Vec<_> = requests.iter().rev().cloned().collect();
    let mut again = RangeProof::recover_amounts(&reversed);
    again.reverse();
    assert_eq!(again, batch);
}

#[test]
fn wrong_nonce_does_not_affect_siblings() {
    let good = request(10, "a");
    let mut bad = request(20, "b");
    bad.nonce = Point::random();

    let results = RangeProof::recover_amounts(&[good.clone(), bad, good]);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].amount, 0);
    assert!(results[2].success);
    assert_eq!(results[0], results[2]);
}

#[test]
fn multi_amount_proof_recovers_first_amount() {
    let nonce = Point::random();
    let proof = RangeProof::build(&[3, 4, 5], &nonce, "three", &TokenId::from_token(2)).unwrap();
    assert!(RangeProof::verify_proofs(std::slice::from_ref(&proof)));

    let result = AmountRecoveryRequest::new(proof, nonce).recover();
    assert!(result.success);
    assert_eq!(result.amount, 3);
    assert_eq!(result.message, "three");
}

#[test]
fn batch_verification_is_all_or_nothing() {
    let a = request(1, "").range_proof;
    let b = request(2, "").range_proof;
    assert!(RangeProof::verify_proofs(&[a.clone(), b.clone()]));
    assert!(RangeProof::verify_proofs(&[]));

    let mut bytes = b.to_bytes();
    // Flip a bit inside the ciphertext
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered = RangeProof::from_bytes(&bytes).unwrap();
    assert!(!RangeProof::verify_proofs(&[a, tampered]));
}

#[test]
fn hex_roundtrip_keeps_proof_valid() {
    let req = request(123_456, "navio");
    let decoded = RangeProof::from_hex(&req.range_proof.to_hex()).unwrap();
    assert_eq!(decoded, req.range_proof);
    let result = AmountRecoveryRequest::new(decoded, req.nonce).recover();
    assert_eq!(result.amount, 123_456);
}
