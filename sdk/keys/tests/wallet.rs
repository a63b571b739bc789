use blsct_curve::{HexCodec, Point, Scalar};
use blsct_keys::{
    ChildKey, DoublePublicKey, HashId, PrivSpendingKey, PublicKey, StealthOutput, SubAddr,
    SubAddrId, ViewTag,
};

#[test]
fn seed_42_hierarchy_and_hash_id() {
    let child = ChildKey::from_seed(&Scalar::from_u64(42)).unwrap();
    let tx_key = child.to_tx_key();
    let view_key = tx_key.to_view_key();
    let spending_key = tx_key.to_spending_key();

    let view_pub = PublicKey::from_scalar(view_key.as_scalar());
    let spend_pub = PublicKey::from_scalar(spending_key.as_scalar());
    assert_ne!(view_pub, spend_pub);

    let blinding_pub = *PublicKey::random().as_point();
    let first = HashId::generate(&blinding_pub, spend_pub.as_point(), &view_key);
    let second = HashId::generate(&blinding_pub, spend_pub.as_point(), &view_key);
    assert_eq!(first, second);
    assert_eq!(first.as_bytes().len(), 20);
}

#[test]
fn payer_and_payee_agree_on_destination() {
    let tx_key = ChildKey::from_seed(&Scalar::random()).unwrap().to_tx_key();
    let view_key = tx_key.to_view_key();
    let spending_key = tx_key.to_spending_key();
    let spend_pub = spending_key.to_public_key();

    // Payee hands out sub-address (7, 11) as a DoublePublicKey
    let published = DoublePublicKey::from_keys_account_address(&view_key, &spend_pub, 7, 11);
    let published = DoublePublicKey::from_hex(&published.to_hex()).unwrap();

    // Payer builds an output from the published key alone
    let destination = SubAddr::from_double_public_key(&published);
    let blinding = Scalar::random();
    let out = StealthOutput::derive(&destination, &blinding);

    // Payee scans: view tag, then hash id, then one-time key
    assert_eq!(ViewTag::generate(&out.blinding_key, &view_key), out.view_tag);
    let own = SubAddr::generate(&view_key, &spend_pub, SubAddrId::new(7, 11));
    assert_eq!(
        HashId::generate(&out.blinding_key, &out.spending_key, &view_key),
        HashId::from_sub_addr(&own)
    );
    let one_time = PrivSpendingKey::generate(&out.blinding_key, &view_key, &spending_key, 7, 11);
    assert_eq!(Point::mul_base(one_time.as_scalar()), out.spending_key);

    // and can sign with it
    let sig = one_time.sign(b"spend").unwrap();
    assert!(PublicKey::from_point(out.spending_key).verify(b"spend", &sig));
}

#[test]
fn stranger_cannot_match_output() {
    let alice = ChildKey::from_seed(&Scalar::from_u64(1)).unwrap().to_tx_key();
    let bob = ChildKey::from_seed(&Scalar::from_u64(2)).unwrap().to_tx_key();

    let alice_sub = SubAddr::generate(
        &alice.to_view_key(),
        &alice.to_spending_key().to_public_key(),
        SubAddrId::default(),
    );
    let out = StealthOutput::derive(&alice_sub, &Scalar::random());

    let bob_sub = SubAddr::generate(
        &bob.to_view_key(),
        &bob.to_spending_key().to_public_key(),
        SubAddrId::default(),
    );
    assert_ne!(
        HashId::generate(&out.blinding_key, &out.spending_key, &bob.to_view_key()),
        HashId::from_sub_addr(&bob_sub)
    );
}
