//! Two-transaction walkthrough: fund a wallet, then spend the received
//! output to a second wallet with change.

use anyhow::{Context, Result, bail};
use blsct_curve::{HexCodec, Point, Scalar};
use blsct_keys::PrivSpendingKey;
use blsct_token::TokenId;
use blsct_transaction::{FeePolicy, OutPoint, OutputType, SpentOutput, Tx, TxIn, TxOut};

use crate::keys::Wallet;

pub fn run(amount: u64) -> Result<()> {
    let policy = FeePolicy::configured();
    let alice = Wallet::from_seed(&Scalar::random())?;
    let bob = Wallet::from_seed(&Scalar::random())?;
    let native = TokenId::native();

    // Funding: a synthetic coin pays `amount` to alice's (0, 1)
    let funding_fee = policy.fee_for(1, 1).context("fee overflow")?;
    let total = amount.checked_add(funding_fee).context("amount overflow")?;
    let gamma = Scalar::random();
    let key = Scalar::random();
    let coin = TxIn::build(total, gamma, key, native, OutPoint::default(), false, false);
    let coin_spent = SpentOutput {
        commitment: native.value_generator()? * Scalar::from_u64(total) + Point::mul_base(&gamma),
        spending_key: Point::mul_base(&key),
    };
    let alice_addr = alice.sub_addr(0, 1);
    let out = TxOut::build(&alice_addr, amount, "demo funding", &native, OutputType::Normal, 0)?;
    let funding = Tx::build_with_fee_policy(&[coin], &[out], policy)?;
    funding.verify(&[coin_spent])?;
    println!("✅ Funding tx {} ({} bytes)", funding.tx_id(), funding.serialize().len());

    // Alice scans the funding tx
    let (index, ctx_out) = funding
        .outputs()
        .iter()
        .enumerate()
        .find(|(_, o)| {
            o.blsct_data
                .as_ref()
                .is_some_and(|d| d.is_for(&alice.view, &alice_addr))
        })
        .context("alice found no output")?;
    let Some(data) = ctx_out.blsct_data.as_ref() else {
        bail!("output {index} has no confidential data");
    };
    let recovered = data.recover(&alice.view);
    if !recovered.success {
        bail!("amount recovery failed");
    }
    println!(
        "🔍 Alice recovered {} with memo {:?}",
        recovered.amount, recovered.message
    );

    // Alice pays half to bob, keeps the rest minus fee as change
    let one_time = PrivSpendingKey::generate(&data.blinding_key, &alice.view, &alice.spend, 0, 1);
    let tx_in = TxIn::build(
        recovered.amount,
        recovered.gamma,
        one_time,
        native,
        OutPoint::new(funding.tx_id(), index as u32),
        false,
        false,
    );
    let fee = policy.fee_for(1, 2).context("fee overflow")?;
    let to_bob = recovered.amount / 2;
    let change = recovered
        .amount
        .checked_sub(to_bob + fee)
        .context("amount too small to cover the fee")?;
    let outs = [
        TxOut::build(&bob.sub_addr(0, 0), to_bob, "for bob", &native, OutputType::Normal, 0)?,
        TxOut::build(&alice.sub_addr(0, 2), change, "change", &native, OutputType::Normal, 0)?,
    ];
    let payment = Tx::build_with_fee_policy(&[tx_in], &outs, policy)?;
    let spent = SpentOutput::from_ctx_out(ctx_out).context("spent output is not confidential")?;

    let decoded = Tx::from_hex(&payment.to_hex())?;
    decoded.verify(&[spent])?;
    println!(
        "✅ Payment tx {} verified: {} to bob, {} change, fee {}",
        decoded.tx_id(),
        to_bob,
        change,
        decoded.fee()
    );

    let bob_addr = bob.sub_addr(0, 0);
    let bob_found = decoded
        .outputs()
        .iter()
        .filter_map(|o| o.blsct_data.as_ref())
        .filter(|d| d.is_for(&bob.view, &bob_addr))
        .map(|d| d.recover(&bob.view).amount)
        .sum::<u64>();
    println!("🔍 Bob recovered {bob_found}");

    Ok(())
}
