//! Transfers against the mock watcher.

#![cfg(feature = "local-signer")]

mod common;

use common::*;
use plasma_utxo::{
    build_transfer, parse_address, BalanceValue, LocalSigner, PlasmaError, Position, Signer, Transaction, Utxo,
    U256,
};

const RAW: &str = "f8cbd6c58207d08080c5820bb88080c3048080c58203e88001f8b2eb94dd15a3ba1287a1069be49a6ebee9ebdb84eafd31943e967151f952ec2bef08107e108747f715bb8b7001ed940e5e50883f3a1dd73c170c935339bce1b24a96d0943e967151f952ec2bef08107e108747f715bb8b7082d6cfeb94000000000000000000000000000000000000000094000000000000000000000000000000000000000080eb94000000000000000000000000000000000000000094000000000000000000000000000000000000000080";
const SIGNATURE: &str = "200d2b4370aac48a5bd9b404224395e6a2395d634973cc7bdf36a2091382a2772670b839b769617e3d2bd992e0dfe6fd1e4515cce060afa5f4f47aec45e555f91c";

fn signer() -> LocalSigner {
    LocalSigner::from_hex(PRIVATE_KEY).unwrap()
}

fn currency_utxos(utxos: &[Utxo], currency: &str) -> Vec<Utxo> {
    let currency = parse_address(currency).unwrap();
    let mut picked: Vec<Utxo> = utxos.iter().filter(|u| u.currency == currency).cloned().collect();
    picked.sort_by_key(|u| u.amount().unwrap());
    picked
}

#[test]
fn fixture_transfer_matches_golden_encoding() {
    let (api, _) = mock_api();
    let owner = parse_address(OWNER).unwrap();
    let utxos = api.get_utxos(&owner).unwrap();
    assert_eq!(utxos.len(), 12);

    let inputs = currency_utxos(&utxos, TOKEN_3E96);
    let mut tx = build_transfer(
        owner,
        parse_address(RECIPIENT).unwrap(),
        parse_address(TOKEN_3E96).unwrap(),
        U256::one(),
        &inputs,
    )
    .unwrap();
    let raw = tx.encode_raw().unwrap();
    assert_eq!(hex::encode(&raw), RAW);

    tx.sign_with(&signer()).unwrap();
    assert_eq!(hex::encode(tx.signatures()[0].unwrap().0), SIGNATURE);

    let mut expected = String::from("f901daf9010c");
    for _ in 0..4 {
        expected.push_str("b841");
        expected.push_str(SIGNATURE);
    }
    expected.push_str(&RAW[4..]);
    assert_eq!(hex::encode(tx.encode_signed().unwrap()), expected);

    let receipt = api.submit_transaction(&tx).unwrap();
    assert_eq!(receipt.blknum, 65000);
    assert_eq!(
        hex::encode(receipt.txhash.as_bytes()),
        "e79904ee24be6a4203761608b3212b1132d164fd2d148e4ad128270ba80005f5"
    );
}

#[test]
fn transfer_selects_exact_single_utxo() {
    let (api, state) = mock_api();
    let recipient = parse_address(RECIPIENT).unwrap();
    let receipt = api
        .transfer(&signer(), &recipient, &parse_address(TOKEN_3E96).unwrap(), U256::one())
        .unwrap();
    assert_eq!(receipt.blknum, 65000);

    let state = state.lock().unwrap();
    assert_eq!(state.submitted.len(), 1);
    let tx = Transaction::decode_hex(&state.submitted[0]).unwrap();
    assert_eq!(tx.inputs().len(), 1);
    assert!(tx.is_fully_signed());
    // exact match, so no change output
    assert_eq!(tx.outputs().len(), 1);
    assert_eq!(tx.outputs()[0].owner, recipient);
    assert_eq!(tx.outputs()[0].amount(), Some(U256::one()));
}

#[test]
fn transfer_prefers_single_over_pair() {
    let (api, state) = mock_api();
    api.transfer(
        &signer(),
        &parse_address(RECIPIENT).unwrap(),
        &parse_address(TOKEN_3F83).unwrap(),
        U256::from(5000),
    )
    .unwrap();

    let state = state.lock().unwrap();
    let tx = Transaction::decode_hex(&state.submitted[0]).unwrap();
    assert_eq!(tx.inputs().len(), 1);
    assert_eq!(tx.inputs()[0].blknum, 9000);
    assert_eq!(tx.outputs()[1].amount(), Some(U256::from(44699)));
}

#[test]
fn transfer_uses_pair_when_needed() {
    let (api, state) = mock_api();
    api.transfer(
        &signer(),
        &parse_address(RECIPIENT).unwrap(),
        &parse_address(TOKEN_3F83).unwrap(),
        U256::from(50000),
    )
    .unwrap();

    let state = state.lock().unwrap();
    let tx = Transaction::decode_hex(&state.submitted[0]).unwrap();
    let blocks: Vec<u64> = tx.inputs().iter().map(|i| i.blknum).collect();
    assert_eq!(blocks, vec![39000, 9000]);
    assert_eq!(tx.outputs()[1].amount(), Some(U256::from(4398)));
}

#[test]
fn insufficient_funds_submits_nothing() {
    let (api, state) = mock_api();
    let recipient = parse_address(RECIPIENT).unwrap();
    let currency = parse_address(TOKEN_DA63).unwrap();

    let err = api.transfer(&signer(), &recipient, &currency, U256::from(1745)).unwrap_err();
    assert!(matches!(err, PlasmaError::InsufficientFunds { .. }));

    let err = api.transfer(&signer(), &recipient, &currency, U256::from(1744)).unwrap_err();
    assert!(matches!(err, PlasmaError::InsufficientSingleTxFunds { .. }));

    assert!(state.lock().unwrap().submitted.is_empty());
}

#[test]
fn rejected_submission_is_reported() {
    let (api, state) = mock_api();
    state.lock().unwrap().reject.push(0);
    let err = api
        .transfer(&signer(), &parse_address(RECIPIENT).unwrap(), &parse_address(ETH).unwrap(), U256::from(10))
        .unwrap_err();
    match err {
        PlasmaError::SubmissionFailed { code, .. } => assert_eq!(code, "submit:utxo_not_found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn balances_match_utxo_totals() {
    let (api, _) = mock_api();
    let owner = signer().address();
    let utxos = api.get_utxos(&owner).unwrap();
    for balance in api.get_balance(&owner).unwrap() {
        let BalanceValue::Fungible { amount } = balance.value else {
            panic!("fixture balances are fungible");
        };
        let total = plasma_utxo::utxo::total_amount(utxos.iter().filter(|u| u.currency == balance.currency)).unwrap();
        assert_eq!(total, amount);
    }
}

#[test]
fn challenge_data_from_watcher() {
    let (api, state) = mock_api();
    let data = api.get_challenge_data(Position(1_000_000_000_001)).unwrap();
    assert_eq!(data.input_index, 0);
    assert_eq!(data.signature.0.len(), 65);
    assert_eq!(data.txbytes[0], 0xf8);

    let state = state.lock().unwrap();
    assert_eq!(state.requests[0].route, "utxo.get_challenge_data");
}

#[test]
fn unknown_route_is_rpc_error() {
    let (api, _) = mock_api();
    let err = api.get_exit_data(Position(1)).unwrap_err();
    assert!(matches!(err, PlasmaError::Rpc { code, .. } if code == "operation:not_found"));
}
