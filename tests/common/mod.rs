//! Mock watcher replaying canned responses.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use plasma_utxo::rpc::{RpcRequest, RpcResponse};
use plasma_utxo::transport::Transport;
use plasma_utxo::{PlasmaApi, TransportError};
use serde_json::{json, Value};

pub const OWNER: &str = "0x0e5e50883f3a1dd73c170c935339bce1b24a96d0";
pub const PRIVATE_KEY: &str = "0xac32ae83a4067291cda7a268e316376338bef6b63f66d10b8b516c76093c677e";
pub const RECIPIENT: &str = "0xdd15a3ba1287a1069be49a6ebee9ebdb84eafd31";

pub const ETH: &str = "0x0000000000000000000000000000000000000000";
pub const TOKEN_3E96: &str = "0x3e967151f952ec2bef08107e108747f715bb8b70";
pub const TOKEN_3F83: &str = "0x3f83c7446190ae039c54506b0f65ea8ee790ee7e";
pub const TOKEN_DA63: &str = "0xda636e31a9800531418213b5c799960f4585c937";

/// `(currency, blknum, txindex, oindex, amount)`
const UTXOS: &[(&str, u64, u64, u64, u64)] = &[
    (ETH, 1, 0, 0, 1000),
    (TOKEN_3E96, 1000, 0, 1, 49990),
    (TOKEN_3E96, 4, 0, 0, 5000),
    (TOKEN_3E96, 2000, 0, 0, 1),
    (TOKEN_3E96, 3000, 0, 0, 1),
    (TOKEN_3F83, 9000, 63, 1, 49699),
    (TOKEN_3F83, 39000, 25, 1, 4699),
    (TOKEN_DA63, 61000, 0, 1, 1740),
    (TOKEN_DA63, 32000, 0, 0, 1),
    (TOKEN_DA63, 62000, 0, 0, 1),
    (TOKEN_DA63, 63000, 0, 0, 1),
    (TOKEN_DA63, 64000, 0, 0, 1),
];

#[derive(Default)]
pub struct WatcherState {
    pub requests: Vec<RpcRequest>,
    pub submitted: Vec<String>,
    pub next_blknum: u64,
    /// Submissions with these 0-based indices are rejected.
    pub reject: Vec<usize>,
}

pub struct MockWatcher {
    state: Arc<Mutex<WatcherState>>,
}

impl MockWatcher {
    pub fn new() -> (Self, Arc<Mutex<WatcherState>>) {
        let state = Arc::new(Mutex::new(WatcherState {
            next_blknum: 65000,
            ..WatcherState::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

fn ok(data: Value) -> Value {
    json!({"version": "1.0", "success": true, "data": data})
}

fn error(code: &str, description: &str) -> Value {
    json!({
        "version": "1.0",
        "success": false,
        "data": {"object": "error", "code": code, "description": description, "messages": {}}
    })
}

fn utxos_for(address: &str) -> Value {
    let list: Vec<Value> = UTXOS
        .iter()
        .map(|&(currency, blknum, txindex, oindex, amount)| {
            json!({
                "utxo_pos": blknum * 1_000_000_000 + txindex * 10_000 + oindex,
                "txindex": txindex,
                "owner": address,
                "oindex": oindex,
                "currency": currency,
                "blknum": blknum,
                "amount": amount,
            })
        })
        .collect();
    Value::Array(list)
}

impl Transport for MockWatcher {
    fn send_request(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        let param = |key: &str| request.params.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        let body = match request.route {
            "account.get_utxos" => ok(utxos_for(&param("address"))),
            "account.get_balance" => ok(json!([
                {"currency": ETH, "amount": 1000},
                {"currency": TOKEN_DA63, "amount": 1744},
                {"currency": TOKEN_3F83, "amount": 54398},
                {"currency": TOKEN_3E96, "amount": 54992},
            ])),
            "transaction.submit" => {
                let index = state.submitted.len();
                let tx = param("transaction");
                state.submitted.push(tx.clone());
                if state.reject.contains(&index) {
                    error("submit:utxo_not_found", "input utxo not found")
                } else {
                    let blknum = state.next_blknum;
                    state.next_blknum += 1000;
                    let raw = plasma_utxo::Transaction::decode_hex(&tx)
                        .and_then(|t| t.hash())
                        .map(|h| format!("0x{}", hex::encode(h)))
                        .unwrap_or_default();
                    ok(json!({"txindex": 0, "txhash": raw, "blknum": blknum}))
                }
            }
            "utxo.get_challenge_data" => ok(json!({
                "exit_id": "1569204449534724182880927623001191798899298823",
                "input_index": 0,
                "sig": "0x1a37376e8b25ea7b882378b74fadded9819838bdb5c37ccbd7ea427d156ebbb17bb5539e45ab8b31f7b4b18a77e34a83d8c86daa6467bd017d338c6a86450e4e1b",
                "txbytes": "0xf8f7d3c683038a418080c3808080c3808080c3808080f8c0f3946b155558903d96be696fba7c3775ef8a305f31af9400000000000000000000000000000000000000008822b1c8c1227a0000f3944da4ac003adef8f91a0c51c9d608a4af57e51f5b9400000000000000000000000000000000000000008830927f74c9de0000eb94000000000000000000000000000000000000000094000000000000000000000000000000000000000080eb94000000000000000000000000000000000000000094000000000000000000000000000000000000000080a00000000000000000000000000000000000000000000000000000000000000000",
            })),
            _ => error("operation:not_found", "Operation cannot be found. Check request URL."),
        };

        Ok(serde_json::from_value(body)?)
    }
}

pub fn mock_api() -> (PlasmaApi, Arc<Mutex<WatcherState>>) {
    let (watcher, state) = MockWatcher::new();
    (PlasmaApi::with_transport(Box::new(watcher)), state)
}
