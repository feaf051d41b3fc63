use serde::Deserialize;

use crate::commands;
use crate::commands::get_exit_data::position_param;
use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;
use crate::types::{self, Position, Signature};

pub const ROUTE: &str = "utxo.get_challenge_data";

/// Data for challenging a standard exit of an already spent output: the
/// spending transaction and the signature over the spent input.
///
/// Watchers of later protocol versions also send an `exit_id`, which is
/// ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeData {
    #[serde(default, deserialize_with = "types::de_opt_position")]
    pub utxo_pos: Option<Position>,
    pub input_index: u16,
    #[serde(rename = "sig", deserialize_with = "types::de_signature")]
    pub signature: Signature,
    #[serde(deserialize_with = "types::de_hex_bytes")]
    pub txbytes: Vec<u8>,
}

pub fn exec(transport: &dyn Transport, position: Position) -> Result<ChallengeData, PlasmaError> {
    let request = RpcRequest::new(ROUTE).with_param("utxo_pos", position_param(position)?);
    let response = commands::execute(transport, &request)?;
    parse_challenge_data_response(response)
}

pub(crate) fn parse_challenge_data_response(response: RpcResponse) -> Result<ChallengeData, PlasmaError> {
    response.into_data(ROUTE)
}
