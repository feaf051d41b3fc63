use ethereum_types::U256;
use serde::Deserialize;

use crate::commands;
use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;
use crate::types::{self, Position};

pub const ROUTE: &str = "utxo.get_exit_data";

/// Everything needed to start a standard exit on the root chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExitData {
    #[serde(deserialize_with = "types::de_position")]
    pub utxo_pos: Position,
    #[serde(deserialize_with = "types::de_hex_bytes")]
    pub txbytes: Vec<u8>,
    /// Merkle inclusion proof of the transaction.
    #[serde(deserialize_with = "types::de_hex_bytes")]
    pub proof: Vec<u8>,
    #[serde(default, deserialize_with = "types::de_opt_u256")]
    pub process_timestamp: Option<U256>,
}

pub fn exec(transport: &dyn Transport, position: Position) -> Result<ExitData, PlasmaError> {
    let request = RpcRequest::new(ROUTE).with_param("utxo_pos", position_param(position)?);
    let response = commands::execute(transport, &request)?;
    parse_exit_data_response(response)
}

pub(crate) fn parse_exit_data_response(response: RpcResponse) -> Result<ExitData, PlasmaError> {
    response.into_data(ROUTE)
}

/// Positions go on the wire as JSON integers.
pub(crate) fn position_param(position: Position) -> Result<u64, PlasmaError> {
    u64::try_from(position.0)
        .map_err(|_| PlasmaError::InvalidPosition(format!("{position} does not fit a JSON integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exit_data() {
        let body = r#"{"version":"1.0","success":true,"data":{
            "utxo_pos":1000000000001,
            "txbytes":"0xf8cbd6c58207d08080",
            "proof":"0x00aa",
            "process_timestamp":1560000000}}"#;
        let exit = parse_exit_data_response(RpcResponse::from_slice(body.as_bytes()).unwrap()).unwrap();
        assert_eq!(exit.utxo_pos, Position(1_000_000_000_001));
        assert_eq!(&exit.txbytes[..2], &[0xf8u8, 0xcb]);
        assert_eq!(exit.proof, vec![0x00, 0xaa]);
        assert_eq!(exit.process_timestamp, Some(U256::from(1_560_000_000u64)));
    }

    #[test]
    fn parse_exit_data_bad_hex() {
        let body = r#"{"success":true,"data":{"utxo_pos":1,"txbytes":"0xzz","proof":"0x"}}"#;
        let err = parse_exit_data_response(RpcResponse::from_slice(body.as_bytes()).unwrap()).unwrap_err();
        assert!(matches!(err, PlasmaError::InvalidResponse(_)));
    }

    #[test]
    fn position_param_range() {
        assert_eq!(position_param(Position(42)).unwrap(), 42);
        assert!(matches!(
            position_param(Position(u128::from(u64::MAX) + 1)),
            Err(PlasmaError::InvalidPosition(_))
        ));
    }
}
