use ethereum_types::Address;

use crate::commands;
use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;
use crate::types::address_hex;
use crate::utxo::Utxo;

pub const ROUTE: &str = "account.get_utxos";

/// Request: `{"address": "0x.."}`
pub fn exec(transport: &dyn Transport, address: &Address) -> Result<Vec<Utxo>, PlasmaError> {
    let request = RpcRequest::new(ROUTE).with_param("address", address_hex(address));
    let response = commands::execute(transport, &request)?;
    parse_utxos_response(response)
}

pub(crate) fn parse_utxos_response(response: RpcResponse) -> Result<Vec<Utxo>, PlasmaError> {
    response.into_data(ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethereum_types::U256;

    fn parse(body: &str) -> Result<Vec<Utxo>, PlasmaError> {
        parse_utxos_response(RpcResponse::from_slice(body.as_bytes()).unwrap())
    }

    #[test]
    fn parse_utxo_list() {
        let utxos = parse(
            r#"{"version":"1.0","success":true,"data":[
                {"utxo_pos":1000000000,"txindex":0,"owner":"0x0e5e50883f3a1dd73c170c935339bce1b24a96d0","oindex":0,"currency":"0x0000000000000000000000000000000000000000","blknum":1,"amount":1000},
                {"utxo_pos":9000000630001,"txindex":63,"owner":"0x0e5e50883f3a1dd73c170c935339bce1b24a96d0","oindex":1,"currency":"0x3f83c7446190ae039c54506b0f65ea8ee790ee7e","blknum":9000,"amount":49699}
            ]}"#,
        )
        .unwrap();
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].amount(), Some(U256::from(1000)));
        assert!(utxos[0].currency.is_zero());
        assert_eq!((utxos[1].blknum, utxos[1].txindex, utxos[1].oindex), (9000, 63, 1));
    }

    #[test]
    fn parse_wei_amount_beyond_u64() {
        let utxos = parse(
            r#"{"version":"1.0","success":true,"data":[
                {"txindex":0,"owner":"0x0e5e50883f3a1dd73c170c935339bce1b24a96d0","oindex":0,"currency":"0x0000000000000000000000000000000000000000","blknum":2,"amount":18450000000000000000},
                {"txindex":0,"owner":"0x0e5e50883f3a1dd73c170c935339bce1b24a96d0","oindex":0,"currency":"0x0000000000000000000000000000000000000000","blknum":3,"amount":7}
            ]}"#,
        )
        .unwrap();
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].amount(), Some(U256::from_dec_str("18450000000000000000").unwrap()));
        assert_eq!(utxos[1].amount(), Some(U256::from(7)));
    }

    #[test]
    fn parse_empty_list() {
        assert!(parse(r#"{"success":true,"data":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn parse_bad_entry_is_invalid_response() {
        let err = parse(
            r#"{"success":true,"data":[{"txindex":0,"oindex":0,"blknum":1,"owner":"0x00","currency":"0x00","amount":1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlasmaError::InvalidResponse(_)));
    }

    #[test]
    fn parse_error_envelope() {
        let err = parse(
            r#"{"success":false,"data":{"object":"error","code":"operation:bad_request","description":"Parameters required by this operation are missing or incorrect."}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlasmaError::Rpc { code, .. } if code == "operation:bad_request"));
    }
}
