use ethereum_types::Address;

use crate::commands;
use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;
use crate::types::address_hex;
use crate::utxo::Balance;

pub const ROUTE: &str = "account.get_balance";

/// One entry per currency the address holds.
pub fn exec(transport: &dyn Transport, address: &Address) -> Result<Vec<Balance>, PlasmaError> {
    let request = RpcRequest::new(ROUTE).with_param("address", address_hex(address));
    let response = commands::execute(transport, &request)?;
    parse_balance_response(response)
}

pub(crate) fn parse_balance_response(response: RpcResponse) -> Result<Vec<Balance>, PlasmaError> {
    response.into_data(ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_address;
    use crate::utxo::BalanceValue;
    use ethereum_types::U256;

    #[test]
    fn parse_balances() {
        let body = r#"{"version":"1.0","success":true,"data":[
            {"currency":"0x0000000000000000000000000000000000000000","amount":1000},
            {"currency":"0xda636e31a9800531418213b5c799960f4585c937","amount":1744},
            {"currency":"0x3f83c7446190ae039c54506b0f65ea8ee790ee7e","amount":54398},
            {"currency":"0x3e967151f952ec2bef08107e108747f715bb8b70","amount":54992}]}"#;
        let balances = parse_balance_response(RpcResponse::from_slice(body.as_bytes()).unwrap()).unwrap();
        assert_eq!(balances.len(), 4);
        assert_eq!(
            balances[1].currency,
            parse_address("0xda636e31a9800531418213b5c799960f4585c937").unwrap()
        );
        assert_eq!(balances[3].value, BalanceValue::Fungible { amount: U256::from(54992) });
    }

    #[test]
    fn parse_balance_not_a_list() {
        let body = r#"{"success":true,"data":{"currency":"0x0000000000000000000000000000000000000000","amount":1}}"#;
        let err = parse_balance_response(RpcResponse::from_slice(body.as_bytes()).unwrap()).unwrap_err();
        assert!(matches!(err, PlasmaError::InvalidResponse(_)));
    }
}
