use crate::commands;
use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;
use crate::types::{to_hex, TransactionReceipt};

pub const ROUTE: &str = "transaction.submit";

/// Submit a signed transaction encoding. A rejection by the watcher comes
/// back as [`PlasmaError::SubmissionFailed`].
pub fn exec(transport: &dyn Transport, signed_tx: &[u8]) -> Result<TransactionReceipt, PlasmaError> {
    if signed_tx.is_empty() {
        return Err(PlasmaError::InvalidArgument("empty transaction".into()));
    }
    let request = RpcRequest::new(ROUTE).with_param("transaction", to_hex(signed_tx));
    let response = commands::execute(transport, &request)?;
    parse_submit_response(response)
}

pub(crate) fn parse_submit_response(response: RpcResponse) -> Result<TransactionReceipt, PlasmaError> {
    response.into_data(ROUTE)
}
