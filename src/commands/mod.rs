//! One module per watcher route.
//!
//! You probably want [`PlasmaApi`](crate::api::PlasmaApi) instead.

pub mod get_balance;
pub mod get_challenge_data;
pub mod get_exit_data;
pub mod get_utxos;
pub mod submit_transaction;

use log::debug;

use crate::error::PlasmaError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;

/// Send `request` and hand back the raw envelope for the route's parser.
pub(crate) fn execute(
    transport: &dyn Transport,
    request: &RpcRequest,
) -> Result<RpcResponse, PlasmaError> {
    debug!("-> {}", request.route);
    let response = transport.send_request(request)?;
    debug!("<- {} success={}", request.route, response.success);
    Ok(response)
}
