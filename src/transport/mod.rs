//! Transport backends for talking to the watcher.
//!
//! - [`http::HttpTransport`] -- JSON over HTTP (feature `http`, default)
//!
//! Anything implementing [`Transport`] can be plugged into
//! [`PlasmaApi::with_transport`](crate::api::PlasmaApi::with_transport),
//! which is how the tests drive the API against canned responses.

#[cfg(feature = "http")]
pub mod http;

use crate::error::TransportError;
use crate::rpc::{RpcRequest, RpcResponse};

pub trait Transport: Send + Sync {
    /// Send one request and return the decoded response envelope. An
    /// unsuccessful envelope is still `Ok`; mapping it is up to the caller.
    fn send_request(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError>;
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum TransportType {
    /// Watcher base URL, e.g. `http://localhost:7434`.
    #[cfg(feature = "http")]
    Http(String),
}

pub fn open(transport_type: &TransportType) -> Result<Box<dyn Transport>, TransportError> {
    match transport_type {
        #[cfg(feature = "http")]
        TransportType::Http(url) => {
            let t = http::HttpTransport::new(url)?;
            Ok(Box::new(t))
        }
        #[allow(unreachable_patterns)]
        _ => Err(TransportError::Unsupported(
            "no transport enabled, enable the 'http' feature".into(),
        )),
    }
}
