use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::TransportError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::Transport;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP transport.
///
/// Every route is a `POST {base_url}/{route}` with the parameters as a JSON
/// object body. The watcher wraps failures in the regular envelope, so a
/// non-2xx status is only an error when the body is not an envelope.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::Unsupported(format!(
                "watcher URL must be http(s): {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        log::info!("using watcher at {base_url}");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }
}

impl Transport for HttpTransport {
    fn send_request(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let url = self.url(request.route);
        log::debug!("POST {url} {}", request.body());

        let response = self
            .client
            .post(&url)
            .json(&request.body())
            .send()
            .map_err(from_reqwest)?;
        let status = response.status();
        let body = response.bytes().map_err(from_reqwest)?;
        log::debug!("{url} -> {status}, {} bytes", body.len());

        match RpcResponse::from_slice(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(TransportError::Http(format!("{url}: {status}"))),
            Err(e) => Err(TransportError::Decode(e)),
        }
    }
}

fn from_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::ConnectionFailed(err.to_string())
    } else {
        TransportError::Http(err.to_string())
    }
}
