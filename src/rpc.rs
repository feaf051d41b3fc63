//! Watcher request and response envelopes.
//!
//! Every watcher route takes a JSON object of parameters and answers with
//! `{"version": .., "success": .., "data": ..}`. On failure `data` carries an
//! [`ErrorData`] payload instead of the route's result.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlasmaError;

#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub route: &'static str,
    pub params: Map<String, Value>,
}

impl RpcRequest {
    pub fn new(route: &'static str) -> Self {
        Self {
            route,
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Request body: the parameters as a JSON object.
    pub fn body(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub version: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

impl RpcResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Deserialize `data` into the route's result type, or map the error
    /// payload when the watcher reported a failure.
    pub fn into_data<T: DeserializeOwned>(self, route: &str) -> Result<T, PlasmaError> {
        if !self.success {
            let error: ErrorData = serde_json::from_value(self.data).unwrap_or_default();
            return Err(PlasmaError::from_error_data(route, &error));
        }
        if self.data.is_null() {
            return Err(PlasmaError::InvalidResponse(format!(
                "{route}: response has no data"
            )));
        }
        serde_json::from_value(self.data)
            .map_err(|e| PlasmaError::InvalidResponse(format!("{route}: {e}")))
    }
}

/// Error payload of an unsuccessful response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub messages: Option<Value>,
}

impl ErrorData {
    /// Description if present, otherwise the `error_key` from `messages`.
    pub fn summary(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        self.messages
            .as_ref()
            .and_then(|m| m.get("error_key"))
            .and_then(Value::as_str)
            .unwrap_or("no description")
            .to_string()
    }
}
