//! JSON-RPC 2.0 message types exchanged with the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request sent to the server.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Request identifier.
    pub id: i64,
    /// Method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with the given identifier.
    #[must_use]
    pub fn new(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 notification sent to the server.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: VERSION,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response received from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Identifier of the answered request.
    pub id: Option<i64>,
    /// Result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

/// A request initiated by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    /// Identifier to echo in the acknowledgement.
    pub id: Value,
    /// Requested method.
    pub method: String,
    /// Raw parameters.
    pub params: Option<Value>,
}

/// A notification pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingNotification {
    /// Pushed method.
    pub method: String,
    /// Raw parameters.
    pub params: Option<Value>,
}

/// Acknowledgement of a server request.
#[derive(Debug, Clone, Serialize)]
pub(super) struct JsonRpcAcknowledgement {
    jsonrpc: &'static str,
    id: Value,
    result: Value,
}

impl JsonRpcAcknowledgement {
    /// Answers `id` with a `null` result.
    pub(super) const fn null(id: Value) -> Self {
        Self {
            jsonrpc: VERSION,
            id,
            result: Value::Null,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// Any frame the server may send.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// Answer to one of our requests.
    Response(JsonRpcResponse),
    /// Request the client must acknowledge.
    ServerRequest(IncomingRequest),
    /// Push without a reply.
    Notification(IncomingNotification),
}

impl JsonRpcMessage {
    /// Classifies a frame by the presence of `method` and `id`.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when the payload is not a JSON-RPC object.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawMessage = serde_json::from_slice(bytes)?;
        Ok(match (raw.method, raw.id) {
            (Some(method), Some(id)) => Self::ServerRequest(IncomingRequest {
                id,
                method,
                params: raw.params,
            }),
            (Some(method), None) => Self::Notification(IncomingNotification {
                method,
                params: raw.params,
            }),
            (None, id) => Self::Response(JsonRpcResponse {
                id: id.as_ref().and_then(Value::as_i64),
                result: raw.result,
                error: raw.error,
            }),
        })
    }
}
