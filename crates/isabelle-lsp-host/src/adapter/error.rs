//! Failures of the process-backed server connection.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use super::jsonrpc::JsonRpcError;

/// Failures while launching or talking to the prover's server.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The configured command is not on `PATH`.
    #[error("prover command not found: {command}")]
    CommandNotFound {
        /// Command as configured.
        command: String,
        /// Spawn error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The process could not be launched or its pipes were unavailable.
    #[error("cannot launch prover server: {message}")]
    Spawn {
        /// What went wrong.
        message: String,
        /// Spawn error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Framing failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload did not encode or decode.
    #[error("malformed JSON-RPC payload: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server answered a request with an error object.
    #[error("server rejected request ({code}): {message}")]
    Rejected {
        /// JSON-RPC error code.
        code: i64,
        /// Server-supplied message.
        message: String,
    },

    /// The server kept sending other traffic instead of answering.
    #[error("request {request_id} was never answered")]
    NoResponse {
        /// Identifier of the request.
        request_id: i64,
    },

    /// No server process is running.
    #[error("prover server is not running")]
    NotRunning,
}

impl AdapterError {
    /// Wraps the error object of a failed response.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::Rejected {
            code: error.code,
            message: error.message,
        }
    }
}

/// Failures of the `Content-Length` framed byte stream.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading or writing a pipe failed.
    #[error("pipe error: {0}")]
    Io(#[from] io::Error),

    /// The server closed its output at a message boundary.
    #[error("server closed the stream")]
    Closed,

    /// A header block carried no `Content-Length`.
    #[error("frame without Content-Length header")]
    MissingContentLength,

    /// A header line was not `Name: value` or its length did not parse.
    #[error("malformed frame header")]
    InvalidHeader,
}
