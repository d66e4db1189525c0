//! Abstractions over the connection to the prover's language server.

use std::error::Error;
use std::fmt;

use isabelle_pide::protocol::CaretUpdateParams;
use lsp_types::DidOpenTextDocumentParams;
use serde_json::Value;
use thiserror::Error;

/// A notification pushed by the server, not yet decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundNotification {
    /// JSON-RPC method.
    pub method: String,
    /// Raw parameters.
    pub params: Option<Value>,
}

impl InboundNotification {
    /// Builds a notification from its parts.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Errors reported by server implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServerError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ServerError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Behaviour required from a connection to a PIDE-capable server.
///
/// Outbound calls are fire-and-forget notifications; inbound pushes are
/// pulled one at a time with [`PideServer::next_notification`].
pub trait PideServer: Send {
    /// Starts the server and runs the LSP initialisation handshake.
    fn initialize(&mut self) -> Result<(), ServerError>;

    /// Notifies the server that a document was opened.
    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), ServerError>;

    /// Sends `PIDE/caret_update`.
    fn caret_update(&mut self, params: CaretUpdateParams) -> Result<(), ServerError>;

    /// Sends `PIDE/progress_request`.
    fn progress_request(&mut self) -> Result<(), ServerError>;

    /// Blocks until the server pushes a notification; `None` once the
    /// connection is closed.
    fn next_notification(&mut self) -> Result<Option<InboundNotification>, ServerError>;

    /// Shuts the server down.
    fn shutdown(&mut self) -> Result<(), ServerError>;
}

impl fmt::Debug for dyn PideServer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PideServer")
    }
}
