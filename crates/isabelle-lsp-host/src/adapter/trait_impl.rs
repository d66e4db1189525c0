//! Implementation of [`PideServer`] for [`ProcessPideServer`].

use isabelle_pide::protocol::{CARET_UPDATE, CaretUpdateParams, PROGRESS_REQUEST};
use lsp_types::{
    ClientCapabilities, DidOpenTextDocumentParams, InitializeParams, InitializeResult,
    InitializedParams,
};
use tracing::debug;

use super::lifecycle::ADAPTER_TARGET;
use super::process::ProcessPideServer;
use crate::server::{InboundNotification, PideServer, ServerError};

impl PideServer for ProcessPideServer {
    fn initialize(&mut self) -> Result<(), ServerError> {
        debug!(target: ADAPTER_TARGET, "initializing language server");

        self.spawn().map_err(|error| {
            ServerError::with_source(
                format!("failed to spawn {}", self.config().command),
                error,
            )
        })?;

        let params = InitializeParams {
            process_id: Some(std::process::id()),
            capabilities: ClientCapabilities::default(),
            ..Default::default()
        };
        let result: InitializeResult = self
            .request("initialize", params)
            .map_err(|error| ServerError::with_source("initialization handshake failed", error))?;

        self.notify("initialized", InitializedParams {})
            .map_err(|error| {
                ServerError::with_source("failed to send initialized notification", error)
            })?;

        debug!(
            target: ADAPTER_TARGET,
            server = result.server_info.as_ref().map_or("unknown", |info| info.name.as_str()),
            "language server initialized"
        );
        Ok(())
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), ServerError> {
        self.notify("textDocument/didOpen", params)
            .map_err(|error| ServerError::with_source("didOpen notification failed", error))
    }

    fn caret_update(&mut self, params: CaretUpdateParams) -> Result<(), ServerError> {
        self.notify(CARET_UPDATE, params)
            .map_err(|error| ServerError::with_source("caret update failed", error))
    }

    fn progress_request(&mut self) -> Result<(), ServerError> {
        self.notify(PROGRESS_REQUEST, ())
            .map_err(|error| ServerError::with_source("progress request failed", error))
    }

    fn next_notification(&mut self) -> Result<Option<InboundNotification>, ServerError> {
        self.receive()
            .map(|next| next.map(|push| InboundNotification::new(push.method, push.params)))
            .map_err(|error| ServerError::with_source("failed to read server message", error))
    }

    fn shutdown(&mut self) -> Result<(), ServerError> {
        self.stop();
        Ok(())
    }
}
