//! Recording PIDE server used in tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use isabelle_pide::protocol::CaretUpdateParams;
use lsp_types::DidOpenTextDocumentParams;
use serde_json::Value;

use crate::server::{InboundNotification, PideServer, ServerError};

/// Outbound calls observed by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    /// `initialize` was invoked.
    Initialize,
    /// A document was opened.
    DidOpen(String),
    /// `PIDE/caret_update` was sent.
    CaretUpdate(CaretUpdateParams),
    /// `PIDE/progress_request` was sent.
    ProgressRequest,
    /// `shutdown` was invoked.
    Shutdown,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<ServerCall>,
    inbound: VecDeque<InboundNotification>,
    failure: Option<String>,
}

/// Test double that records outbound calls and replays queued pushes.
#[derive(Debug, Clone, Default)]
pub struct RecordingPideServer {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingPideServer {
    /// Creates a stub with no queued pushes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle for asserting calls and queueing pushes.
    pub fn handle(&self) -> RecordingServerHandle {
        RecordingServerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn record(&self, call: ServerCall) -> Result<(), ServerError> {
        let mut state = lock(&self.shared);
        state.calls.push(call);
        state
            .failure
            .clone()
            .map_or(Ok(()), |message| Err(ServerError::new(message)))
    }
}

impl PideServer for RecordingPideServer {
    fn initialize(&mut self) -> Result<(), ServerError> {
        self.record(ServerCall::Initialize)
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), ServerError> {
        self.record(ServerCall::DidOpen(
            params.text_document.uri.as_str().to_owned(),
        ))
    }

    fn caret_update(&mut self, params: CaretUpdateParams) -> Result<(), ServerError> {
        self.record(ServerCall::CaretUpdate(params))
    }

    fn progress_request(&mut self) -> Result<(), ServerError> {
        self.record(ServerCall::ProgressRequest)
    }

    fn next_notification(&mut self) -> Result<Option<InboundNotification>, ServerError> {
        Ok(lock(&self.shared).inbound.pop_front())
    }

    fn shutdown(&mut self) -> Result<(), ServerError> {
        self.record(ServerCall::Shutdown)
    }
}

/// Shared view of a [`RecordingPideServer`].
#[derive(Debug, Clone)]
pub struct RecordingServerHandle {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingServerHandle {
    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<ServerCall> {
        lock(&self.shared).calls.clone()
    }

    /// Caret updates recorded so far.
    pub fn caret_updates(&self) -> Vec<CaretUpdateParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServerCall::CaretUpdate(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    /// Queues a push for `next_notification`.
    pub fn push(&self, method: &str, params: Value) {
        lock(&self.shared)
            .inbound
            .push_back(InboundNotification::new(method, Some(params)));
    }

    /// Makes every subsequent outbound call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        lock(&self.shared).failure = Some(message.to_owned());
    }
}

fn lock(shared: &Arc<Mutex<RecordingState>>) -> MutexGuard<'_, RecordingState> {
    shared.lock().unwrap_or_else(|poison| poison.into_inner())
}
