//! Shared fixtures and helpers for session tests.

mod recording_editor;
mod recording_server;
mod world;

use std::str::FromStr;

use isabelle_pide::protocol::{DECORATION, DYNAMIC_OUTPUT, PROGRESS};
use lsp_types::{Position, Uri};
use rstest::fixture;
use serde_json::{Value, json};

use crate::editor::BufferHandle;
use crate::server::InboundNotification;
use crate::session::{Session, SessionSettings};

pub use recording_editor::{DecorationCall, RecordingEditor, RecordingEditorHandle};
pub use recording_server::{RecordingPideServer, RecordingServerHandle, ServerCall};
pub use world::SessionWorld;

/// Theory loaded by default in test editors.
pub const THEORY_PATH: &str = "/work/Scratch.thy";

/// URI of [`THEORY_PATH`].
pub const THEORY_URI: &str = "file:///work/Scratch.thy";

/// Buffer displaying [`THEORY_PATH`].
pub const THEORY_BUFFER: BufferHandle = BufferHandle(7);

/// Session wired to recording doubles.
#[derive(Debug)]
pub struct Harness {
    /// Session under test.
    pub session: Session,
    /// View of the stub server.
    pub server: RecordingServerHandle,
    /// View of the stub editor.
    pub editor: RecordingEditorHandle,
}

impl Harness {
    /// Builds a harness with `settings` and the default theory loaded.
    pub fn with_settings(settings: SessionSettings) -> Self {
        let server = RecordingPideServer::new();
        let editor = RecordingEditor::new();
        let server_handle = server.handle();
        let editor_handle = editor.handle();
        editor_handle.open_document(THEORY_PATH);
        editor_handle.load_buffer(THEORY_URI, THEORY_BUFFER);
        Self {
            session: Session::new(Box::new(server), Box::new(editor), settings),
            server: server_handle,
            editor: editor_handle,
        }
    }

    /// Delivers a push straight to the session.
    pub fn deliver(&mut self, method: &str, params: Value) {
        self.session
            .handle_notification(InboundNotification::new(method, Some(params)))
            .expect("notification handled");
    }

    /// Delivers a decoration push for the default theory.
    pub fn decorate(&mut self, kind: &str, ranges: &[[i64; 4]]) {
        self.deliver(DECORATION, decoration_params(THEORY_URI, kind, ranges));
    }

    /// Delivers a dynamic output push.
    pub fn output(&mut self, content: &str) {
        self.deliver(DYNAMIC_OUTPUT, json!({ "content": content }));
    }

    /// Delivers a progress push.
    pub fn progress(&mut self, nodes: Vec<Value>) {
        self.deliver(PROGRESS, json!({ "nodes-status": nodes }));
    }
}

/// Harness with default settings.
#[fixture]
pub fn harness() -> Harness {
    Harness::with_settings(SessionSettings {
        progress_width: 20,
        open_at_startup: false,
    })
}

/// URI of the default theory.
#[fixture]
pub fn theory_uri() -> Uri {
    Uri::from_str(THEORY_URI).expect("valid theory URI")
}

/// Builds `PIDE/decoration` params.
pub fn decoration_params(uri: &str, kind: &str, ranges: &[[i64; 4]]) -> Value {
    let content: Vec<Value> = ranges.iter().map(|range| json!({ "range": range })).collect();
    json!({ "uri": uri, "type": kind, "content": content })
}

/// Builds one `nodes-status` entry.
pub fn theory_status(name: &str, finished: u32, failed: u32, unprocessed: u32) -> Value {
    json!({
        "name": name,
        "finished": finished,
        "failed": failed,
        "warned": 0,
        "unprocessed": unprocessed,
        "running": 0,
        "consolidated": false,
        "canceled": false,
        "terminated": false,
        "initialized": true
    })
}

/// Empty selection on `line`.
pub fn cursor_range(line: u32) -> lsp_types::Range {
    lsp_types::Range::new(Position::new(line, 0), Position::new(line, 0))
}
