//! Headless run loop: open theories, then render pushes until the server exits.

use std::io;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use isabelle_config::Config;
use isabelle_lsp_host::adapter::{ProcessPideServer, ServerProcessConfig};
use isabelle_lsp_host::{
    PideServer, ServerError, Session, SessionError, SessionSettings, UserCommand,
};
use lsp_types::{DidOpenTextDocumentParams, TextDocumentItem, Uri};
use thiserror::Error;
use tracing::{debug, info};

use crate::headless::HeadlessEditor;

const RUN_TARGET: &str = "isabelle_bridge::run";

/// Language identifier announced for theory documents.
pub const THEORY_LANGUAGE_ID: &str = "isabelle";

/// Failures of a headless run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The working directory could not be determined.
    #[error("cannot determine working directory: {message}")]
    WorkingDirectory {
        /// Reason reported by the platform.
        message: String,
    },
    /// A theory file could not be read.
    #[error("failed to read theory {path}: {source}")]
    ReadTheory {
        /// Absolute path of the theory.
        path: Utf8PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// A theory path does not form a valid document URI.
    #[error("theory path {path} does not form a valid URI")]
    InvalidUri {
        /// Absolute path of the theory.
        path: Utf8PathBuf,
    },
    /// The server could not be started.
    #[error("failed to start language server: {source}")]
    Initialize {
        /// Server error.
        #[source]
        source: ServerError,
    },
    /// The session failed while running.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Counters reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Theories announced to the server.
    pub theories: usize,
    /// Server pushes processed.
    pub notifications: usize,
}

/// Theory text loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoryDocument {
    path: Utf8PathBuf,
    text: String,
}

impl TheoryDocument {
    /// Wraps an absolute path and its text.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads `path`, resolving it against `base` when relative.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::ReadTheory`] when the file cannot be read.
    pub fn read(path: &Utf8Path, base: &Utf8Path) -> Result<Self, RunError> {
        let absolute = if path.is_absolute() {
            path.to_owned()
        } else {
            base.join(path)
        };
        let text = std::fs::read_to_string(&absolute).map_err(|source| RunError::ReadTheory {
            path: absolute.clone(),
            source,
        })?;
        Ok(Self::new(absolute, text))
    }

    /// Absolute path of the theory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Document URI the server knows the theory by.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("file://{}", self.path)
    }

    /// `textDocument/didOpen` payload for the theory.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidUri`] when the path does not form a URI.
    pub fn did_open_params(&self) -> Result<DidOpenTextDocumentParams, RunError> {
        let uri = Uri::from_str(&self.uri()).map_err(|_| RunError::InvalidUri {
            path: self.path.clone(),
        })?;
        Ok(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri,
                language_id: THEORY_LANGUAGE_ID.to_owned(),
                version: 0,
                text: self.text.clone(),
            },
        })
    }
}

/// Launches the configured server and runs the theories headlessly.
///
/// # Errors
///
/// Returns [`RunError`] when a theory cannot be read, the server fails to
/// start, or the session fails while running.
pub fn run(config: &Config, theories: &[Utf8PathBuf]) -> Result<RunSummary, RunError> {
    let working_dir = working_directory()?;
    let documents = theories
        .iter()
        .map(|path| TheoryDocument::read(path, &working_dir))
        .collect::<Result<Vec<_>, _>>()?;

    let process = ServerProcessConfig::from(config.server_invocation())
        .with_working_dir(working_dir.clone());
    info!(
        target: RUN_TARGET,
        command = %process.command,
        args = ?process.args,
        "starting language server"
    );
    let mut server = ProcessPideServer::new(process);
    server
        .initialize()
        .map_err(|source| RunError::Initialize { source })?;

    drive(
        Box::new(server),
        HeadlessEditor::new(working_dir),
        SessionSettings::from_config(config),
        &documents,
    )
}

/// Runs a session over an initialised server until it stops pushing.
///
/// Each theory is loaded into `editor` and announced to the server. The
/// first one becomes the current document, so its caret is forwarded when
/// the session starts. A progress refresh is requested before the loop.
///
/// # Errors
///
/// Returns [`RunError`] when a document cannot be announced or the session
/// fails.
pub fn drive(
    server: Box<dyn PideServer>,
    mut editor: HeadlessEditor,
    settings: SessionSettings,
    documents: &[TheoryDocument],
) -> Result<RunSummary, RunError> {
    let params = documents
        .iter()
        .map(TheoryDocument::did_open_params)
        .collect::<Result<Vec<_>, _>>()?;
    for document in documents {
        editor.load_document(&document.uri(), document.path(), &document.text);
    }

    let mut session = Session::new(server, Box::new(editor), settings);
    for params in params {
        session.open_document(params)?;
    }
    session.start()?;
    session.execute(UserCommand::RequestProgressRefresh)?;

    let mut summary = RunSummary {
        theories: documents.len(),
        notifications: 0,
    };
    while session.process_next()? {
        summary.notifications += 1;
    }
    debug!(
        target: RUN_TARGET,
        notifications = summary.notifications,
        "server closed its output"
    );
    session.shutdown()?;
    Ok(summary)
}

fn working_directory() -> Result<Utf8PathBuf, RunError> {
    let current = std::env::current_dir().map_err(|error| RunError::WorkingDirectory {
        message: error.to_string(),
    })?;
    Utf8PathBuf::from_path_buf(current).map_err(|path| RunError::WorkingDirectory {
        message: format!("{} is not valid UTF-8", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use isabelle_lsp_host::InboundNotification;
    use isabelle_pide::protocol::{CARET_UPDATE, CaretUpdateParams, DYNAMIC_OUTPUT};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default)]
    struct Script {
        calls: Vec<String>,
        pushes: VecDeque<InboundNotification>,
    }

    #[derive(Debug, Clone, Default)]
    struct ScriptedServer(Arc<Mutex<Script>>);

    impl ScriptedServer {
        fn with_pushes(pushes: impl IntoIterator<Item = InboundNotification>) -> Self {
            let server = Self::default();
            server.script().pushes.extend(pushes);
            server
        }

        fn script(&self) -> std::sync::MutexGuard<'_, Script> {
            self.0.lock().expect("script lock")
        }

        fn calls(&self) -> Vec<String> {
            self.script().calls.clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.script().calls.push(call.into());
        }
    }

    impl PideServer for ScriptedServer {
        fn initialize(&mut self) -> Result<(), ServerError> {
            self.record("initialize");
            Ok(())
        }

        fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), ServerError> {
            self.record(format!("didOpen {}", params.text_document.uri.as_str()));
            Ok(())
        }

        fn caret_update(&mut self, params: CaretUpdateParams) -> Result<(), ServerError> {
            self.record(format!("{CARET_UPDATE} {}", params.uri));
            Ok(())
        }

        fn progress_request(&mut self) -> Result<(), ServerError> {
            self.record("progress_request");
            Ok(())
        }

        fn next_notification(&mut self) -> Result<Option<InboundNotification>, ServerError> {
            Ok(self.script().pushes.pop_front())
        }

        fn shutdown(&mut self) -> Result<(), ServerError> {
            self.record("shutdown");
            Ok(())
        }
    }

    #[fixture]
    fn documents() -> Vec<TheoryDocument> {
        vec![
            TheoryDocument::new("/work/Scratch.thy", "theory Scratch imports Main begin\nend\n"),
            TheoryDocument::new("/work/Other.thy", "theory Other imports Main begin\nend\n"),
        ]
    }

    #[rstest]
    fn drive_announces_theories_then_follows_the_first(documents: Vec<TheoryDocument>) {
        let server = ScriptedServer::default();

        let summary = drive(
            Box::new(server.clone()),
            HeadlessEditor::new("/work"),
            SessionSettings::default(),
            &documents,
        )
        .expect("run");

        assert_eq!(summary, RunSummary { theories: 2, notifications: 0 });
        assert_eq!(
            server.calls(),
            vec![
                "didOpen file:///work/Scratch.thy".to_owned(),
                "didOpen file:///work/Other.thy".to_owned(),
                format!("{CARET_UPDATE} file:///work/Scratch.thy"),
                "progress_request".to_owned(),
                "shutdown".to_owned(),
            ]
        );
    }

    #[rstest]
    fn drive_counts_pushes_until_the_stream_ends(documents: Vec<TheoryDocument>) {
        let server = ScriptedServer::with_pushes([
            InboundNotification::new(DYNAMIC_OUTPUT, Some(json!({"content": "proof (prove)"}))),
            InboundNotification::new("window/logMessage", Some(json!({"message": "hi"}))),
            InboundNotification::new(DYNAMIC_OUTPUT, Some(json!({"bogus": 1, "content": 3}))),
        ]);

        let summary = drive(
            Box::new(server),
            HeadlessEditor::new("/work"),
            SessionSettings::default(),
            &documents,
        )
        .expect("run");

        assert_eq!(summary.notifications, 3);
    }

    #[rstest]
    fn read_resolves_relative_paths() {
        let dir = TempDir::new().expect("temp dir");
        let base = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");
        std::fs::write(base.join("Scratch.thy"), "theory Scratch\n").expect("write theory");

        let document = TheoryDocument::read(Utf8Path::new("Scratch.thy"), base).expect("read");

        assert_eq!(document.path(), base.join("Scratch.thy").as_path());
        assert_eq!(document.uri(), format!("file://{}", base.join("Scratch.thy")));
    }

    #[rstest]
    fn read_reports_missing_theory() {
        let dir = TempDir::new().expect("temp dir");
        let base = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");

        let result = TheoryDocument::read(Utf8Path::new("Missing.thy"), base);

        assert!(matches!(result, Err(RunError::ReadTheory { .. })));
    }

    #[rstest]
    fn did_open_announces_isabelle_text() {
        let document = TheoryDocument::new("/work/Scratch.thy", "theory Scratch\n");

        let params = document.did_open_params().expect("params");

        assert_eq!(params.text_document.uri.as_str(), "file:///work/Scratch.thy");
        assert_eq!(params.text_document.language_id, THEORY_LANGUAGE_ID);
        assert_eq!(params.text_document.text, "theory Scratch\n");
    }
}
