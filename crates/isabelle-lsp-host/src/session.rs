//! Session controller wiring server pushes to editor updates.
//!
//! Every handler runs to completion on the caller's thread, so the per-document
//! highlight caches are only ever touched by one reconciliation at a time.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use isabelle_config::Config;
use isabelle_pide::protocol::{
    CaretUpdateParams, DecorationParams, ProgressParams, ServerNotification, panel_lines,
};
use isabelle_pide::{
    DONE_GROUP, DecorationPatch, DecorationType, ERROR_GROUP, HighlightCache, LineSelection,
    render_progress, resolve_actions,
};
use lsp_types::{CodeAction, DidOpenTextDocumentParams, Uri};
use tracing::{debug, trace, warn};

use crate::commands::UserCommand;
use crate::editor::{BufferHandle, EditorHost, Surface};
use crate::errors::{SessionError, SessionOperation};
use crate::server::{InboundNotification, PideServer};

const SESSION_TARGET: &str = "isabelle_lsp_host::session";
const DECORATION_TARGET: &str = "isabelle_lsp_host::decoration";

/// Extension of documents whose caret is forwarded to the server.
pub const THEORY_EXTENSION: &str = "thy";

const PROGRESS_ERROR_LINK: &str = "DiagnosticError";
const PROGRESS_DONE_LINK: &str = "DiagnosticOk";

/// Session behaviour derived from the user's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Display width of the progress panel.
    pub progress_width: usize,
    /// Open every panel when the session starts.
    pub open_at_startup: bool,
}

impl SessionSettings {
    /// Extracts the session settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            progress_width: config.progress_width(),
            open_at_startup: config.open_at_startup(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Connects a [`PideServer`] to an [`EditorHost`].
#[derive(Debug)]
pub struct Session {
    server: Box<dyn PideServer>,
    editor: Box<dyn EditorHost>,
    settings: SessionSettings,
    caches: HashMap<String, HighlightCache>,
}

impl Session {
    /// Creates a session over an initialised server.
    #[must_use]
    pub fn new(
        server: Box<dyn PideServer>,
        editor: Box<dyn EditorHost>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            server,
            editor,
            settings,
            caches: HashMap::new(),
        }
    }

    /// Defines the highlight groups, opens panels when configured and
    /// forwards the initial caret position.
    ///
    /// # Errors
    ///
    /// Returns an error when the editor or the server rejects a call.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.define_highlights()?;
        if self.settings.open_at_startup {
            self.open_all_surfaces(SessionOperation::Start)?;
        }
        let document = self
            .editor
            .current_document()
            .map_err(|source| SessionError::editor(SessionOperation::Start, source))?;
        if let Some(path) = document {
            self.cursor_moved(&path)?;
        }
        debug!(target: SESSION_TARGET, "session started");
        Ok(())
    }

    /// Forwards the caret when the cursor moves inside a theory document.
    ///
    /// # Errors
    ///
    /// Returns an error when the cursor cannot be read or the server rejects
    /// the update.
    pub fn cursor_moved(&mut self, path: &Utf8Path) -> Result<(), SessionError> {
        if path.extension() != Some(THEORY_EXTENSION) {
            trace!(target: SESSION_TARGET, path = %path, "ignoring cursor outside theory");
            return Ok(());
        }
        let operation = SessionOperation::CaretUpdate;
        let absolute = self.absolute_path(path, operation)?;
        let cursor = self
            .editor
            .cursor()
            .map_err(|source| SessionError::editor(operation, source))?;
        let params = CaretUpdateParams::for_path(absolute.as_str(), cursor.line, cursor.character);
        trace!(
            target: SESSION_TARGET,
            uri = %params.uri,
            line = params.line,
            character = params.character,
            "forwarding caret"
        );
        self.server
            .caret_update(params)
            .map_err(|source| SessionError::server(operation, source))
    }

    /// Forwards a document opened outside the editor's own client.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the notification.
    pub fn open_document(&mut self, params: DidOpenTextDocumentParams) -> Result<(), SessionError> {
        debug!(
            target: SESSION_TARGET,
            uri = params.text_document.uri.as_str(),
            "opening document"
        );
        self.server
            .did_open(params)
            .map_err(|source| SessionError::server(SessionOperation::Start, source))
    }

    /// Pulls one push from the server and renders it.
    ///
    /// Returns `false` once the server has closed its output.
    ///
    /// # Errors
    ///
    /// Returns an error when reading from the server or rendering fails.
    pub fn process_next(&mut self) -> Result<bool, SessionError> {
        let next = self
            .server
            .next_notification()
            .map_err(|source| SessionError::server(SessionOperation::Receive, source))?;
        let Some(notification) = next else {
            return Ok(false);
        };
        self.handle_notification(notification)?;
        Ok(true)
    }

    /// Decodes and renders a raw server push.
    ///
    /// Pushes with malformed parameters are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when the editor rejects an update.
    pub fn handle_notification(
        &mut self,
        notification: InboundNotification,
    ) -> Result<(), SessionError> {
        let InboundNotification { method, params } = notification;
        match ServerNotification::decode(&method, params) {
            Ok(decoded) => self.dispatch(decoded),
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    method = %method,
                    error = %error,
                    "dropping malformed notification"
                );
                Ok(())
            }
        }
    }

    /// Renders a decoded server push.
    ///
    /// # Errors
    ///
    /// Returns an error when the editor rejects an update.
    pub fn dispatch(&mut self, notification: ServerNotification) -> Result<(), SessionError> {
        match notification {
            ServerNotification::DynamicOutput(params) => self.replace_surface(
                Surface::Output,
                &params.content,
                SessionOperation::DynamicOutput,
            ),
            ServerNotification::StateOutput(params) => {
                self.replace_surface(Surface::State, &params.content, SessionOperation::StateOutput)
            }
            ServerNotification::Decoration(params) => self.apply_decoration(params),
            ServerNotification::Progress(params) => self.show_progress(&params),
            ServerNotification::Other { method } => {
                trace!(target: SESSION_TARGET, method = %method, "ignoring notification");
                Ok(())
            }
        }
    }

    /// Runs a user command.
    ///
    /// # Errors
    ///
    /// Returns an error when the editor or the server rejects the call.
    pub fn execute(&mut self, command: UserCommand) -> Result<(), SessionError> {
        debug!(target: SESSION_TARGET, command = %command, "executing command");
        let operation = SessionOperation::Command;
        match command {
            UserCommand::ShowOutput => self.focus(Surface::Output),
            UserCommand::ShowState => self.focus(Surface::State),
            UserCommand::ShowProgress => self.focus(Surface::Progress),
            UserCommand::OpenAllWindows => self.open_all_surfaces(operation),
            UserCommand::RequestProgressRefresh => self
                .server
                .progress_request()
                .map_err(|source| SessionError::server(operation, source)),
        }
    }

    /// Quick fixes for `range` in the document at `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cursor line or the output panel cannot be read.
    pub fn code_actions(
        &mut self,
        uri: &Uri,
        range: lsp_types::Range,
    ) -> Result<Vec<CodeAction>, SessionError> {
        let selection = LineSelection::from_range(&range);
        if !selection.is_single_line() {
            return Ok(Vec::new());
        }
        let operation = SessionOperation::CodeAction;
        let cursor_line = self
            .editor
            .current_line()
            .map_err(|source| SessionError::editor(operation, source))?;
        let output = self
            .editor
            .surface_lines(Surface::Output)
            .map_err(|source| SessionError::editor(operation, source))?;

        let actions: Vec<CodeAction> = resolve_actions(selection, &cursor_line, &output)
            .into_iter()
            .map(|candidate| candidate.into_code_action(uri.clone()))
            .collect();
        debug!(
            target: SESSION_TARGET,
            uri = uri.as_str(),
            count = actions.len(),
            "resolved code actions"
        );
        Ok(actions)
    }

    /// Forgets the highlight history of a closed document.
    pub fn document_closed(&mut self, uri: &str) {
        if self.caches.remove(uri).is_some() {
            trace!(target: DECORATION_TARGET, uri, "dropped highlight cache");
        }
    }

    /// Highlight history of a document, if it has any.
    #[must_use]
    pub fn highlight_cache(&self, uri: &str) -> Option<&HighlightCache> {
        self.caches.get(uri)
    }

    /// Shuts the server down.
    ///
    /// # Errors
    ///
    /// Returns an error when the server fails to stop cleanly.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        self.server
            .shutdown()
            .map_err(|source| SessionError::server(SessionOperation::Command, source))
    }

    fn define_highlights(&mut self) -> Result<(), SessionError> {
        let operation = SessionOperation::Start;
        for kind in DecorationType::ALL {
            self.editor
                .define_highlight(&kind.group_name(), kind.default_link())
                .map_err(|source| SessionError::editor(operation, source))?;
        }
        for (group, link) in [
            (ERROR_GROUP, PROGRESS_ERROR_LINK),
            (DONE_GROUP, PROGRESS_DONE_LINK),
        ] {
            self.editor
                .define_highlight(group, link)
                .map_err(|source| SessionError::editor(operation, source))?;
        }
        Ok(())
    }

    fn absolute_path(
        &mut self,
        path: &Utf8Path,
        operation: SessionOperation,
    ) -> Result<Utf8PathBuf, SessionError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let base = self
            .editor
            .working_directory()
            .map_err(|source| SessionError::editor(operation, source))?;
        Ok(base.join(path))
    }

    fn focus(&mut self, surface: Surface) -> Result<(), SessionError> {
        self.editor
            .focus_surface(surface)
            .map_err(|source| SessionError::editor(SessionOperation::Command, source))
    }

    fn open_all_surfaces(&mut self, operation: SessionOperation) -> Result<(), SessionError> {
        for surface in Surface::ALL {
            self.editor
                .open_surface(surface)
                .map_err(|source| SessionError::editor(operation, source))?;
        }
        Ok(())
    }

    fn replace_surface(
        &mut self,
        surface: Surface,
        content: &str,
        operation: SessionOperation,
    ) -> Result<(), SessionError> {
        let lines = panel_lines(content);
        trace!(target: SESSION_TARGET, surface = %surface, lines = lines.len(), "replacing panel");
        self.editor
            .set_surface_lines(surface, lines)
            .map_err(|source| SessionError::editor(operation, source))
    }

    fn show_progress(&mut self, params: &ProgressParams) -> Result<(), SessionError> {
        let operation = SessionOperation::Progress;
        let report = render_progress(&params.nodes_status, self.settings.progress_width);
        let editor = &mut self.editor;
        let wrap = |source| SessionError::editor(operation, source);

        editor
            .set_surface_lines(Surface::Progress, report.lines)
            .map_err(wrap)?;
        editor
            .clear_surface_highlights(Surface::Progress)
            .map_err(wrap)?;
        if !report.error_spans.is_empty() {
            editor
                .highlight_surface_lines(Surface::Progress, ERROR_GROUP, &report.error_spans)
                .map_err(wrap)?;
        }
        if !report.done_spans.is_empty() {
            editor
                .highlight_surface_lines(Surface::Progress, DONE_GROUP, &report.done_spans)
                .map_err(wrap)?;
        }
        Ok(())
    }

    fn apply_decoration(&mut self, params: DecorationParams) -> Result<(), SessionError> {
        let operation = SessionOperation::Decoration;
        let kind = match params.kind.parse::<DecorationType>() {
            Ok(kind) => kind,
            Err(error) => {
                warn!(
                    target: DECORATION_TARGET,
                    tag = error.input(),
                    "ignoring unknown decoration type"
                );
                return Ok(());
            }
        };
        let buffer = self
            .editor
            .document_buffer(&params.uri)
            .map_err(|source| SessionError::editor(operation, source))?;
        let Some(buffer) = buffer else {
            debug!(target: DECORATION_TARGET, uri = %params.uri, "no buffer for decorated document");
            return Ok(());
        };

        let (ranges, rejected) = params.ranges();
        if rejected > 0 {
            warn!(
                target: DECORATION_TARGET,
                uri = %params.uri,
                kind = %kind,
                rejected,
                "skipping malformed ranges"
            );
        }

        let uri = params.uri;
        let cache = self.caches.entry(uri.clone()).or_default();
        let patch = cache.reconcile(kind, ranges);
        let applied = self.apply_patch(buffer, kind, &patch);
        if applied.is_err() {
            if let Some(cache) = self.caches.get_mut(&uri) {
                cache.invalidate(kind);
            }
            warn!(target: DECORATION_TARGET, uri = %uri, kind = %kind, "decorations left stale");
        }
        applied
    }

    fn apply_patch(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        patch: &DecorationPatch,
    ) -> Result<(), SessionError> {
        let wrap = |source| SessionError::editor(SessionOperation::Decoration, source);
        match patch {
            DecorationPatch::ClearAll => {
                trace!(target: DECORATION_TARGET, kind = %kind, "clearing buffer");
                self.editor.clear_decorations(buffer, kind, None).map_err(wrap)
            }
            DecorationPatch::Replace { add } => {
                trace!(
                    target: DECORATION_TARGET,
                    kind = %kind,
                    drawn = add.len(),
                    "redrawing buffer"
                );
                self.editor.clear_decorations(buffer, kind, None).map_err(wrap)?;
                self.editor
                    .add_decorations(buffer, kind, &kind.group_name(), add)
                    .map_err(wrap)
            }
            DecorationPatch::Update { clear, add } => {
                trace!(
                    target: DECORATION_TARGET,
                    kind = %kind,
                    cleared = clear.len(),
                    drawn = add.len(),
                    "patching decorations"
                );
                for span in clear {
                    self.editor
                        .clear_decorations(buffer, kind, Some(*span))
                        .map_err(wrap)?;
                }
                if !add.is_empty() {
                    self.editor
                        .add_decorations(buffer, kind, &kind.group_name(), add)
                        .map_err(wrap)?;
                }
                Ok(())
            }
        }
    }
}
