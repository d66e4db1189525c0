//! In-memory editor used in tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use camino::Utf8PathBuf;
use isabelle_pide::{DecorationType, LineSpan, Range};

use crate::editor::{BufferHandle, CursorPosition, EditorError, EditorHost, Surface};

/// Decoration calls observed by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationCall {
    /// Lines cleared; `None` clears the whole buffer.
    Clear(DecorationType, Option<LineSpan>),
    /// Ranges drawn with a group.
    Add(DecorationType, String, BTreeSet<Range>),
}

#[derive(Debug, Default)]
struct EditorState {
    document: Option<Utf8PathBuf>,
    working_dir: Utf8PathBuf,
    cursor: CursorPosition,
    current_line: String,
    surfaces: HashMap<Surface, Vec<String>>,
    surface_highlights: HashMap<Surface, Vec<(String, LineSpan)>>,
    opened: Vec<Surface>,
    focused: Option<Surface>,
    buffers: HashMap<String, BufferHandle>,
    visible: HashMap<(BufferHandle, DecorationType), BTreeSet<Range>>,
    decoration_calls: Vec<DecorationCall>,
    groups: Vec<(String, String)>,
    failure: Option<String>,
    draw_failure: Option<String>,
}

/// Editor double that keeps panels and highlights in memory.
///
/// Clearing a line span removes every drawn range touching it, which mirrors
/// how namespace clears act on whole lines.
#[derive(Debug, Clone, Default)]
pub struct RecordingEditor {
    shared: Arc<Mutex<EditorState>>,
}

impl RecordingEditor {
    /// Creates an editor rooted at `/work` with no document loaded.
    pub fn new() -> Self {
        let editor = Self::default();
        lock(&editor.shared).working_dir = Utf8PathBuf::from("/work");
        editor
    }

    /// Returns a handle for arranging and inspecting editor state.
    pub fn handle(&self) -> RecordingEditorHandle {
        RecordingEditorHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, EditorState>, EditorError> {
        let state = lock(&self.shared);
        if let Some(message) = state.failure.clone() {
            return Err(EditorError::new(message));
        }
        Ok(state)
    }
}

impl EditorHost for RecordingEditor {
    fn current_document(&mut self) -> Result<Option<Utf8PathBuf>, EditorError> {
        Ok(self.state()?.document.clone())
    }

    fn working_directory(&mut self) -> Result<Utf8PathBuf, EditorError> {
        Ok(self.state()?.working_dir.clone())
    }

    fn cursor(&mut self) -> Result<CursorPosition, EditorError> {
        Ok(self.state()?.cursor)
    }

    fn current_line(&mut self) -> Result<String, EditorError> {
        Ok(self.state()?.current_line.clone())
    }

    fn surface_lines(&mut self, surface: Surface) -> Result<Vec<String>, EditorError> {
        Ok(self
            .state()?
            .surfaces
            .get(&surface)
            .cloned()
            .unwrap_or_default())
    }

    fn set_surface_lines(
        &mut self,
        surface: Surface,
        lines: Vec<String>,
    ) -> Result<(), EditorError> {
        self.state()?.surfaces.insert(surface, lines);
        Ok(())
    }

    fn clear_surface_highlights(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.state()?.surface_highlights.remove(&surface);
        Ok(())
    }

    fn highlight_surface_lines(
        &mut self,
        surface: Surface,
        group: &str,
        spans: &BTreeSet<LineSpan>,
    ) -> Result<(), EditorError> {
        let mut state = self.state()?;
        let entry = state.surface_highlights.entry(surface).or_default();
        entry.extend(spans.iter().map(|span| (group.to_owned(), *span)));
        Ok(())
    }

    fn open_surface(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.state()?.opened.push(surface);
        Ok(())
    }

    fn focus_surface(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.state()?.focused = Some(surface);
        Ok(())
    }

    fn document_buffer(&mut self, uri: &str) -> Result<Option<BufferHandle>, EditorError> {
        Ok(self.state()?.buffers.get(uri).copied())
    }

    fn clear_decorations(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        span: Option<LineSpan>,
    ) -> Result<(), EditorError> {
        let mut state = self.state()?;
        state.decoration_calls.push(DecorationCall::Clear(kind, span));
        let visible = state.visible.entry((buffer, kind)).or_default();
        match span {
            Some(span) => visible.retain(|range| !range.line_span().overlaps(&span)),
            None => visible.clear(),
        }
        Ok(())
    }

    fn add_decorations(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        group: &str,
        ranges: &BTreeSet<Range>,
    ) -> Result<(), EditorError> {
        let mut state = self.state()?;
        if let Some(message) = state.draw_failure.clone() {
            return Err(EditorError::new(message));
        }
        state
            .decoration_calls
            .push(DecorationCall::Add(kind, group.to_owned(), ranges.clone()));
        state
            .visible
            .entry((buffer, kind))
            .or_default()
            .extend(ranges.iter().copied());
        Ok(())
    }

    fn define_highlight(&mut self, group: &str, link: &str) -> Result<(), EditorError> {
        self.state()?
            .groups
            .push((group.to_owned(), link.to_owned()));
        Ok(())
    }
}

/// Shared view of a [`RecordingEditor`].
#[derive(Debug, Clone)]
pub struct RecordingEditorHandle {
    shared: Arc<Mutex<EditorState>>,
}

impl RecordingEditorHandle {
    /// Loads `path` in the current window.
    pub fn open_document(&self, path: &str) {
        lock(&self.shared).document = Some(Utf8PathBuf::from(path));
    }

    /// Registers a buffer for `uri`.
    pub fn load_buffer(&self, uri: &str, handle: BufferHandle) {
        lock(&self.shared).buffers.insert(uri.to_owned(), handle);
    }

    /// Moves the cursor.
    pub fn move_cursor(&self, line: u32, character: u32) {
        lock(&self.shared).cursor = CursorPosition::new(line, character);
    }

    /// Sets the text of the line under the cursor.
    pub fn set_current_line(&self, text: &str) {
        lock(&self.shared).current_line = text.to_owned();
    }

    /// Replaces a panel's lines directly.
    pub fn set_surface(&self, surface: Surface, lines: &[&str]) {
        lock(&self.shared).surfaces.insert(
            surface,
            lines.iter().map(|line| (*line).to_owned()).collect(),
        );
    }

    /// Makes every subsequent editor call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        lock(&self.shared).failure = Some(message.to_owned());
    }

    /// Makes only `add_decorations` fail with `message`.
    pub fn fail_drawing_with(&self, message: &str) {
        lock(&self.shared).draw_failure = Some(message.to_owned());
    }

    /// Clears every injected failure.
    pub fn recover(&self) {
        let mut state = lock(&self.shared);
        state.failure = None;
        state.draw_failure = None;
    }

    /// Lines of a panel.
    pub fn surface(&self, surface: Surface) -> Vec<String> {
        lock(&self.shared)
            .surfaces
            .get(&surface)
            .cloned()
            .unwrap_or_default()
    }

    /// Highlights applied to a panel since its last clear.
    pub fn surface_highlights(&self, surface: Surface) -> Vec<(String, LineSpan)> {
        lock(&self.shared)
            .surface_highlights
            .get(&surface)
            .cloned()
            .unwrap_or_default()
    }

    /// Panels opened so far, in order.
    pub fn opened(&self) -> Vec<Surface> {
        lock(&self.shared).opened.clone()
    }

    /// Panel focused last.
    pub fn focused(&self) -> Option<Surface> {
        lock(&self.shared).focused
    }

    /// Ranges currently visible for a decoration type.
    pub fn visible(&self, buffer: BufferHandle, kind: DecorationType) -> BTreeSet<Range> {
        lock(&self.shared)
            .visible
            .get(&(buffer, kind))
            .cloned()
            .unwrap_or_default()
    }

    /// Decoration calls recorded so far.
    pub fn decoration_calls(&self) -> Vec<DecorationCall> {
        lock(&self.shared).decoration_calls.clone()
    }

    /// Forgets recorded decoration calls.
    pub fn reset_decoration_calls(&self) {
        lock(&self.shared).decoration_calls.clear();
    }

    /// Highlight groups defined so far with their links.
    pub fn groups(&self) -> Vec<(String, String)> {
        lock(&self.shared).groups.clone()
    }
}

fn lock(shared: &Arc<Mutex<EditorState>>) -> MutexGuard<'_, EditorState> {
    shared.lock().unwrap_or_else(|poison| poison.into_inner())
}
