//! Editor host that keeps panels in memory and mirrors them to the log.
//!
//! The headless driver has no windows to draw in. Panels are plain line
//! vectors, decorations are range sets per buffer and namespace, and every
//! change is reported through `tracing` so a terminal or a log collector can
//! follow the prover.

use std::collections::{BTreeSet, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use isabelle_lsp_host::{BufferHandle, CursorPosition, EditorError, EditorHost, Surface};
use isabelle_pide::{DecorationType, LineSpan, Range};
use tracing::{debug, info, trace};

const HEADLESS_TARGET: &str = "isabelle_bridge::headless";

#[derive(Debug)]
struct LoadedDocument {
    path: Utf8PathBuf,
    buffer: BufferHandle,
    lines: Vec<String>,
}

/// In-memory [`EditorHost`].
#[derive(Debug)]
pub struct HeadlessEditor {
    working_dir: Utf8PathBuf,
    documents: HashMap<String, LoadedDocument>,
    current: Option<String>,
    cursor: CursorPosition,
    surfaces: HashMap<Surface, Vec<String>>,
    surface_highlights: HashMap<Surface, Vec<(String, LineSpan)>>,
    open: BTreeSet<Surface>,
    decorations: HashMap<(BufferHandle, DecorationType), BTreeSet<Range>>,
    highlights: HashMap<String, String>,
    next_buffer: u64,
}

impl HeadlessEditor {
    /// Creates a host resolving relative paths against `working_dir`.
    #[must_use]
    pub fn new(working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            documents: HashMap::new(),
            current: None,
            cursor: CursorPosition::default(),
            surfaces: HashMap::new(),
            surface_highlights: HashMap::new(),
            open: BTreeSet::new(),
            decorations: HashMap::new(),
            highlights: HashMap::new(),
            next_buffer: 1,
        }
    }

    /// Registers a document under `uri` and returns its buffer.
    ///
    /// The first document loaded becomes the current one.
    pub fn load_document(&mut self, uri: &str, path: &Utf8Path, text: &str) -> BufferHandle {
        if let Some(existing) = self.documents.get(uri) {
            return existing.buffer;
        }
        let buffer = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        self.documents.insert(
            uri.to_owned(),
            LoadedDocument {
                path: path.to_owned(),
                buffer,
                lines: text.lines().map(str::to_owned).collect(),
            },
        );
        if self.current.is_none() {
            self.current = Some(uri.to_owned());
        }
        debug!(target: HEADLESS_TARGET, uri, buffer = buffer.0, "loaded document");
        buffer
    }

    /// Places the cursor.
    pub const fn set_cursor(&mut self, cursor: CursorPosition) {
        self.cursor = cursor;
    }

    /// Lines last written to a panel.
    #[must_use]
    pub fn surface(&self, surface: Surface) -> &[String] {
        self.surfaces.get(&surface).map_or(&[], Vec::as_slice)
    }

    /// Whole-line highlights of a panel as `(group, span)` pairs.
    #[must_use]
    pub fn surface_highlights(&self, surface: Surface) -> &[(String, LineSpan)] {
        self.surface_highlights
            .get(&surface)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether a panel has been shown.
    #[must_use]
    pub fn is_open(&self, surface: Surface) -> bool {
        self.open.contains(&surface)
    }

    /// Ranges currently drawn for `kind` in `buffer`.
    #[must_use]
    pub fn decorations(&self, buffer: BufferHandle, kind: DecorationType) -> BTreeSet<Range> {
        self.decorations
            .get(&(buffer, kind))
            .cloned()
            .unwrap_or_default()
    }

    /// Link target of a defined highlight group.
    #[must_use]
    pub fn highlight_link(&self, group: &str) -> Option<&str> {
        self.highlights.get(group).map(String::as_str)
    }

    fn current_document_entry(&self) -> Option<&LoadedDocument> {
        self.current
            .as_ref()
            .and_then(|uri| self.documents.get(uri))
    }
}

impl EditorHost for HeadlessEditor {
    fn current_document(&mut self) -> Result<Option<Utf8PathBuf>, EditorError> {
        Ok(self.current_document_entry().map(|document| document.path.clone()))
    }

    fn working_directory(&mut self) -> Result<Utf8PathBuf, EditorError> {
        Ok(self.working_dir.clone())
    }

    fn cursor(&mut self) -> Result<CursorPosition, EditorError> {
        Ok(self.cursor)
    }

    fn current_line(&mut self) -> Result<String, EditorError> {
        let line = usize::try_from(self.cursor.line)
            .map_err(|error| EditorError::with_source("cursor line out of range", error))?;
        Ok(self
            .current_document_entry()
            .and_then(|document| document.lines.get(line))
            .cloned()
            .unwrap_or_default())
    }

    fn surface_lines(&mut self, surface: Surface) -> Result<Vec<String>, EditorError> {
        Ok(self.surface(surface).to_vec())
    }

    fn set_surface_lines(
        &mut self,
        surface: Surface,
        lines: Vec<String>,
    ) -> Result<(), EditorError> {
        info!(
            target: HEADLESS_TARGET,
            panel = %surface,
            lines = lines.len(),
            content = %lines.join("\n"),
            "panel updated"
        );
        self.surfaces.insert(surface, lines);
        Ok(())
    }

    fn clear_surface_highlights(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.surface_highlights.remove(&surface);
        Ok(())
    }

    fn highlight_surface_lines(
        &mut self,
        surface: Surface,
        group: &str,
        spans: &BTreeSet<LineSpan>,
    ) -> Result<(), EditorError> {
        self.surface_highlights
            .entry(surface)
            .or_default()
            .extend(spans.iter().map(|span| (group.to_owned(), *span)));
        Ok(())
    }

    fn open_surface(&mut self, surface: Surface) -> Result<(), EditorError> {
        if self.open.insert(surface) {
            debug!(target: HEADLESS_TARGET, panel = %surface, "panel opened");
        }
        Ok(())
    }

    fn focus_surface(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.open_surface(surface)?;
        debug!(target: HEADLESS_TARGET, panel = %surface, "panel focused");
        Ok(())
    }

    fn document_buffer(&mut self, uri: &str) -> Result<Option<BufferHandle>, EditorError> {
        Ok(self.documents.get(uri).map(|document| document.buffer))
    }

    fn clear_decorations(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        span: Option<LineSpan>,
    ) -> Result<(), EditorError> {
        let Some(drawn) = self.decorations.get_mut(&(buffer, kind)) else {
            return Ok(());
        };
        match span {
            Some(span) => drawn.retain(|range| !range.line_span().overlaps(&span)),
            None => drawn.clear(),
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
        trace!(
            target: HEADLESS_TARGET,
            buffer = buffer.0,
            kind = kind.as_str(),
            group,
            count = ranges.len(),
            "drawing decorations"
        );
        self.decorations
            .entry((buffer, kind))
            .or_default()
            .extend(ranges.iter().copied());
        Ok(())
    }

    fn define_highlight(&mut self, group: &str, link: &str) -> Result<(), EditorError> {
        self.highlights.insert(group.to_owned(), link.to_owned());
        Ok(())
    }
}
