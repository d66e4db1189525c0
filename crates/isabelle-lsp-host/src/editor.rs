//! Abstractions over the editor hosting the bridge.
//!
//! The session never talks to a concrete editor. Everything it needs (the
//! cursor, the three panels, buffer highlights) goes through [`EditorHost`],
//! so the same controller can drive Neovim over RPC, a headless recorder, or
//! a test double.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use camino::Utf8PathBuf;
use isabelle_pide::{DecorationType, LineSpan, Range};
use thiserror::Error;

/// Panels rendered by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Surface {
    /// Output at the caret (`PIDE/dynamic_output`).
    Output,
    /// Proof state (`PIDE/state_output`).
    State,
    /// Theory build progress (`PIDE/progress`).
    Progress,
}

impl Surface {
    /// Panels in the order they are opened.
    pub const ALL: [Self; 3] = [Self::Output, Self::State, Self::Progress];

    /// Scratch buffer name for the panel.
    #[must_use]
    pub const fn buffer_name(self) -> &'static str {
        match self {
            Self::Output => "isabelle-output",
            Self::State => "isabelle-state",
            Self::Progress => "isabelle-progress",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.buffer_name())
    }
}

/// Editor-assigned identifier of a document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u64);

/// Zero-based cursor location in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    /// Cursor line.
    pub line: u32,
    /// Cursor column.
    pub character: u32,
}

impl CursorPosition {
    /// Builds a cursor position.
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Failure reported by an editor host.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EditorError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl EditorError {
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

/// Editor primitives the session drives.
pub trait EditorHost {
    /// Path of the document in the current window, if any.
    fn current_document(&mut self) -> Result<Option<Utf8PathBuf>, EditorError>;

    /// Directory relative document paths are resolved against.
    fn working_directory(&mut self) -> Result<Utf8PathBuf, EditorError>;

    /// Cursor location in the current window.
    fn cursor(&mut self) -> Result<CursorPosition, EditorError>;

    /// Text of the line under the cursor.
    fn current_line(&mut self) -> Result<String, EditorError>;

    /// Current lines of a panel.
    fn surface_lines(&mut self, surface: Surface) -> Result<Vec<String>, EditorError>;

    /// Replaces every line of a panel.
    fn set_surface_lines(&mut self, surface: Surface, lines: Vec<String>)
    -> Result<(), EditorError>;

    /// Removes every highlight from a panel.
    fn clear_surface_highlights(&mut self, surface: Surface) -> Result<(), EditorError>;

    /// Highlights whole lines of a panel with `group`.
    fn highlight_surface_lines(
        &mut self,
        surface: Surface,
        group: &str,
        spans: &BTreeSet<LineSpan>,
    ) -> Result<(), EditorError>;

    /// Shows a panel in a window without focusing it.
    fn open_surface(&mut self, surface: Surface) -> Result<(), EditorError>;

    /// Moves focus to a panel, opening it when hidden.
    fn focus_surface(&mut self, surface: Surface) -> Result<(), EditorError>;

    /// Buffer displaying the document at `uri`, if it is loaded.
    fn document_buffer(&mut self, uri: &str) -> Result<Option<BufferHandle>, EditorError>;

    /// Clears highlights of `kind` on the lines of `span`, or on every line when `None`.
    fn clear_decorations(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        span: Option<LineSpan>,
    ) -> Result<(), EditorError>;

    /// Draws `ranges` in the namespace of `kind` using `group`.
    fn add_decorations(
        &mut self,
        buffer: BufferHandle,
        kind: DecorationType,
        group: &str,
        ranges: &BTreeSet<Range>,
    ) -> Result<(), EditorError>;

    /// Defines `group` as a default link to `link`.
    fn define_highlight(&mut self, group: &str, link: &str) -> Result<(), EditorError>;
}

impl fmt::Debug for dyn EditorHost {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("EditorHost")
    }
}
