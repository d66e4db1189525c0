//! Error types surfaced by the session controller.

use std::fmt;

use thiserror::Error;

use crate::editor::EditorError;
use crate::server::ServerError;

/// Operation being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOperation {
    /// Session start-up.
    Start,
    /// Forwarding the caret position.
    CaretUpdate,
    /// Rendering `PIDE/dynamic_output`.
    DynamicOutput,
    /// Rendering `PIDE/state_output`.
    StateOutput,
    /// Reconciling `PIDE/decoration`.
    Decoration,
    /// Rendering `PIDE/progress`.
    Progress,
    /// Running a user command.
    Command,
    /// Resolving code actions.
    CodeAction,
    /// Reading the next server push.
    Receive,
}

impl fmt::Display for SessionOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::CaretUpdate => "caret update",
            Self::DynamicOutput => "dynamic output",
            Self::StateOutput => "state output",
            Self::Decoration => "decoration",
            Self::Progress => "progress",
            Self::Command => "command",
            Self::CodeAction => "code action",
            Self::Receive => "receive",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server connection failed.
    #[error("language server failed during {operation}: {source}")]
    Server {
        /// Operation that failed.
        operation: SessionOperation,
        /// Underlying error.
        #[source]
        source: ServerError,
    },

    /// The editor host failed.
    #[error("editor failed during {operation}: {source}")]
    Editor {
        /// Operation that failed.
        operation: SessionOperation,
        /// Underlying error.
        #[source]
        source: EditorError,
    },
}

impl SessionError {
    /// Wraps a server failure.
    pub(crate) fn server(operation: SessionOperation, source: ServerError) -> Self {
        Self::Server { operation, source }
    }

    /// Wraps an editor failure.
    pub(crate) fn editor(operation: SessionOperation, source: EditorError) -> Self {
        Self::Editor { operation, source }
    }

    /// Operation during which the error occurred.
    #[must_use]
    pub fn operation(&self) -> SessionOperation {
        match self {
            Self::Server { operation, .. } | Self::Editor { operation, .. } => *operation,
        }
    }
}
