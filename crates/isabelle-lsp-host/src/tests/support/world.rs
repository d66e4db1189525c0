//! BDD world wrapping a session harness.

use lsp_types::CodeAction;

use crate::errors::SessionError;
use crate::session::SessionSettings;

use super::Harness;

/// Shared state exercised by BDD step implementations.
#[derive(Debug)]
pub struct SessionWorld {
    /// Session and doubles under test.
    pub harness: Harness,
    /// Last error returned by the session.
    pub last_error: Option<SessionError>,
    /// Last code actions returned by the session.
    pub last_actions: Vec<CodeAction>,
}

impl SessionWorld {
    /// Builds a world with the given settings.
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            harness: Harness::with_settings(settings),
            last_error: None,
            last_actions: Vec::new(),
        }
    }

    /// Stores the outcome of a session call.
    pub fn record(&mut self, result: Result<(), SessionError>) {
        self.last_error = result.err();
    }
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::new(SessionSettings {
            progress_width: 20,
            open_at_startup: false,
        })
    }
}
