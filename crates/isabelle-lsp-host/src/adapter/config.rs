//! Spawn configuration for the server process.

use camino::Utf8PathBuf;
use isabelle_config::ServerInvocation;

/// Configuration for spawning the server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProcessConfig {
    /// Executable path or command name.
    pub command: String,
    /// Arguments in launch order.
    pub args: Vec<String>,
    /// Working directory for the spawned process.
    pub working_dir: Option<Utf8PathBuf>,
}

impl ServerProcessConfig {
    /// Builds a configuration from an explicit command line.
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            working_dir: None,
        }
    }

    /// Sets a custom working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl From<ServerInvocation> for ServerProcessConfig {
    fn from(invocation: ServerInvocation) -> Self {
        Self::new(invocation.command, invocation.args)
    }
}
