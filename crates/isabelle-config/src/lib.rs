//! Shared configuration for the Isabelle PIDE bridge.
//!
//! Settings are layered by `ortho_config`: built-in defaults, then a
//! configuration file, then `ISABELLE_*` environment variables, then CLI
//! flags. Besides the editor-facing switches, the configuration knows how to
//! assemble the prover's `vscode_server` command line.

mod defaults;
mod invocation;
mod logging;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_COMMAND, DEFAULT_ENABLE, DEFAULT_LOG_FILTER, DEFAULT_PIDE_EXTENSIONS,
    DEFAULT_PROGRESS_WIDTH, DEFAULT_SERVER_LOG, default_command, default_log_format,
    default_server_log,
};
pub use invocation::{DEBUG_FLAGS, PIDE_EXTENSIONS_FLAG, SERVER_SUBCOMMAND, ServerInvocation};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved bridge configuration.
///
/// Switches are optional on every layer so that an absent flag never masks a
/// value from the file or the environment; accessors fall back to the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ISABELLE")]
pub struct Config {
    /// Whether the bridge starts at all.
    #[serde(default)]
    enable: Option<bool>,
    /// Prover executable.
    #[ortho_config(default = defaults::default_command())]
    command: String,
    /// Arguments appended after the generated ones.
    #[serde(default)]
    #[ortho_config(merge_strategy = "append")]
    extra_args: Vec<String>,
    /// Whether to ask the server for PIDE notifications.
    #[serde(default)]
    use_pide_extensions: Option<bool>,
    /// Whether the server runs verbosely with a log file.
    #[serde(default)]
    debug: Option<bool>,
    /// Log file written by the server in debug mode.
    #[ortho_config(default = defaults::default_server_log())]
    log_file: Utf8PathBuf,
    /// Whether the output, state and progress panels open on start.
    #[serde(default)]
    open_at_startup: Option<bool>,
    /// Width of the progress panel in columns.
    #[ortho_config(default = defaults::DEFAULT_PROGRESS_WIDTH)]
    progress_width: usize,
    /// `tracing` filter expression for the bridge's own logs.
    #[ortho_config(default = defaults::default_log_filter_string())]
    log_filter: String,
    /// Output format of the bridge's own logs.
    #[ortho_config(default = defaults::default_log_format())]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable: None,
            command: default_command(),
            extra_args: Vec::new(),
            use_pide_extensions: None,
            debug: None,
            log_file: default_server_log(),
            open_at_startup: None,
            progress_width: DEFAULT_PROGRESS_WIDTH,
            log_filter: defaults::default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Whether the bridge should start.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enable.unwrap_or(DEFAULT_ENABLE)
    }

    /// Prover executable.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// User-supplied trailing arguments.
    #[must_use]
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// Whether PIDE extensions are requested from the server.
    #[must_use]
    pub fn use_pide_extensions(&self) -> bool {
        self.use_pide_extensions.unwrap_or(DEFAULT_PIDE_EXTENSIONS)
    }

    /// Whether server debugging is on.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Log file written by the server in debug mode.
    #[must_use]
    pub fn log_file(&self) -> &Utf8PathBuf {
        &self.log_file
    }

    /// Whether all panels open on start.
    #[must_use]
    pub fn open_at_startup(&self) -> bool {
        self.open_at_startup.unwrap_or(false)
    }

    /// Width of the progress panel in columns.
    #[must_use]
    pub fn progress_width(&self) -> usize {
        self.progress_width
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format of the bridge's logs.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Command line used to launch the prover's language server.
    #[must_use]
    pub fn server_invocation(&self) -> ServerInvocation {
        ServerInvocation::from_config(self)
    }

    /// Enables or disables the bridge.
    #[must_use]
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = Some(enable);
        self
    }

    /// Replaces the prover executable.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Replaces the trailing user arguments.
    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Toggles PIDE extensions.
    #[must_use]
    pub fn with_pide_extensions(mut self, enabled: bool) -> Self {
        self.use_pide_extensions = Some(enabled);
        self
    }

    /// Toggles server debugging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Toggles opening the panels on start.
    #[must_use]
    pub fn with_open_at_startup(mut self, open: bool) -> Self {
        self.open_at_startup = Some(open);
        self
    }

    /// Replaces the progress panel width.
    #[must_use]
    pub fn with_progress_width(mut self, width: usize) -> Self {
        self.progress_width = width;
        self
    }

    /// Replaces the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Replaces the log output format.
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}
