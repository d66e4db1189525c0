//! Built-in values for settings no layer provides.

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Prover launcher looked up on `PATH`.
pub const DEFAULT_COMMAND: &str = "isabelle";

/// Whether the bridge starts when no layer says otherwise.
pub const DEFAULT_ENABLE: bool = true;

/// Whether `PIDE/*` notifications are requested when no layer says otherwise.
pub const DEFAULT_PIDE_EXTENSIONS: bool = true;

/// Progress panel width in columns.
pub const DEFAULT_PROGRESS_WIDTH: usize = 40;

/// Where the server writes its log in debug mode.
pub const DEFAULT_SERVER_LOG: &str = "/tmp/isabelle-lsp.log";

/// Filter applied to the bridge's own logs.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// [`DEFAULT_COMMAND`] as an owned string.
#[must_use]
pub fn default_command() -> String {
    DEFAULT_COMMAND.to_owned()
}

/// [`DEFAULT_SERVER_LOG`] as a path.
#[must_use]
pub fn default_server_log() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SERVER_LOG)
}

pub(crate) fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Human-readable lines unless configured otherwise.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
