//! Logging setup for the bridge binary.
//!
//! Events go to stderr so that stdout stays free for anything piping the
//! bridge. The `debug` switch that makes the prover log verbosely also turns
//! on the bridge's own traffic and decoration logs.

use std::io::{self, IsTerminal};

use isabelle_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Directives added to `log_filter` when `debug` is on.
pub const DEBUG_DIRECTIVES: [&str; 2] = [
    "isabelle_lsp_host::adapter=trace",
    "isabelle_lsp_host::decoration=debug",
];

static SUBSCRIBER_INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Failures while installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter`, or a directive derived from it, does not parse.
    #[error("invalid log filter {filter:?}: {message}")]
    Filter {
        /// Filter text as handed to the parser.
        filter: String,
        /// Parser message.
        message: String,
    },
    /// Another subscriber already owns the global slot.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls return a handle without reconfiguring anything, so the filter
/// and format of the first successful call stay in effect.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse, or [`TelemetryError::Subscriber`] when a foreign subscriber was
/// installed first.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    SUBSCRIBER_INSTALLED
        .get_or_try_init(|| install(config))
        .map(|_| TelemetryHandle)
}

/// Filter text for `config`: `log_filter`, plus [`DEBUG_DIRECTIVES`] when
/// `debug` is on.
#[must_use]
pub fn filter_directives(config: &Config) -> String {
    let base = config.log_filter().trim();
    if !config.debug() {
        return base.to_owned();
    }
    std::iter::once(base)
        .filter(|directive| !directive.is_empty())
        .chain(DEBUG_DIRECTIVES)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the filter for `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the directives do not parse.
pub fn build_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    let filter = filter_directives(config);
    EnvFilter::try_new(&filter).map_err(|error| TelemetryError::Filter {
        message: error.to_string(),
        filter,
    })
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn plain_configuration_uses_log_filter_verbatim() {
        let config = Config::default().with_log_filter("isabelle_bridge=debug");

        assert_eq!(filter_directives(&config), "isabelle_bridge=debug");
    }

    #[rstest]
    #[case("warn", "warn,isabelle_lsp_host::adapter=trace,isabelle_lsp_host::decoration=debug")]
    #[case("", "isabelle_lsp_host::adapter=trace,isabelle_lsp_host::decoration=debug")]
    fn debug_adds_traffic_directives(#[case] base: &str, #[case] expected: &str) {
        let config = Config::default()
            .with_log_filter(base)
            .with_debug(true);

        assert_eq!(filter_directives(&config), expected);
        assert!(build_filter(&config).is_ok());
    }

    #[rstest]
    fn rejects_unparsable_filter() {
        let config = Config::default().with_log_filter("isabelle=[");

        let result = build_filter(&config);

        assert!(matches!(
            result,
            Err(TelemetryError::Filter { ref filter, .. }) if filter == "isabelle=["
        ));
    }
}
