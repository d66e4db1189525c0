//! Start-up sequence: configuration, then logging.

use std::ffi::OsString;
use std::sync::Arc;

use isabelle_config::Config;
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::{debug, info};

use crate::telemetry::{self, TelemetryError, TelemetryHandle};

const BOOTSTRAP_TARGET: &str = "isabelle_bridge::bootstrap";

/// Source of the bridge configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when a layer is malformed.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loads every layer, taking flags from the given argument list.
#[derive(Debug, Clone, Default)]
pub struct ArgsConfigLoader {
    args: Vec<OsString>,
}

impl ArgsConfigLoader {
    /// Wraps an argument list whose first entry is the program name.
    #[must_use]
    pub const fn new(args: Vec<OsString>) -> Self {
        Self { args }
    }
}

impl ConfigLoader for ArgsConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(self.args.iter().cloned())
    }
}

/// Failures before the bridge can talk to the prover.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {source}")]
    Telemetry {
        /// Subscriber error.
        #[source]
        source: TelemetryError,
    },
}

/// Configured bridge, ready to launch the server.
#[derive(Debug)]
pub struct Bridge {
    config: Config,
    telemetry: TelemetryHandle,
}

impl Bridge {
    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Handle of the installed log subscriber.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Whether the configuration allows the bridge to start.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.enabled()
    }
}

/// Loads the configuration and installs logging.
///
/// # Errors
///
/// Returns [`BootstrapError`] naming the step that failed.
pub fn bootstrap_with(loader: &dyn ConfigLoader) -> Result<Bridge, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    debug!(
        target: BOOTSTRAP_TARGET,
        command = config.command(),
        pide_extensions = config.use_pide_extensions(),
        debug = config.debug(),
        "configuration loaded"
    );
    if !config.enabled() {
        info!(target: BOOTSTRAP_TARGET, "bridge disabled by configuration");
    }
    Ok(Bridge { config, telemetry })
}
