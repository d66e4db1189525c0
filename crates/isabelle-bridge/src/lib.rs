//! Headless driver for the Isabelle PIDE bridge.
//!
//! The binary loads the layered configuration, installs logging, launches
//! the prover's language server and renders its pushes into in-memory panels
//! that are mirrored to the log. Arguments after `--` name theories to open;
//! the first becomes the document whose caret is followed.

pub mod bootstrap;
pub mod cli;
pub mod headless;
pub mod run;
pub mod telemetry;

use std::ffi::OsString;

use thiserror::Error;
use tracing::info;

use crate::bootstrap::{ArgsConfigLoader, BootstrapError, bootstrap_with};
use crate::cli::{CommandLine, NonUtf8TheoryPath};
use crate::run::{RunError, RunSummary};

const BRIDGE_TARGET: &str = "isabelle_bridge";

/// Failures of a bridge invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The command line could not be split.
    #[error(transparent)]
    CommandLine(#[from] NonUtf8TheoryPath),
    /// Configuration or logging failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The headless run failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Runs one bridge invocation from raw process arguments.
///
/// Returns `None` when the configuration disables the bridge.
///
/// # Errors
///
/// Returns [`BridgeError`] describing the first step that failed.
pub fn run_cli<I, S>(args: I) -> Result<Option<RunSummary>, BridgeError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let command_line = CommandLine::parse(args)?;
    let loader = ArgsConfigLoader::new(command_line.config_args().to_vec());
    let bridge = bootstrap_with(&loader)?;
    if !bridge.enabled() {
        return Ok(None);
    }
    let summary = run::run(bridge.config(), command_line.theories())?;
    info!(
        target: BRIDGE_TARGET,
        theories = summary.theories,
        notifications = summary.notifications,
        "bridge finished"
    );
    Ok(Some(summary))
}
