//! Lifecycle state of the server process.

use std::io::{BufReader, BufWriter};
use std::process::{Child, ChildStdin, ChildStdout};

use super::messaging::JsonRpcChannel;

/// Channel over a spawned process's pipes.
pub type ChildChannel = JsonRpcChannel<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

/// Internal state of the server process.
#[derive(Debug, Default)]
pub enum ProcessState {
    /// Process has not been started.
    #[default]
    NotStarted,
    /// Process is running.
    Running {
        /// Child process handle.
        child: Child,
        /// JSON-RPC channel over its stdio.
        channel: ChildChannel,
    },
    /// Process has been stopped.
    Stopped,
}
