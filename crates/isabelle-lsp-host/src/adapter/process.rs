//! Process-backed PIDE server.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::ServerProcessConfig;
use super::error::AdapterError;
use super::jsonrpc::IncomingNotification;
use super::lifecycle::{ADAPTER_TARGET, kill_child, terminate_child};
use super::messaging::JsonRpcChannel;
use super::state::{ChildChannel, ProcessState};
use super::transport::ChildTransport;

/// A [`PideServer`](crate::PideServer) that spawns `isabelle vscode_server`
/// and talks to it over stdio.
pub struct ProcessPideServer {
    config: ServerProcessConfig,
    state: ProcessState,
}

impl ProcessPideServer {
    /// Creates an adapter that has not spawned its process yet.
    #[must_use]
    pub fn new(config: ServerProcessConfig) -> Self {
        Self {
            config,
            state: ProcessState::NotStarted,
        }
    }

    /// Spawn configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerProcessConfig {
        &self.config
    }

    /// Whether the process is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running { .. })
    }

    pub(super) fn spawn(&mut self) -> Result<(), AdapterError> {
        debug!(
            target: ADAPTER_TARGET,
            command = %self.config.command,
            args = ?self.config.args,
            "spawning language server process"
        );

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                AdapterError::CommandNotFound {
                    command: self.config.command.clone(),
                    source: Arc::new(error),
                }
            } else {
                AdapterError::Spawn {
                    message: format!("failed to start {}", self.config.command),
                    source: Arc::new(error),
                }
            }
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            kill_child(&mut child);
            return Err(AdapterError::Spawn {
                message: "failed to capture stdio".to_owned(),
                source: Arc::new(io::Error::other("stdio not piped")),
            });
        };

        debug!(target: ADAPTER_TARGET, pid = child.id(), "language server process spawned");
        let channel = JsonRpcChannel::new(ChildTransport::from_child(stdout, stdin));
        self.state = ProcessState::Running { child, channel };
        Ok(())
    }

    fn channel(&mut self) -> Result<&mut ChildChannel, AdapterError> {
        match &mut self.state {
            ProcessState::Running { channel, .. } => Ok(channel),
            ProcessState::NotStarted | ProcessState::Stopped => Err(AdapterError::NotRunning),
        }
    }

    pub(super) fn request<P, T>(&mut self, method: &str, params: P) -> Result<T, AdapterError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.channel()?.request(method, params)
    }

    pub(super) fn notify<P>(&mut self, method: &str, params: P) -> Result<(), AdapterError>
    where
        P: Serialize,
    {
        self.channel()?.notify(method, params)
    }

    pub(super) fn receive(&mut self) -> Result<Option<IncomingNotification>, AdapterError> {
        match &mut self.state {
            ProcessState::Running { channel, .. } => channel.next_notification(),
            ProcessState::NotStarted | ProcessState::Stopped => Ok(None),
        }
    }

    /// Sends `shutdown` and `exit`, then reaps the process.
    ///
    /// Failures of either message are logged; the process is terminated
    /// regardless.
    pub fn stop(&mut self) {
        debug!(target: ADAPTER_TARGET, "initiating graceful shutdown");

        if let Err(error) = self.request::<_, serde_json::Value>("shutdown", ()) {
            debug!(
                target: ADAPTER_TARGET,
                operation = "shutdown",
                error = %error,
                "shutdown request failed"
            );
        }
        if let Err(error) = self.notify("exit", ()) {
            debug!(
                target: ADAPTER_TARGET,
                operation = "exit",
                error = %error,
                "exit notification failed"
            );
        }

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut self.state, ProcessState::Stopped)
        {
            terminate_child(&mut child);
        }
    }
}

impl Drop for ProcessPideServer {
    fn drop(&mut self) {
        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut self.state, ProcessState::Stopped)
        {
            kill_child(&mut child);
        }
    }
}

impl fmt::Debug for ProcessPideServer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            ProcessState::NotStarted => "not_started".to_owned(),
            ProcessState::Running { child, .. } => format!("running (pid: {})", child.id()),
            ProcessState::Stopped => "stopped".to_owned(),
        };
        formatter
            .debug_struct("ProcessPideServer")
            .field("command", &self.config.command)
            .field("state", &state)
            .finish()
    }
}
