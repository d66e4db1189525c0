//! Reaping the server process.

use std::process::Child;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Log target for adapter operations.
pub(crate) const ADAPTER_TARGET: &str = "isabelle_lsp_host::adapter";

/// How long the server may take to exit after `exit` before it is killed.
const GRACE_PERIOD: Duration = Duration::from_millis(200);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Gives the server [`GRACE_PERIOD`] to exit, then kills it.
pub(super) fn terminate_child(child: &mut Child) {
    let deadline = Instant::now() + GRACE_PERIOD;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(target: ADAPTER_TARGET, ?status, "prover server exited");
                return;
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) => break,
            Err(error) => {
                warn!(target: ADAPTER_TARGET, error = %error, "cannot poll prover server");
                break;
            }
        }
    }
    warn!(target: ADAPTER_TARGET, pid = child.id(), "prover server still running, killing it");
    kill_child(child);
}

/// Kills the server and waits for it.
pub(super) fn kill_child(child: &mut Child) {
    let pid = child.id();
    match child.kill().and_then(|()| child.wait()) {
        Ok(status) => debug!(target: ADAPTER_TARGET, pid, ?status, "prover server killed"),
        Err(error) => {
            warn!(target: ADAPTER_TARGET, pid, error = %error, "failed to kill prover server");
        }
    }
}
