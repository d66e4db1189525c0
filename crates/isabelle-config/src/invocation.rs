//! Command line of the prover's language server.

use crate::Config;

/// Isabelle tool that speaks LSP on stdio.
pub const SERVER_SUBCOMMAND: &str = "vscode_server";

/// System option enabling the `PIDE/*` notifications.
pub const PIDE_EXTENSIONS_FLAG: [&str; 2] = ["-o", "vscode_pide_extensions"];

/// Verbosity flag; the log file follows as `-L <path>`.
pub const DEBUG_FLAGS: [&str; 2] = ["-v", "-L"];

/// Executable and arguments used to spawn the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInvocation {
    /// Executable name or path.
    pub command: String,
    /// Arguments in launch order.
    pub args: Vec<String>,
}

impl ServerInvocation {
    /// Assembles base arguments, then the extension flag, then debug flags,
    /// then the user's extra arguments.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut args = vec![SERVER_SUBCOMMAND.to_owned()];
        if config.use_pide_extensions() {
            args.extend(PIDE_EXTENSIONS_FLAG.iter().map(|flag| (*flag).to_owned()));
        }
        if config.debug() {
            args.extend(DEBUG_FLAGS.iter().map(|flag| (*flag).to_owned()));
            args.push(config.log_file().to_string());
        }
        args.extend(config.extra_args().iter().cloned());
        Self {
            command: config.command().to_owned(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_invocation_enables_extensions_only() {
        let invocation = Config::default().server_invocation();

        assert_eq!(invocation.command, "isabelle");
        assert_eq!(
            invocation.args,
            vec!["vscode_server", "-o", "vscode_pide_extensions"]
        );
    }

    #[rstest]
    fn arguments_follow_documented_order() {
        let config = Config::default()
            .with_command("/opt/Isabelle2024/bin/isabelle")
            .with_debug(true)
            .with_extra_args(["-l", "HOL-Analysis"]);

        let invocation = config.server_invocation();

        assert_eq!(invocation.command, "/opt/Isabelle2024/bin/isabelle");
        assert_eq!(
            invocation.args,
            vec![
                "vscode_server",
                "-o",
                "vscode_pide_extensions",
                "-v",
                "-L",
                "/tmp/isabelle-lsp.log",
                "-l",
                "HOL-Analysis",
            ]
        );
    }

    #[rstest]
    fn extensions_can_be_disabled() {
        let config = Config::default()
            .with_pide_extensions(false)
            .with_extra_args(["-m", "ASCII"]);

        assert_eq!(
            config.server_invocation().args,
            vec!["vscode_server", "-m", "ASCII"]
        );
    }
}
