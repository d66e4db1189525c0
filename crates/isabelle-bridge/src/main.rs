//! Command-line entry point for the Isabelle bridge.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match isabelle_bridge::run_cli(std::env::args_os()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            // Logging is not installed when bootstrap itself fails.
            drop(writeln!(io::stderr(), "isabelle-bridge: {error}"));
            ExitCode::FAILURE
        }
    }
}
