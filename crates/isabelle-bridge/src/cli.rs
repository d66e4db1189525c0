//! Splitting the command line into configuration flags and theories.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Token separating configuration flags from theory paths.
pub const THEORY_SEPARATOR: &str = "--";

/// A theory path that is not valid UTF-8.
#[derive(Debug, Error)]
#[error("theory path is not valid UTF-8: {}", .0.to_string_lossy())]
pub struct NonUtf8TheoryPath(pub OsString);

/// Arguments of one bridge invocation.
///
/// Everything before [`THEORY_SEPARATOR`] is handed to the configuration
/// loader; everything after it names theories to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    config_args: Vec<OsString>,
    theories: Vec<Utf8PathBuf>,
}

impl CommandLine {
    /// Splits raw process arguments, program name included.
    ///
    /// # Errors
    ///
    /// Returns [`NonUtf8TheoryPath`] when a theory path is not UTF-8.
    pub fn parse<I, S>(args: I) -> Result<Self, NonUtf8TheoryPath>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let config_args: Vec<OsString> = args
            .by_ref()
            .take_while(|arg| arg != THEORY_SEPARATOR)
            .collect();
        let theories = args
            .map(|arg| {
                Utf8PathBuf::from_path_buf(arg.into())
                    .map_err(|path| NonUtf8TheoryPath(path.into_os_string()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            config_args,
            theories,
        })
    }

    /// Arguments for the configuration loader.
    #[must_use]
    pub fn config_args(&self) -> &[OsString] {
        &self.config_args
    }

    /// Theories to open, in command-line order.
    #[must_use]
    pub fn theories(&self) -> &[Utf8PathBuf] {
        &self.theories
    }
}
