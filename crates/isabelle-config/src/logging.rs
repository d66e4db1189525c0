//! Output format of the bridge's own logs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the bridge renders its own log lines.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Single-line text for terminals.
    #[default]
    Compact,
}

/// Returned when a string names no [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
