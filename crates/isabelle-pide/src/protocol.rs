//! PIDE notification methods and payloads.
//!
//! The prover exchanges these on the regular LSP channel, next to the
//! standard `textDocument/*` traffic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::progress::TheoryProgress;
use crate::range::Range;

/// Client to server: the cursor moved.
pub const CARET_UPDATE: &str = "PIDE/caret_update";
/// Client to server: ask for a fresh `PIDE/progress` push.
pub const PROGRESS_REQUEST: &str = "PIDE/progress_request";
/// Server to client: output panel contents at the caret.
pub const DYNAMIC_OUTPUT: &str = "PIDE/dynamic_output";
/// Server to client: state panel contents.
pub const STATE_OUTPUT: &str = "PIDE/state_output";
/// Server to client: semantic highlights of one type for one document.
pub const DECORATION: &str = "PIDE/decoration";
/// Server to client: per-theory build status.
pub const PROGRESS: &str = "PIDE/progress";

/// Payload of [`CARET_UPDATE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaretUpdateParams {
    /// `file://` URI of the document holding the caret.
    pub uri: String,
    /// Zero-based caret line.
    pub line: u32,
    /// Zero-based caret column.
    pub character: u32,
}

impl CaretUpdateParams {
    /// Builds the payload for an absolute file path.
    #[must_use]
    pub fn for_path(path: &str, line: u32, character: u32) -> Self {
        Self {
            uri: format!("file://{path}"),
            line,
            character,
        }
    }
}

/// Payload of [`DYNAMIC_OUTPUT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicOutputParams {
    /// Newline-delimited panel text.
    pub content: String,
}

/// Payload of [`STATE_OUTPUT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOutputParams {
    /// Identifier of the state panel.
    #[serde(default)]
    pub id: u64,
    /// Newline-delimited panel text.
    pub content: String,
}

/// Splits panel text into editor lines.
#[must_use]
pub fn panel_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_owned).collect()
}

/// Payload of [`DECORATION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationParams {
    /// Document the decorations belong to.
    pub uri: String,
    /// Decoration type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Highlighted regions; empty to clear the type.
    #[serde(default)]
    pub content: Vec<DecorationEntry>,
}

/// One highlighted region of a [`DecorationParams`] push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationEntry {
    /// `[startLine, startCol, endLine, endCol]`.
    pub range: Vec<i64>,
}

impl DecorationParams {
    /// Distinct well-formed ranges of the push, with the count of rejected entries.
    #[must_use]
    pub fn ranges(&self) -> (BTreeSet<Range>, usize) {
        let mut ranges = BTreeSet::new();
        let mut rejected = 0;
        for entry in &self.content {
            match Range::from_wire(&entry.range) {
                Some(range) => {
                    ranges.insert(range);
                }
                None => rejected += 1,
            }
        }
        (ranges, rejected)
    }
}

/// Payload of [`PROGRESS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressParams {
    /// Theories in server order.
    #[serde(rename = "nodes-status", default)]
    pub nodes_status: Vec<TheoryProgress>,
}

/// Decoded server push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerNotification {
    /// [`DYNAMIC_OUTPUT`].
    DynamicOutput(DynamicOutputParams),
    /// [`STATE_OUTPUT`].
    StateOutput(StateOutputParams),
    /// [`DECORATION`].
    Decoration(DecorationParams),
    /// [`PROGRESS`].
    Progress(ProgressParams),
    /// Any method the bridge does not render.
    Other {
        /// Method name as received.
        method: String,
    },
}

impl ServerNotification {
    /// Decodes a notification from its method and raw parameters.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when a known method carries malformed params.
    pub fn decode(method: &str, params: Option<Value>) -> Result<Self, serde_json::Error> {
        let params = params.unwrap_or(Value::Null);
        Ok(match method {
            DYNAMIC_OUTPUT => Self::DynamicOutput(serde_json::from_value(params)?),
            STATE_OUTPUT => Self::StateOutput(serde_json::from_value(params)?),
            DECORATION => Self::Decoration(serde_json::from_value(params)?),
            PROGRESS => Self::Progress(serde_json::from_value(params)?),
            other => Self::Other {
                method: other.to_owned(),
            },
        })
    }

    /// Method name of the notification.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::DynamicOutput(_) => DYNAMIC_OUTPUT,
            Self::StateOutput(_) => STATE_OUTPUT,
            Self::Decoration(_) => DECORATION,
            Self::Progress(_) => PROGRESS,
            Self::Other { method } => method,
        }
    }
}
