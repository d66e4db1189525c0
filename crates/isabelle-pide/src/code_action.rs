//! Quick fixes derived from the prover's output panel.
//!
//! Two matchers run in order against the line under the cursor and the
//! current output lines; the first one that yields a candidate wins:
//!
//! 1. A proof-method placeholder (`try0`, `try`, `sledgehammer`) is replaced
//!    by the first `Try this: ...` suggestion in the output.
//! 2. A `proof` line receives the case skeleton printed after
//!    `Proof outline with cases:`, inserted at the start of the next line.

use lsp_types::{
    CodeAction, CodeActionKind, DocumentChanges, OneOf, OptionalVersionedTextDocumentIdentifier,
    Position, TextDocumentEdit, TextEdit, Uri, WorkspaceEdit,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Method placeholders in priority order.
///
/// The first token of the list found anywhere in the line is used, even when
/// a later token occurs further left.
pub const METHOD_TOKENS: [&str; 3] = ["try0", "try", "sledgehammer"];
/// Prefix of a suggestion line in the output panel.
pub const TRY_THIS_PREFIX: &str = "Try this: ";
/// Output line introducing a proof skeleton.
pub const PROOF_OUTLINE_MARKER: &str = "Proof outline with cases:";

const PROOF_KEYWORD: &str = "proof";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static TIMING_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+ ms\)\s*$").expect("timing suffix pattern"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static PROOF_ARGUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"proof *\(([^)]*)\)").expect("proof argument pattern"));

/// Lines spanned by the editor selection a code action is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSelection {
    /// Line where the selection starts.
    pub start_line: u32,
    /// Line where the selection ends.
    pub end_line: u32,
}

impl LineSelection {
    /// Selection confined to `line`.
    #[must_use]
    pub const fn single(line: u32) -> Self {
        Self {
            start_line: line,
            end_line: line,
        }
    }

    /// Selection taken from an LSP range.
    #[must_use]
    pub const fn from_range(range: &lsp_types::Range) -> Self {
        Self {
            start_line: range.start.line,
            end_line: range.end.line,
        }
    }

    /// Whether the selection starts and ends on the same line.
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start_line == self.end_line
    }
}

/// A proposed edit of the document under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeActionCandidate {
    /// Title shown in the editor's action menu.
    pub title: String,
    /// Span replaced by `new_text`; empty for insertions.
    pub range: lsp_types::Range,
    /// Replacement or inserted text.
    pub new_text: String,
}

impl CodeActionCandidate {
    /// Wraps the candidate as a quick fix editing `uri`.
    #[must_use]
    pub fn into_code_action(self, uri: Uri) -> CodeAction {
        let edit = TextDocumentEdit {
            text_document: OptionalVersionedTextDocumentIdentifier { uri, version: None },
            edits: vec![OneOf::Left(TextEdit {
                range: self.range,
                new_text: self.new_text,
            })],
        };
        CodeAction {
            title: self.title,
            kind: Some(CodeActionKind::QUICKFIX),
            edit: Some(WorkspaceEdit {
                document_changes: Some(DocumentChanges::Edits(vec![edit])),
                ..WorkspaceEdit::default()
            }),
            ..CodeAction::default()
        }
    }
}

struct ActionContext<'a> {
    line_index: u32,
    cursor_line: &'a str,
    output_lines: &'a [String],
}

type Matcher = fn(&ActionContext<'_>) -> Option<CodeActionCandidate>;

const MATCHERS: [Matcher; 2] = [replace_method, insert_proof_outline];

/// Derives quick fixes for `cursor_line` from the output panel contents.
///
/// Selections spanning several lines never match.
#[must_use]
pub fn resolve_actions(
    selection: LineSelection,
    cursor_line: &str,
    output_lines: &[String],
) -> Vec<CodeActionCandidate> {
    if !selection.is_single_line() {
        return Vec::new();
    }
    let context = ActionContext {
        line_index: selection.start_line,
        cursor_line,
        output_lines,
    };
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(&context))
        .into_iter()
        .collect()
}

fn replace_method(context: &ActionContext<'_>) -> Option<CodeActionCandidate> {
    let (method, offset) = METHOD_TOKENS.iter().find_map(|method| {
        context
            .cursor_line
            .find(method)
            .map(|offset| (*method, offset))
    })?;
    let suggestion = context
        .output_lines
        .iter()
        .find_map(|line| line.strip_prefix(TRY_THIS_PREFIX))?;
    let replacement = TIMING_SUFFIX.replace(suggestion, "").into_owned();

    let start = utf16_column(context.cursor_line, offset);
    let end = start.saturating_add(utf16_len(method));
    Some(CodeActionCandidate {
        title: format!("Replace {method} with {replacement}"),
        range: lsp_types::Range::new(
            Position::new(context.line_index, start),
            Position::new(context.line_index, end),
        ),
        new_text: replacement,
    })
}

fn insert_proof_outline(context: &ActionContext<'_>) -> Option<CodeActionCandidate> {
    if !context.cursor_line.contains(PROOF_KEYWORD) {
        return None;
    }
    let marker = context
        .output_lines
        .iter()
        .position(|line| line == PROOF_OUTLINE_MARKER)?;
    let outline = context
        .output_lines
        .get(marker + 1..)
        .unwrap_or_default()
        .join("\n");

    let argument = PROOF_ARGUMENT
        .captures(context.cursor_line)
        .and_then(|captures| captures.get(1))
        .map_or("", |capture| capture.as_str());
    let title = if argument.is_empty() {
        String::from("Insert proof outline")
    } else {
        format!("Insert proof outline for {argument}")
    };

    let anchor = Position::new(context.line_index.saturating_add(1), 0);
    Some(CodeActionCandidate {
        title,
        range: lsp_types::Range::new(anchor, anchor),
        new_text: outline,
    })
}

fn utf16_column(line: &str, byte_offset: usize) -> u32 {
    line.get(..byte_offset).map_or(0, utf16_len)
}

fn utf16_len(text: &str) -> u32 {
    u32::try_from(text.encode_utf16().count()).unwrap_or(u32::MAX)
}
