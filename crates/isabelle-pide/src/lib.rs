//! Editor-independent core of the Isabelle PIDE bridge.
//!
//! The crate turns PIDE push notifications into editor operations without
//! touching an editor itself. Decorations are reconciled against a per-type
//! [`HighlightCache`] so only changed lines are cleared and redrawn, theory
//! progress is rendered into a fixed-width text report, and the
//! [`resolve_actions`] matcher derives quick fixes from the prover's output
//! panel. Every function here is pure; the session controller in
//! `isabelle-lsp-host` applies the results to a concrete editor.

mod code_action;
mod decoration;
mod highlight;
pub mod protocol;
mod progress;
mod range;

pub use code_action::{
    CodeActionCandidate, LineSelection, METHOD_TOKENS, PROOF_OUTLINE_MARKER, TRY_THIS_PREFIX,
    resolve_actions,
};
pub use decoration::{DecorationType, DecorationTypeParseError, GROUP_PREFIX, presentation_group};
pub use highlight::{DecorationPatch, HighlightCache, diff_ranges};
pub use progress::{
    DONE_GROUP, ERROR_GROUP, ProgressReport, TheoryProgress, TheoryStatus, render_progress,
};
pub use range::{LineSpan, Range};
