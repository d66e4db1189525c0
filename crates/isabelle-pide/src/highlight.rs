//! Per-type highlight history and the decoration diff.
//!
//! The editor's highlight primitives clear whole lines of a namespace, so a
//! decoration push is reconciled line-wise: every line touched by a new or a
//! stale range is cleared, and every range that must be visible on a cleared
//! line is drawn again. Ranges on untouched lines are left alone.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::decoration::DecorationType;
use crate::range::{LineSpan, Range};

static NO_RANGES: BTreeSet<Range> = BTreeSet::new();

/// Editor operations needed to move one decoration type to a new range set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationPatch {
    /// Drop every highlight of the type from the buffer.
    ClearAll,
    /// Drop every highlight of the type, then draw the listed ranges.
    Replace {
        /// Every range of the push.
        add: BTreeSet<Range>,
    },
    /// Clear the listed line spans, then draw the listed ranges.
    Update {
        /// Coalesced line spans to clear, end-exclusive.
        clear: BTreeSet<LineSpan>,
        /// Ranges to draw once the spans are cleared.
        add: BTreeSet<Range>,
    },
}

impl DecorationPatch {
    /// Whether applying the patch leaves the buffer untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::ClearAll | Self::Replace { .. } => false,
            Self::Update { clear, add } => clear.is_empty() && add.is_empty(),
        }
    }
}

/// Computes the patch turning `previous` into `next`.
///
/// An empty `next` short-circuits to [`DecorationPatch::ClearAll`]. Otherwise
/// each added or removed range contributes its line span to the clear set, new
/// ranges are drawn, and ranges carried over from `previous` are drawn again
/// when one of the cleared spans wipes their lines.
#[must_use]
pub fn diff_ranges(previous: &BTreeSet<Range>, next: &BTreeSet<Range>) -> DecorationPatch {
    if next.is_empty() {
        return DecorationPatch::ClearAll;
    }

    let mut clear = BTreeSet::new();
    let mut add = BTreeSet::new();

    for range in next.difference(previous) {
        clear.insert(range.line_span());
        add.insert(*range);
    }
    for range in previous.difference(next) {
        clear.insert(range.line_span());
    }

    if !clear.is_empty() {
        for range in next.intersection(previous) {
            let span = range.line_span();
            if clear.iter().any(|cleared| cleared.overlaps(&span)) {
                add.insert(*range);
            }
        }
    }

    DecorationPatch::Update { clear, add }
}

/// Ranges last drawn for each decoration type of one document.
///
/// A type whose patch could not be applied is marked invalid: its buffer
/// state is unknown, so the next push for it is drawn from scratch.
#[derive(Debug, Clone, Default)]
pub struct HighlightCache {
    drawn: HashMap<DecorationType, BTreeSet<Range>>,
    invalid: HashSet<DecorationType>,
}

impl HighlightCache {
    /// Builds an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges currently recorded for `kind`.
    #[must_use]
    pub fn ranges(&self, kind: DecorationType) -> &BTreeSet<Range> {
        self.drawn.get(&kind).unwrap_or(&NO_RANGES)
    }

    /// Diffs `next` against the recorded ranges and records `next`.
    ///
    /// The last call wins: the cache always mirrors the most recently
    /// reconciled push for the type.
    pub fn reconcile(&mut self, kind: DecorationType, next: BTreeSet<Range>) -> DecorationPatch {
        let patch = if self.invalid.remove(&kind) && !next.is_empty() {
            DecorationPatch::Replace { add: next.clone() }
        } else {
            diff_ranges(self.ranges(kind), &next)
        };
        if next.is_empty() {
            self.drawn.remove(&kind);
        } else {
            self.drawn.insert(kind, next);
        }
        patch
    }

    /// Forgets what was drawn for `kind` after its patch failed to apply.
    pub fn invalidate(&mut self, kind: DecorationType) {
        self.drawn.remove(&kind);
        self.invalid.insert(kind);
    }

    /// Whether `kind` will be redrawn from scratch on its next push.
    #[must_use]
    pub fn is_invalid(&self, kind: DecorationType) -> bool {
        self.invalid.contains(&kind)
    }

    /// Whether no type has recorded ranges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }
}
