//! Purpose: Parser policy knobs for lenient-vs-strict behaviour.
//! Exports: `ParseOptions`, `EscapePolicy`, `TrailingPolicy`, `DEFAULT_MAX_DEPTH`,
//! `HARD_MAX_DEPTH`.
//! Role: Configuration passed into `parse_with`; the default is strict.
//! Invariants: `ParseOptions::lenient()` reproduces the legacy reader (dropped
//! unknown escapes, ignored trailing text); unterminated input always fails.
//! Invariants: Nesting never exceeds `HARD_MAX_DEPTH`, whatever `max_depth` says.

pub const DEFAULT_MAX_DEPTH: usize = 512;
/// Ceiling applied when `max_depth` is `None` or larger; keeps recursion inside
/// a default-sized thread stack.
pub const HARD_MAX_DEPTH: usize = 600;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EscapePolicy {
    /// Unknown `\x` escapes fail with `InvalidEscape`.
    #[default]
    Reject,
    /// Unknown `\x` escapes contribute nothing to the string.
    Drop,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TrailingPolicy {
    /// Anything but whitespace after the root value fails with `TrailingContent`.
    #[default]
    Reject,
    Ignore,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOptions {
    pub escapes: EscapePolicy,
    pub trailing: TrailingPolicy,
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            escapes: EscapePolicy::Reject,
            trailing: TrailingPolicy::Reject,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            escapes: EscapePolicy::Drop,
            trailing: TrailingPolicy::Ignore,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    pub fn with_escapes(mut self, escapes: EscapePolicy) -> Self {
        self.escapes = escapes;
        self
    }

    pub fn with_trailing(mut self, trailing: TrailingPolicy) -> Self {
        self.trailing = trailing;
        self
    }

    /// `None` lifts the configurable limit; `HARD_MAX_DEPTH` still applies.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Nesting limit the parser enforces.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.map_or(HARD_MAX_DEPTH, |max| max.min(HARD_MAX_DEPTH))
    }
}
