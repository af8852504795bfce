use std::fmt;

use opparen_ast::{Diagnostic, Location, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing matched at the furthest position reached; these are the
    /// descriptions of what would have, in the order they were tried.
    Mismatch { expected: Vec<String> },
    /// Rule applications nested deeper than the grammar's limit.
    TooDeep { limit: usize },
}

/// Why an input did not match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Line {}, col {}: {kind}", .location.line, .location.column)]
pub struct MatchFailure {
    pub location: Location,
    pub kind: FailureKind,
}

impl MatchFailure {
    pub(crate) fn new(input: &str, offset: usize, kind: FailureKind) -> Self {
        Self {
            location: Location::from_offset(input, offset),
            kind,
        }
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }

    pub fn expected(&self) -> &[String] {
        match &self.kind {
            FailureKind::Mismatch { expected } => expected,
            FailureKind::TooDeep { .. } => &[],
        }
    }

    /// The failure as a diagnostic pointing into `input`.
    pub fn to_diagnostic(&self, input: &str) -> Diagnostic {
        let start = self.location.offset;
        let end = input
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(start, |c| start + c.len_utf8());
        let diag = Diagnostic::at_span(Span::in_source(input, start, end), self.kind.to_string());
        match &self.kind {
            FailureKind::Mismatch { expected } if expected.iter().any(|e| e == "end of input") => {
                diag.with_help("is an operator missing from the table?")
            }
            FailureKind::TooDeep { .. } => {
                diag.with_help("raise max_depth in the [limits] section to allow deeper nesting")
            }
            _ => diag,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Mismatch { expected } => {
                f.write_str("expected ")?;
                f.write_str(&join_alternatives(expected))
            }
            FailureKind::TooDeep { limit } => {
                write!(f, "input nests deeper than the limit of {limit}")
            }
        }
    }
}

/// `a`, `a or b`, `a, b, or c`.
fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => "nothing".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}
