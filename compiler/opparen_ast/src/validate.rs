//! Operator table validation.
//!
//! The grammar compiler assumes a well-formed table and does not check it.
//! Callers that accept tables from the outside (config files, CLI flags) run
//! [`validate_table`] first and refuse to continue on any error.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, Severity};
use crate::operator::{Operator, OperatorTable};

/// Bounds applied during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Highest precedence accepted. Every integer up to the table maximum
    /// becomes a grammar level, so this also bounds grammar size.
    pub max_precedence: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_precedence: 100,
        }
    }
}

/// Checks a table and returns every problem found, errors first.
///
/// An empty result means the table is fine. Warnings and notes do not block
/// compilation; see [`has_errors`].
pub fn validate_table(table: &OperatorTable, limits: &ValidationLimits) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut seen: HashMap<&str, (usize, &Operator)> = HashMap::new();

    for (index, op) in table.iter().enumerate() {
        let entry = index + 1;

        if op.symbol.trim().is_empty() {
            diags.push(
                Diagnostic::unanchored(format!("operator #{entry} has an empty symbol"))
                    .with_help("every operator needs a non-empty, non-blank symbol"),
            );
        } else if op.symbol.trim() != op.symbol {
            diags.push(
                Diagnostic::unanchored(format!(
                    "operator #{entry} symbol {:?} has surrounding whitespace",
                    op.symbol
                ))
                .with_help("whitespace between tokens is skipped, so the symbol could never match"),
            );
        } else if op
            .symbol
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric())
        {
            diags.push(
                Diagnostic::unanchored(format!(
                    "operator '{}' starts with a letter or digit and may fuse with adjacent atoms",
                    op.symbol
                ))
                .with_severity(Severity::Note)
                .with_help("surround it with spaces in the input, e.g. 'a mod b'"),
            );
        }

        if op.precedence == 0 {
            diags.push(Diagnostic::unanchored(format!(
                "operator '{}' has precedence 0; precedences start at 1",
                op.symbol
            )));
        } else if op.precedence > limits.max_precedence {
            diags.push(
                Diagnostic::unanchored(format!(
                    "operator '{}' has precedence {} above the limit of {}",
                    op.symbol, op.precedence, limits.max_precedence
                ))
                .with_help("every precedence up to the highest one becomes a grammar level"),
            );
        }

        match seen.get(op.symbol.as_str()).copied() {
            Some((first, prev)) if prev.precedence == op.precedence
                && prev.associativity == op.associativity =>
            {
                diags.push(
                    Diagnostic::unanchored(format!(
                        "operator '{}' is listed twice (#{} and #{entry})",
                        op.symbol,
                        first + 1
                    ))
                    .with_severity(Severity::Warning),
                );
            }
            Some((first, prev)) => {
                log::warn!(
                    "ambiguous operator '{}': {} vs {}",
                    op.symbol,
                    prev,
                    op
                );
                diags.push(
                    Diagnostic::unanchored(format!(
                        "operator '{}' is defined as {} (#{}) and as {} (#{entry})",
                        op.symbol,
                        describe(prev),
                        first + 1,
                        describe(op)
                    ))
                    .with_severity(Severity::Warning)
                    .with_help("the tightest level that matches wins, so the other definition is rarely reached"),
                );
            }
            None => {
                seen.insert(op.symbol.as_str(), (index, op));
            }
        }
    }

    diags.sort_by_key(|d| d.severity);
    diags
}

/// True when any diagnostic is an error.
pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(Diagnostic::is_error)
}

fn describe(op: &Operator) -> String {
    format!("precedence {} {}", op.precedence, op.associativity)
}
