use std::fmt;

use crate::span::Span;

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A problem anchored at a place in some source text.
///
/// The source is whatever the diagnostic was produced from: rule text for
/// grammar errors, the input expression for parse failures. Table validation
/// diagnostics carry an empty span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic with an explicit span
    pub fn at_span<S: Into<String>>(span: Span, message: S) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Create an error diagnostic that is not tied to any source position
    pub fn unanchored<S: Into<String>>(message: S) -> Self {
        Self::at_span(Span::default(), message)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// True when the span points somewhere real (lines are 1-based).
    pub fn is_anchored(&self) -> bool {
        self.span.line > 0
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anchored() {
            write!(
                f,
                "Line {}, col {}: {}",
                self.span.line, self.span.column, self.message
            )
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Render a diagnostic against its source, rustc style:
///
/// ```text
/// error: expected end of input
///  --> line 1, col 3
///   |
/// 1 | 1 + 1
///   |   ^
/// ```
///
/// Single-character (and empty) spans get a caret; longer spans are underlined
/// with tildes. Unanchored diagnostics render as the header line plus help.
pub fn render_snippet(diag: &Diagnostic, source: &str) -> String {
    let mut out = format!("{}: {}", diag.severity, diag.message);

    if diag.is_anchored() {
        let line_no = diag.span.line as usize;
        let line_text = source.lines().nth(line_no - 1).unwrap_or("");
        let gutter = " ".repeat(line_no.to_string().len());
        let col = (diag.span.column as usize).max(1);

        let highlighted = source
            .get(diag.span.start..diag.span.end)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        let underline = if highlighted <= 1 {
            "^".to_string()
        } else {
            "~".repeat(highlighted)
        };

        out.push_str(&format!("\n{gutter}--> line {line_no}, col {col}"));
        out.push_str(&format!("\n{gutter} |"));
        out.push_str(&format!("\n{line_no} | {line_text}"));
        out.push_str(&format!("\n{gutter} | {}{underline}", " ".repeat(col - 1)));
    }

    if let Some(help) = &diag.help {
        out.push_str(&format!("\nhelp: {help}"));
    }
    out
}
