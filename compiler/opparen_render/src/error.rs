use opparen_ast::{Associativity, Diagnostic, VisitError};
use opparen_engine::{GrammarError, MatchFailure};
use thiserror::Error;

/// A match tree or parse tree that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("No binding for rule '{rule}'")]
    UnknownRule { rule: String },

    #[error("Unexpected match for rule '{rule}': {detail}")]
    UnexpectedShape { rule: String, detail: String },

    #[error("Operator '{symbol}' is not bound at precedence {level} ({associativity})")]
    UnboundSymbol {
        symbol: String,
        level: u32,
        associativity: Associativity,
    },

    #[error("expression nests deeper than the limit of {limit}")]
    TooDeep { limit: usize },

    #[error("{0}")]
    Fault(String),
}

impl RenderError {
    pub(crate) fn shape(rule: &str, detail: impl Into<String>) -> Self {
        RenderError::UnexpectedShape {
            rule: rule.to_string(),
            detail: detail.into(),
        }
    }
}

impl From<VisitError> for RenderError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::TooDeep { limit } => RenderError::TooDeep { limit },
            VisitError::Custom(msg) => RenderError::Fault(msg),
        }
    }
}

/// Everything that can go wrong between an operator table and an output string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The engine rejected the generated rule text.
    #[error(transparent)]
    GrammarCompile(#[from] GrammarError),

    /// The input does not match the grammar.
    #[error(transparent)]
    Parse(#[from] MatchFailure),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// A diagnostic anchored in `input` where possible.
    pub fn to_diagnostic(&self, input: &str) -> Diagnostic {
        match self {
            PipelineError::GrammarCompile(err) => err.to_diagnostic(),
            PipelineError::Parse(failure) => failure.to_diagnostic(input),
            PipelineError::Render(err) => Diagnostic::unanchored(err.to_string()),
        }
    }
}
