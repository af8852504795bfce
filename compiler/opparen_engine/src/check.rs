use opparen_ast::Diagnostic;

/// Reasons rule text is rejected before any input is matched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("{0}")]
    Syntax(Diagnostic),

    #[error("Grammar '{grammar}' has no rules")]
    NoRules { grammar: String },

    #[error("Duplicate declaration for rule '{name}' in grammar '{grammar}'")]
    DuplicateRule { name: String, grammar: String },

    #[error("Rule '{name}' is not declared in grammar '{grammar}' (used by '{in_rule}')")]
    UndeclaredRule {
        name: String,
        in_rule: String,
        grammar: String,
    },

    #[error("Cannot extend undeclared rule '{name}' in grammar '{grammar}'")]
    ExtendUndeclared { name: String, grammar: String },

    #[error("Rule '{rule}' contains an empty terminal")]
    EmptyTerminal { rule: String },

    #[error("Case name '{case}' in rule '{rule}' is only allowed on a top-level alternative")]
    MisplacedCase { case: String, rule: String },

    #[error("Cannot apply syntactic rule '{name}' from lexical rule '{in_rule}'")]
    SyntacticInLexical { name: String, in_rule: String },
}

impl GrammarError {
    /// The rule the problem was found in, when there is one.
    pub fn rule(&self) -> Option<&str> {
        match self {
            GrammarError::Syntax(_) | GrammarError::NoRules { .. } => None,
            GrammarError::DuplicateRule { name, .. }
            | GrammarError::ExtendUndeclared { name, .. } => Some(name),
            GrammarError::UndeclaredRule { in_rule, .. }
            | GrammarError::SyntacticInLexical { in_rule, .. } => Some(in_rule),
            GrammarError::EmptyTerminal { rule } | GrammarError::MisplacedCase { rule, .. } => {
                Some(rule)
            }
        }
    }

    /// Converts the error into a diagnostic. Only syntax errors carry a
    /// position in the rule text.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GrammarError::Syntax(diag) => diag.clone(),
            other => Diagnostic::unanchored(other.to_string()),
        }
    }
}
