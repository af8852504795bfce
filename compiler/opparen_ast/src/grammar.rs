//! Syntax tree for rule text.
//!
//! The grammar compiler builds a [`GrammarDef`] and renders it with `Display`;
//! the matching engine parses rule text back into the same structure. Keeping
//! one definition for both directions is what makes the emitted text stable.
//!
//! The text form follows the usual PEG conventions:
//!
//! ```text
//! Name {
//!   Rule
//!     = Rule "op" Next  -- case
//!     | Next
//!
//!   lexical
//!     = digit+
//! }
//! ```
//!
//! Rules whose name starts with an uppercase letter are syntactic: whitespace
//! (the `space` rule) is skipped before each of their terms. Lowercase rules
//! are lexical and match characters exactly.

use std::fmt;

/// How a rule definition relates to an existing rule of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOp {
    /// `=` introduces a new rule.
    Define,
    /// `+=` adds alternatives in front of an existing (possibly built-in) rule.
    Extend,
}

impl RuleOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOp::Define => "=",
            RuleOp::Extend => "+=",
        }
    }
}

/// A parsing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PExpr {
    /// Application of a named rule.
    Apply(String),
    /// A literal string.
    Terminal(String),
    Seq(Vec<PExpr>),
    /// Ordered choice: the first alternative that matches wins.
    Alt(Vec<PExpr>),
    Star(Box<PExpr>),
    Plus(Box<PExpr>),
    Opt(Box<PExpr>),
    /// A named alternative (`body  -- name`). Only valid as a top-level
    /// alternative of a rule body; the engine turns it into the inline rule
    /// `<Rule>_<name>`.
    Case { name: String, body: Box<PExpr> },
}

impl PExpr {
    pub fn apply(name: impl Into<String>) -> Self {
        PExpr::Apply(name.into())
    }

    pub fn terminal(text: impl Into<String>) -> Self {
        PExpr::Terminal(text.into())
    }

    pub fn case(name: impl Into<String>, body: PExpr) -> Self {
        PExpr::Case {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// Ordered choice, collapsing a single alternative to itself.
    pub fn alt(mut alternatives: Vec<PExpr>) -> Self {
        if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            PExpr::Alt(alternatives)
        }
    }

    /// Top-level alternatives of a rule body.
    pub fn alternatives(&self) -> &[PExpr] {
        match self {
            PExpr::Alt(alts) => alts,
            other => std::slice::from_ref(other),
        }
    }

    fn needs_parens_as_operand(&self) -> bool {
        matches!(self, PExpr::Seq(_) | PExpr::Alt(_) | PExpr::Case { .. })
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens_as_operand() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Writes `text` as a JSON string literal, which is also how rule text quotes
/// terminals.
pub fn quote_terminal(text: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(text).map_err(|_| fmt::Error)
}

impl fmt::Display for PExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PExpr::Apply(name) => f.write_str(name),
            PExpr::Terminal(text) => f.write_str(&quote_terminal(text)?),
            PExpr::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if matches!(item, PExpr::Alt(_) | PExpr::Case { .. }) {
                        write!(f, "({item})")?;
                    } else {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            PExpr::Alt(alts) => {
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if matches!(alt, PExpr::Alt(_) | PExpr::Case { .. }) {
                        write!(f, "({alt})")?;
                    } else {
                        write!(f, "{alt}")?;
                    }
                }
                Ok(())
            }
            PExpr::Star(inner) => {
                inner.fmt_operand(f)?;
                f.write_str("*")
            }
            PExpr::Plus(inner) => {
                inner.fmt_operand(f)?;
                f.write_str("+")
            }
            PExpr::Opt(inner) => {
                inner.fmt_operand(f)?;
                f.write_str("?")
            }
            PExpr::Case { name, body } => write!(f, "{body}  -- {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub name: String,
    pub op: RuleOp,
    pub body: PExpr,
}

impl RuleDef {
    pub fn define(name: impl Into<String>, body: PExpr) -> Self {
        Self {
            name: name.into(),
            op: RuleOp::Define,
            body,
        }
    }

    pub fn extend(name: impl Into<String>, body: PExpr) -> Self {
        Self {
            name: name.into(),
            op: RuleOp::Extend,
            body,
        }
    }

    /// Syntactic rules skip whitespace between their terms.
    pub fn is_syntactic(&self) -> bool {
        is_syntactic_name(&self.name)
    }
}

/// Rule names starting with an uppercase letter are syntactic.
pub fn is_syntactic_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Name of the inline rule a `-- case` alternative of `rule` becomes.
pub fn case_rule_name(rule: &str, case: &str) -> String {
    format!("{rule}_{case}")
}

impl fmt::Display for RuleDef {
    /// One alternative per line; top-level case alternatives keep their
    /// `-- name` suffix unparenthesized.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.name)?;
        for (i, alt) in self.body.alternatives().iter().enumerate() {
            let lead = if i == 0 { self.op.as_str() } else { "|" };
            writeln!(f, "    {lead} {alt}")?;
        }
        Ok(())
    }
}

/// A named set of rules. The first rule is the default start rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarDef {
    pub name: String,
    pub rules: Vec<RuleDef>,
}

impl GrammarDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&RuleDef> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn start_rule(&self) -> Option<&RuleDef> {
        self.rules.first()
    }
}

impl fmt::Display for GrammarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.name)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{rule}")?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_rule_text() {
        let mut grammar = GrammarDef::new("G");
        grammar.rules.push(RuleDef::define(
            "Sum",
            PExpr::Alt(vec![
                PExpr::case(
                    "left",
                    PExpr::Seq(vec![
                        PExpr::apply("Sum"),
                        PExpr::Alt(vec![PExpr::terminal("+"), PExpr::terminal("-")]),
                        PExpr::apply("num"),
                    ]),
                ),
                PExpr::apply("num"),
            ]),
        ));
        grammar.rules.push(RuleDef::define(
            "num",
            PExpr::Plus(Box::new(PExpr::apply("digit"))),
        ));
        grammar.rules.push(RuleDef::extend(
            "space",
            PExpr::Alt(vec![PExpr::terminal("\t"), PExpr::terminal("\"")]),
        ));

        let expected = "G {\n  Sum\n    = Sum (\"+\" | \"-\") num  -- left\n    | num\n\n  num\n    = digit+\n\n  space\n    += \"\\t\"\n    | \"\\\"\"\n}\n";
        assert_eq!(grammar.to_string(), expected);
    }

    #[test]
    fn parenthesizes_compound_operands() {
        let expr = PExpr::Star(Box::new(PExpr::Alt(vec![
            PExpr::apply("letter"),
            PExpr::apply("digit"),
        ])));
        assert_eq!(expr.to_string(), "(letter | digit)*");
        let seq = PExpr::Opt(Box::new(PExpr::Seq(vec![
            PExpr::terminal("a"),
            PExpr::terminal("b"),
        ])));
        assert_eq!(seq.to_string(), "(\"a\" \"b\")?");
    }

    #[test]
    fn alt_collapses_single_alternative() {
        assert_eq!(PExpr::alt(vec![PExpr::apply("x")]), PExpr::apply("x"));
        assert_eq!(PExpr::apply("x").alternatives().len(), 1);
    }

    #[test]
    fn syntactic_names() {
        assert!(is_syntactic_name("Exp1"));
        assert!(!is_syntactic_name("number"));
        assert!(!is_syntactic_name(""));
    }
}
