//! Resolved grammars.
//!
//! A [`Grammar`] is a [`GrammarDef`] with every rule name resolved to an index,
//! case alternatives split out into their own rules, `+=` extensions folded in
//! and the built-in rules added. It is immutable once built and can match any
//! number of inputs.

use std::collections::HashMap;
use std::rc::Rc;

use opparen_ast::grammar::{case_rule_name, is_syntactic_name, quote_terminal};
use opparen_ast::{GrammarDef, PExpr, RuleOp};

use crate::builtin::Builtin;
use crate::check::GrammarError;
use crate::failure::MatchFailure;
use crate::matcher::Matcher;
use crate::tree::MatchTree;

pub type RuleId = usize;

/// Default bound on input nesting while matching.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A literal plus the way failures describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub text: String,
    pub description: String,
}

/// A parsing expression with rule references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Apply(RuleId),
    Terminal(Terminal),
    Native(Builtin),
    Seq(Vec<Expr>),
    Alt(Vec<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
    Opt(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Builtin,
    Defined,
    /// An inline `-- name` alternative of another rule.
    Case,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: Rc<str>,
    pub kind: RuleKind,
    pub body: Expr,
    /// Syntactic rules skip `space` before each term.
    pub syntactic: bool,
}

impl Rule {
    /// Case rules are re-evaluated every time so that left-recursive growth of
    /// their parent sees its latest seed.
    pub fn memoized(&self) -> bool {
        self.kind != RuleKind::Case
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
    start: RuleId,
    space: RuleId,
    max_depth: usize,
}

impl Grammar {
    /// Parses and resolves rule text.
    pub fn from_source(source: &str) -> Result<Self, GrammarError> {
        let def = opparen_parser::parse_grammar(source).map_err(GrammarError::Syntax)?;
        Self::from_def(&def)
    }

    /// Resolves an already-parsed rule set. The first rule is the start rule.
    pub fn from_def(def: &GrammarDef) -> Result<Self, GrammarError> {
        let start_name = def
            .start_rule()
            .map(|r| r.name.clone())
            .ok_or_else(|| GrammarError::NoRules {
                grammar: def.name.clone(),
            })?;

        let mut builder = Builder::new(&def.name);
        builder.declare(def)?;
        builder.define(def)?;
        let grammar = builder.finish(&start_name)?;

        log::debug!(
            "resolved grammar '{}': {} rules, start rule '{}'",
            grammar.name,
            grammar.rules.len(),
            grammar.rules[grammar.start].name
        );
        Ok(grammar)
    }

    /// Sets the bound on input nesting: applications that start past the
    /// offset of their caller, such as a parenthesized operand.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn start_rule(&self) -> &Rule {
        &self.rules[self.start]
    }

    pub(crate) fn start_id(&self) -> RuleId {
        self.start
    }

    pub(crate) fn space_id(&self) -> RuleId {
        self.space
    }

    /// Matches the whole of `input` against the start rule.
    ///
    /// Leading and trailing whitespace is skipped when the start rule is
    /// syntactic. On failure the result reports the furthest position any
    /// terminal was tried at, and what was expected there.
    pub fn match_input<'i>(&self, input: &'i str) -> Result<MatchTree<'i>, MatchFailure> {
        Matcher::new(self, input).run()
    }
}

/// Accumulates rules while a [`GrammarDef`] is resolved.
struct Builder {
    grammar: String,
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
}

impl Builder {
    fn new(grammar: &str) -> Self {
        let mut builder = Self {
            grammar: grammar.to_string(),
            rules: Vec::new(),
            index: HashMap::new(),
        };
        for builtin in Builtin::ALL {
            builder.push(builtin.rule_name(), RuleKind::Builtin, Expr::Native(builtin));
        }
        builder
    }

    fn push(&mut self, name: &str, kind: RuleKind, body: Expr) -> RuleId {
        let id = self.rules.len();
        self.rules.push(Rule {
            name: Rc::from(name),
            kind,
            body,
            syntactic: is_syntactic_name(name),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    fn duplicate(&self, name: &str) -> GrammarError {
        GrammarError::DuplicateRule {
            name: name.to_string(),
            grammar: self.grammar.clone(),
        }
    }

    /// Registers every rule and case name so bodies can refer to rules
    /// defined further down.
    fn declare(&mut self, def: &GrammarDef) -> Result<(), GrammarError> {
        for rule in &def.rules {
            match rule.op {
                RuleOp::Define => {
                    if self.index.contains_key(&rule.name) {
                        return Err(self.duplicate(&rule.name));
                    }
                    self.push(&rule.name, RuleKind::Defined, Expr::Seq(Vec::new()));
                }
                RuleOp::Extend => {
                    if !def.rules.iter().any(|r| r.name == rule.name && r.op == RuleOp::Define)
                        && !self.index.contains_key(&rule.name)
                    {
                        return Err(GrammarError::ExtendUndeclared {
                            name: rule.name.clone(),
                            grammar: self.grammar.clone(),
                        });
                    }
                }
            }
            for alt in rule.body.alternatives() {
                if let PExpr::Case { name, .. } = alt {
                    let case_rule = case_rule_name(&rule.name, name);
                    if self.index.contains_key(&case_rule) {
                        return Err(self.duplicate(&case_rule));
                    }
                    let id = self.push(&case_rule, RuleKind::Case, Expr::Seq(Vec::new()));
                    // Case rules skip whitespace exactly when their parent does.
                    self.rules[id].syntactic = is_syntactic_name(&rule.name);
                }
            }
        }

        let mut extended = Vec::new();
        for rule in def.rules.iter().filter(|r| r.op == RuleOp::Extend) {
            if extended.contains(&rule.name.as_str()) {
                return Err(self.duplicate(&rule.name));
            }
            extended.push(rule.name.as_str());
        }
        Ok(())
    }

    /// Lowers definitions first, then folds extensions in front of them.
    fn define(&mut self, def: &GrammarDef) -> Result<(), GrammarError> {
        let defines = def.rules.iter().filter(|r| r.op == RuleOp::Define);
        let extends = def.rules.iter().filter(|r| r.op == RuleOp::Extend);
        for rule in defines.chain(extends) {
            let id = self.lookup(&rule.name, &rule.name)?;
            let syntactic = self.rules[id].syntactic;
            let mut alternatives = Vec::new();
            for alt in rule.body.alternatives() {
                match alt {
                    PExpr::Case { name, body } => {
                        let case_name = case_rule_name(&rule.name, name);
                        let case_id = self.lookup(&case_name, &rule.name)?;
                        let lowered = self.lower(body, &case_name, syntactic)?;
                        self.rules[case_id].body = lowered;
                        alternatives.push(Expr::Apply(case_id));
                    }
                    other => alternatives.push(self.lower(other, &rule.name, syntactic)?),
                }
            }
            let body = collapse_alt(alternatives);
            let rule_entry = &mut self.rules[id];
            rule_entry.body = match rule.op {
                RuleOp::Define => body,
                RuleOp::Extend => {
                    let previous = std::mem::replace(&mut rule_entry.body, Expr::Seq(Vec::new()));
                    Expr::Alt(vec![body, previous])
                }
            };
        }
        Ok(())
    }

    fn lookup(&self, name: &str, in_rule: &str) -> Result<RuleId, GrammarError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UndeclaredRule {
                name: name.to_string(),
                in_rule: in_rule.to_string(),
                grammar: self.grammar.clone(),
            })
    }

    fn lower(&self, expr: &PExpr, rule: &str, syntactic: bool) -> Result<Expr, GrammarError> {
        let lower_all = |items: &[PExpr]| -> Result<Vec<Expr>, GrammarError> {
            items
                .iter()
                .map(|item| self.lower(item, rule, syntactic))
                .collect()
        };
        Ok(match expr {
            PExpr::Apply(name) => {
                let id = self.lookup(name, rule)?;
                if !syntactic && self.rules[id].syntactic {
                    return Err(GrammarError::SyntacticInLexical {
                        name: name.clone(),
                        in_rule: rule.to_string(),
                    });
                }
                Expr::Apply(id)
            }
            PExpr::Terminal(text) => {
                if text.is_empty() {
                    return Err(GrammarError::EmptyTerminal {
                        rule: rule.to_string(),
                    });
                }
                let description = quote_terminal(text).unwrap_or_else(|_| format!("{text:?}"));
                Expr::Terminal(Terminal {
                    text: text.clone(),
                    description,
                })
            }
            PExpr::Seq(items) => Expr::Seq(lower_all(items)?),
            PExpr::Alt(items) => Expr::Alt(lower_all(items)?),
            PExpr::Star(inner) => Expr::Star(Box::new(self.lower(inner, rule, syntactic)?)),
            PExpr::Plus(inner) => Expr::Plus(Box::new(self.lower(inner, rule, syntactic)?)),
            PExpr::Opt(inner) => Expr::Opt(Box::new(self.lower(inner, rule, syntactic)?)),
            PExpr::Case { name, .. } => {
                return Err(GrammarError::MisplacedCase {
                    case: name.clone(),
                    rule: rule.to_string(),
                })
            }
        })
    }

    fn finish(self, start_name: &str) -> Result<Grammar, GrammarError> {
        let start = self.lookup(start_name, start_name)?;
        let space = self.lookup(Builtin::Space.rule_name(), start_name)?;
        Ok(Grammar {
            name: self.grammar,
            rules: self.rules,
            index: self.index,
            start,
            space,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }
}

fn collapse_alt(mut alternatives: Vec<Expr>) -> Expr {
    if alternatives.len() == 1 {
        alternatives.remove(0)
    } else {
        Expr::Alt(alternatives)
    }
}
