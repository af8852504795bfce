//! Operator table to rule set.
//!
//! For a table whose highest precedence is `n` the generated grammar is
//!
//! ```text
//! Exp  = Exp1
//! Expp = Expp (ops) Exp(p+1)  -- left      for p in 1..=n, where
//!      | Exp(p+1) (ops) Expp  -- right     Exp(n+1) means Primary
//!      | Exp(p+1)
//! Primary  = number | ident | ParenExp
//! ParenExp = "(" Exp ")"
//! number   = digit+
//! ident    = letter (letter | digit)*
//! space   += " " | "\t" | "\n"
//! ```
//!
//! The left and right alternatives only appear when the level has operators
//! of that associativity. An empty table compiles to `Exp = Primary`.

use opparen_ast::grammar::case_rule_name;
use opparen_ast::{Associativity, GrammarDef, OperatorTable, PExpr, RuleDef};

use crate::bindings::{RuleBindings, RuleRole};
use crate::levels::{build_levels, level_rule_name, PrecedenceLevel};

pub const GRAMMAR_NAME: &str = "OperatorGrammar";
pub const TOP_RULE: &str = "Exp";
pub const PRIMARY_RULE: &str = "Primary";
pub const GROUP_RULE: &str = "ParenExp";
pub const NUMBER_RULE: &str = "number";
pub const IDENT_RULE: &str = "ident";

const LEFT_CASE: &str = "left";
const RIGHT_CASE: &str = "right";

/// The output of [`compile`]: a rule set, its text and the bindings that
/// describe it. The three always come from the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGrammar {
    definition: GrammarDef,
    text: String,
    bindings: RuleBindings,
    levels: Vec<PrecedenceLevel>,
}

impl CompiledGrammar {
    pub fn definition(&self) -> &GrammarDef {
        &self.definition
    }

    /// The rule text handed to the matching engine.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bindings(&self) -> &RuleBindings {
        &self.bindings
    }

    pub fn levels(&self) -> &[PrecedenceLevel] {
        &self.levels
    }

    pub fn max_precedence(&self) -> u32 {
        self.levels.len() as u32
    }
}

/// Compiles an operator table into a precedence-climbing grammar.
///
/// The result depends only on the table, so compiling the same table twice
/// yields byte-identical text. The table is not validated here; a precedence
/// of 0 is ignored and an empty symbol produces rule text the engine rejects.
pub fn compile(table: &OperatorTable) -> CompiledGrammar {
    let levels = build_levels(table);
    let mut bindings = RuleBindings::default();
    let mut definition = GrammarDef::new(GRAMMAR_NAME);

    let first = levels
        .first()
        .map_or_else(|| PRIMARY_RULE.to_string(), PrecedenceLevel::rule_name);
    definition
        .rules
        .push(RuleDef::define(TOP_RULE, PExpr::apply(first)));
    bindings.bind(TOP_RULE, RuleRole::Top);

    for level in &levels {
        definition
            .rules
            .push(level_rule(level, levels.len() as u32, &mut bindings));
    }

    definition.rules.extend(atom_rules());
    bindings.bind(PRIMARY_RULE, RuleRole::Primary);
    bindings.bind(GROUP_RULE, RuleRole::Group);
    bindings.bind(NUMBER_RULE, RuleRole::Number);
    bindings.bind(IDENT_RULE, RuleRole::Identifier);

    let text = definition.to_string();
    log::debug!(
        "compiled {} operators into {} levels ({} rules)",
        table.len(),
        levels.len(),
        definition.rules.len()
    );
    log::trace!("generated rule text:\n{text}");

    CompiledGrammar {
        definition,
        text,
        bindings,
        levels,
    }
}

fn level_rule(level: &PrecedenceLevel, max: u32, bindings: &mut RuleBindings) -> RuleDef {
    let p = level.precedence;
    let name = level.rule_name();
    let inner = if p < max {
        level_rule_name(p + 1)
    } else {
        PRIMARY_RULE.to_string()
    };
    bindings.bind(name.clone(), RuleRole::Level(p));

    let mut alternatives = Vec::new();
    if !level.left.is_empty() {
        alternatives.push(PExpr::case(
            LEFT_CASE,
            PExpr::Seq(vec![
                PExpr::apply(name.clone()),
                symbol_choice(&level.left),
                PExpr::apply(inner.clone()),
            ]),
        ));
        bindings.bind(case_rule_name(&name, LEFT_CASE), RuleRole::LeftChain(p));
        bindings.bind_symbols(p, Associativity::Left, &level.left);
    }
    if !level.right.is_empty() {
        alternatives.push(PExpr::case(
            RIGHT_CASE,
            PExpr::Seq(vec![
                PExpr::apply(inner.clone()),
                symbol_choice(&level.right),
                PExpr::apply(name.clone()),
            ]),
        ));
        bindings.bind(case_rule_name(&name, RIGHT_CASE), RuleRole::RightChain(p));
        bindings.bind_symbols(p, Associativity::Right, &level.right);
    }
    alternatives.push(PExpr::apply(inner));

    RuleDef::define(name, PExpr::alt(alternatives))
}

fn symbol_choice(symbols: &[String]) -> PExpr {
    PExpr::alt(symbols.iter().map(PExpr::terminal).collect())
}

fn atom_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::define(
            PRIMARY_RULE,
            PExpr::Alt(vec![
                PExpr::apply(NUMBER_RULE),
                PExpr::apply(IDENT_RULE),
                PExpr::apply(GROUP_RULE),
            ]),
        ),
        RuleDef::define(
            GROUP_RULE,
            PExpr::Seq(vec![
                PExpr::terminal("("),
                PExpr::apply(TOP_RULE),
                PExpr::terminal(")"),
            ]),
        ),
        RuleDef::define(NUMBER_RULE, PExpr::Plus(Box::new(PExpr::apply("digit")))),
        RuleDef::define(
            IDENT_RULE,
            PExpr::Seq(vec![
                PExpr::apply("letter"),
                PExpr::Star(Box::new(PExpr::Alt(vec![
                    PExpr::apply("letter"),
                    PExpr::apply("digit"),
                ]))),
            ]),
        ),
        RuleDef::extend(
            "space",
            PExpr::Alt(vec![
                PExpr::terminal(" "),
                PExpr::terminal("\t"),
                PExpr::terminal("\n"),
            ]),
        ),
    ]
}
