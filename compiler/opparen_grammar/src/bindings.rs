//! What each generated rule means.
//!
//! Rendering never looks at rule names directly: the compiler records the role
//! of every rule it emits here, and the adapter that lowers match trees asks
//! these bindings instead. A binding set belongs to exactly one compiled
//! grammar.

use std::collections::BTreeMap;

use opparen_ast::Associativity;

/// The part a generated rule plays in the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleRole {
    /// The start rule.
    Top,
    /// A precedence level rule; matched through its fallback it is a
    /// pass-through.
    Level(u32),
    /// The left-associative alternative of a level.
    LeftChain(u32),
    /// The right-associative alternative of a level.
    RightChain(u32),
    Primary,
    /// A parenthesized sub-expression.
    Group,
    Number,
    Identifier,
}

impl RuleRole {
    /// Level and associativity of a chain role.
    pub fn chain(&self) -> Option<(u32, Associativity)> {
        match *self {
            RuleRole::LeftChain(p) => Some((p, Associativity::Left)),
            RuleRole::RightChain(p) => Some((p, Associativity::Right)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBindings {
    roles: BTreeMap<String, RuleRole>,
    symbols: BTreeMap<(u32, Associativity), Vec<String>>,
}

impl RuleBindings {
    pub(crate) fn bind(&mut self, rule: impl Into<String>, role: RuleRole) {
        self.roles.insert(rule.into(), role);
    }

    pub(crate) fn bind_symbols(&mut self, level: u32, associativity: Associativity, symbols: &[String]) {
        self.symbols
            .insert((level, associativity), symbols.to_vec());
    }

    pub fn role(&self, rule: &str) -> Option<RuleRole> {
        self.roles.get(rule).copied()
    }

    /// Symbols bound at a level for one associativity, in the order the
    /// grammar tries them.
    pub fn symbols(&self, level: u32, associativity: Associativity) -> &[String] {
        self.symbols
            .get(&(level, associativity))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when `symbol` is one of the operators of the given chain.
    pub fn binds(&self, level: u32, associativity: Associativity, symbol: &str) -> bool {
        self.symbols(level, associativity).iter().any(|s| s == symbol)
    }

    /// All bound rules, sorted by name.
    pub fn rules(&self) -> impl Iterator<Item = (&str, RuleRole)> {
        self.roles.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
