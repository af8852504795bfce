use opparen_ast::{Associativity, OperatorTable};

/// The operators sharing one precedence, split by associativity.
///
/// Every precedence from 1 up to the table maximum gets a level, including
/// ones no operator uses; those are plain pass-throughs to the next level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceLevel {
    pub precedence: u32,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl PrecedenceLevel {
    fn new(precedence: u32) -> Self {
        Self {
            precedence,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn symbols(&self, associativity: Associativity) -> &[String] {
        match associativity {
            Associativity::Left => &self.left,
            Associativity::Right => &self.right,
        }
    }

    pub fn rule_name(&self) -> String {
        level_rule_name(self.precedence)
    }
}

pub fn level_rule_name(precedence: u32) -> String {
    format!("Exp{precedence}")
}

/// Splits a table into levels, loosest (1) first.
///
/// Within a group, symbols are ordered longest first so that a symbol that is
/// a prefix of another (`*` and `**`) is tried after it; symbols of equal
/// length keep table order. A symbol listed twice in the same group appears
/// once. Operators with precedence 0 are dropped.
pub fn build_levels(table: &OperatorTable) -> Vec<PrecedenceLevel> {
    let max = table.max_precedence();
    let mut levels: Vec<PrecedenceLevel> = (1..=max).map(PrecedenceLevel::new).collect();

    for op in table.iter().filter(|op| op.precedence > 0) {
        let level = &mut levels[(op.precedence - 1) as usize];
        let group = match op.associativity {
            Associativity::Left => &mut level.left,
            Associativity::Right => &mut level.right,
        };
        if !group.contains(&op.symbol) {
            group.push(op.symbol.clone());
        }
    }

    for level in &mut levels {
        level.left.sort_by_key(|s| std::cmp::Reverse(s.len()));
        level.right.sort_by_key(|s| std::cmp::Reverse(s.len()));
    }
    levels
}
