//! Operator descriptors and the operator table snapshot.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grouping direction for a chain of same-precedence operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Associativity {
    /// The leftmost pair binds first: `a - b - c` is `(a - b) - c`.
    #[default]
    Left,
    /// The rightmost pair binds first: `a ^ b ^ c` is `a ^ (b ^ c)`.
    Right,
}

impl Associativity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Associativity::Left => "left",
            Associativity::Right => "right",
        }
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Associativity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Associativity::Left),
            "right" | "r" => Ok(Associativity::Right),
            other => Err(format!(
                "unknown associativity '{other}' (expected 'left' or 'right')"
            )),
        }
    }
}

/// A binary infix operator.
///
/// Higher `precedence` binds tighter. Precedence is expected to be at least 1;
/// that is checked by [`crate::validate::validate_table`], not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operator {
    pub symbol: String,
    pub precedence: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub associativity: Associativity,
}

impl Operator {
    pub fn new(symbol: impl Into<String>, precedence: u32, associativity: Associativity) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity,
        }
    }

    pub fn left(symbol: impl Into<String>, precedence: u32) -> Self {
        Self::new(symbol, precedence, Associativity::Left)
    }

    pub fn right(symbol: impl Into<String>, precedence: u32) -> Self {
        Self::new(symbol, precedence, Associativity::Right)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.symbol, self.precedence, self.associativity)
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Parses `SYMBOL:PRECEDENCE[:ASSOC]`. The symbol may itself contain `:`,
    /// so the fields are split from the right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.rsplitn(3, ':').collect();
        let (symbol, precedence, associativity) = match parts.as_slice() {
            [last, prec, symbol] if last.parse::<u32>().is_err() => {
                (*symbol, *prec, last.parse::<Associativity>()?)
            }
            [prec, symbol] => (*symbol, *prec, Associativity::Left),
            [prec, rest, head] => (
                // "a:b:3" - the last field is a number, so the symbol is "a:b"
                &s[..head.len() + 1 + rest.len()],
                *prec,
                Associativity::Left,
            ),
            _ => {
                return Err(format!(
                    "invalid operator '{s}' (expected SYMBOL:PRECEDENCE[:left|right])"
                ))
            }
        };
        let precedence = precedence
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid precedence '{precedence}' in '{s}': {e}"))?;
        Ok(Operator::new(symbol, precedence, associativity))
    }
}

/// An ordered snapshot of operator descriptors.
///
/// Order only matters for the order in which same-level symbols are offered
/// to the matcher; level assignment is order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OperatorTable {
    operators: Vec<Operator>,
}

impl OperatorTable {
    pub fn new(operators: Vec<Operator>) -> Self {
        Self { operators }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operator: Operator) {
        self.operators.push(operator);
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operator> {
        self.operators.iter()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// The loosest-to-tightest level count: the highest precedence present, or 0.
    pub fn max_precedence(&self) -> u32 {
        self.operators
            .iter()
            .map(|op| op.precedence)
            .max()
            .unwrap_or(0)
    }

    /// Operators at exactly `precedence`, in table order.
    pub fn at_precedence(&self, precedence: u32) -> impl Iterator<Item = &Operator> {
        self.operators
            .iter()
            .filter(move |op| op.precedence == precedence)
    }
}

impl From<Vec<Operator>> for OperatorTable {
    fn from(operators: Vec<Operator>) -> Self {
        Self::new(operators)
    }
}

impl FromIterator<Operator> for OperatorTable {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OperatorTable {
    type Item = &'a Operator;
    type IntoIter = std::slice::Iter<'a, Operator>;

    fn into_iter(self) -> Self::IntoIter {
        self.operators.iter()
    }
}
