//! Shared data model for the opparen toolchain.
//!
//! This crate defines the operator table handed in by the caller, the tagged
//! parse tree produced for one parse+render call, the rule-set syntax tree the
//! grammar compiler emits, and the diagnostics type every phase reports with.

pub mod diagnostics;
pub mod grammar;
pub mod node;
pub mod operator;
pub mod span;
pub mod validate;
pub mod visit;

// Re-export commonly used types
pub use diagnostics::{render_snippet, Diagnostic, Severity};
pub use grammar::{GrammarDef, PExpr, RuleDef, RuleOp};
pub use node::{AtomKind, BinaryNode, ParseNode, PassthroughNode};
pub use operator::{Associativity, Operator, OperatorTable};
pub use span::{Location, Span};
pub use visit::{VisitError, VisitResult, Visitor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A result type for serialization helpers.
#[cfg(feature = "serde")]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Serializes a value (usually a [`ParseNode`] or an [`OperatorTable`]) to pretty JSON.
///
/// # Example
///
/// ```
/// use opparen_ast::{to_json, AtomKind, ParseNode};
///
/// let node = ParseNode::atom(AtomKind::Number, "42");
/// let json = to_json(&node).unwrap();
/// assert!(json.contains(r#""text": "42""#));
/// ```
#[cfg(feature = "serde")]
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserializes a value from a JSON string.
#[cfg(feature = "serde")]
pub fn from_json<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialization() -> Result<()> {
        let tree = ParseNode::binary(
            1,
            Associativity::Left,
            "+",
            ParseNode::number("1"),
            ParseNode::group(ParseNode::ident("x")),
        );
        let value: serde_json::Value = from_json(&to_json(&tree)?)?;
        assert_eq!(value["type"], "Binary");
        assert_eq!(value["symbol"], "+");
        assert_eq!(value["left"]["text"], "1");
        assert_eq!(value["right"]["type"], "Group");
        assert_eq!(value["right"]["inner"]["kind"], "identifier");

        let table = OperatorTable::new(vec![Operator::right("**", 3)]);
        let back: OperatorTable = from_json(&to_json(&table)?)?;
        assert_eq!(back, table);
        Ok(())
    }
}
