//! The tagged parse tree produced for a single parse+render call.
//!
//! Nodes are built by the parser adapter straight from the matcher's output
//! and consumed by the parenthesizer; nothing keeps them around afterwards.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::operator::Associativity;

/// What kind of leaf an [`ParseNode::Atom`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AtomKind {
    Number,
    Identifier,
    /// A raw token with no rule of its own, e.g. a single repeated character.
    Token,
}

/// One binary application at a given precedence level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BinaryNode {
    pub level: u32,
    pub associativity: Associativity,
    pub symbol: String,
    pub left: ParseNode,
    pub right: ParseNode,
}

/// A level that was passed through via its fallback alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassthroughNode {
    pub level: u32,
    pub child: ParseNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum ParseNode {
    Binary(Box<BinaryNode>),
    Group {
        inner: Box<ParseNode>,
    },
    Atom {
        kind: AtomKind,
        text: String,
    },
    Passthrough(Box<PassthroughNode>),
    /// A run of tokens rendered back to back, lowered from a repetition.
    /// Compiled tables only repeat inside `number` and `ident`, which lower
    /// to atoms, so this comes from hand-written rule text.
    Sequence {
        children: Vec<ParseNode>,
    },
}

impl ParseNode {
    pub fn atom(kind: AtomKind, text: impl Into<String>) -> Self {
        ParseNode::Atom {
            kind,
            text: text.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::atom(AtomKind::Number, text)
    }

    pub fn ident(text: impl Into<String>) -> Self {
        Self::atom(AtomKind::Identifier, text)
    }

    pub fn group(inner: ParseNode) -> Self {
        ParseNode::Group {
            inner: Box::new(inner),
        }
    }

    pub fn binary(
        level: u32,
        associativity: Associativity,
        symbol: impl Into<String>,
        left: ParseNode,
        right: ParseNode,
    ) -> Self {
        ParseNode::Binary(Box::new(BinaryNode {
            level,
            associativity,
            symbol: symbol.into(),
            left,
            right,
        }))
    }

    pub fn passthrough(level: u32, child: ParseNode) -> Self {
        ParseNode::Passthrough(Box::new(PassthroughNode { level, child }))
    }

    pub fn sequence(children: Vec<ParseNode>) -> Self {
        ParseNode::Sequence { children }
    }

    /// Strips any number of pass-through wrappers.
    pub fn unwrap_passthrough(&self) -> &ParseNode {
        let mut node = self;
        while let ParseNode::Passthrough(p) = node {
            node = &p.child;
        }
        node
    }

    /// Number of binary applications in this tree.
    pub fn binary_count(&self) -> usize {
        match self {
            ParseNode::Binary(b) => 1 + b.left.binary_count() + b.right.binary_count(),
            ParseNode::Group { inner } => inner.binary_count(),
            ParseNode::Atom { .. } => 0,
            ParseNode::Passthrough(p) => p.child.binary_count(),
            ParseNode::Sequence { children } => children.iter().map(Self::binary_count).sum(),
        }
    }

    /// Deepest chain of non-leaf nodes, counting this one.
    pub fn depth(&self) -> usize {
        match self {
            ParseNode::Binary(b) => 1 + b.left.depth().max(b.right.depth()),
            ParseNode::Group { inner } => 1 + inner.depth(),
            ParseNode::Atom { .. } => 1,
            ParseNode::Passthrough(p) => 1 + p.child.depth(),
            ParseNode::Sequence { children } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_and_depth() {
        // (1 + (2 * 3)) behind two pass-through levels
        let tree = ParseNode::binary(
            1,
            Associativity::Left,
            "+",
            ParseNode::passthrough(2, ParseNode::number("1")),
            ParseNode::binary(
                2,
                Associativity::Left,
                "*",
                ParseNode::number("2"),
                ParseNode::number("3"),
            ),
        );
        assert_eq!(tree.binary_count(), 2);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn unwrap_passthrough_strips_all_levels() {
        let tree = ParseNode::passthrough(1, ParseNode::passthrough(2, ParseNode::ident("x")));
        assert_eq!(tree.unwrap_passthrough(), &ParseNode::ident("x"));
        let group = ParseNode::group(ParseNode::number("1"));
        assert_eq!(group.unwrap_passthrough(), &group);
    }
}
