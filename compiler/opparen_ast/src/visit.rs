//! Visitor pattern for walking a [`ParseNode`] tree.
//!
//! Each node kind has its own `visit_*` method; [`ParseNode::accept`] picks the
//! right one. Visitors decide themselves whether and when to recurse into
//! children, which is what lets a renderer work bottom-up.

use crate::node::{AtomKind, BinaryNode, ParseNode, PassthroughNode};

/// The result type for visitor operations.
pub type VisitResult<T> = Result<T, VisitError>;

/// An error that can occur during tree traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitError {
    /// An error with a custom message.
    #[error("{0}")]
    Custom(String),

    /// Traversal went deeper than the configured bound.
    #[error("expression nests deeper than the limit of {limit}")]
    TooDeep { limit: usize },
}

impl VisitError {
    /// Creates a new custom error with the given message.
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        VisitError::Custom(msg.into())
    }
}

/// A visitor over parse nodes.
pub trait Visitor {
    type Output;

    fn visit_binary(&mut self, node: &BinaryNode) -> VisitResult<Self::Output>;

    fn visit_group(&mut self, inner: &ParseNode) -> VisitResult<Self::Output>;

    fn visit_atom(&mut self, kind: AtomKind, text: &str) -> VisitResult<Self::Output>;

    fn visit_passthrough(&mut self, node: &PassthroughNode) -> VisitResult<Self::Output>;

    fn visit_sequence(&mut self, children: &[ParseNode]) -> VisitResult<Self::Output>;
}

impl ParseNode {
    /// Accepts a visitor and calls the method matching this node's kind.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        match self {
            ParseNode::Binary(node) => visitor.visit_binary(node),
            ParseNode::Group { inner } => visitor.visit_group(inner),
            ParseNode::Atom { kind, text } => visitor.visit_atom(*kind, text),
            ParseNode::Passthrough(node) => visitor.visit_passthrough(node),
            ParseNode::Sequence { children } => visitor.visit_sequence(children),
        }
    }
}
