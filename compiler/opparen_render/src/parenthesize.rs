//! Bottom-up rendering of a [`ParseNode`] tree with every binary application
//! wrapped in its own parentheses.

use opparen_ast::{
    AtomKind, BinaryNode, ParseNode, PassthroughNode, VisitError, VisitResult, Visitor,
};

use crate::error::RenderError;

/// Renders parse trees, refusing to nest deeper than `max_depth` groups,
/// binary nodes and sequences. Pass-through levels are not counted.
#[derive(Debug, Clone)]
pub struct Parenthesizer {
    max_depth: usize,
    depth: usize,
}

impl Parenthesizer {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            depth: 0,
        }
    }

    pub fn render(&mut self, node: &ParseNode) -> Result<String, RenderError> {
        self.depth = 0;
        Ok(node.accept(self)?)
    }

    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> VisitResult<T>) -> VisitResult<T> {
        if self.depth >= self.max_depth {
            return Err(VisitError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl Visitor for Parenthesizer {
    type Output = String;

    fn visit_binary(&mut self, node: &BinaryNode) -> VisitResult<String> {
        self.descend(|this| {
            let left = node.left.accept(this)?;
            let right = node.right.accept(this)?;
            Ok(format!("({left} {} {right})", node.symbol))
        })
    }

    fn visit_group(&mut self, inner: &ParseNode) -> VisitResult<String> {
        self.descend(|this| Ok(format!("({})", inner.accept(this)?)))
    }

    fn visit_atom(&mut self, _kind: AtomKind, text: &str) -> VisitResult<String> {
        Ok(text.to_string())
    }

    fn visit_passthrough(&mut self, node: &PassthroughNode) -> VisitResult<String> {
        node.child.accept(self)
    }

    fn visit_sequence(&mut self, children: &[ParseNode]) -> VisitResult<String> {
        self.descend(|this| {
            children
                .iter()
                .map(|child| child.accept(this))
                .collect::<VisitResult<Vec<_>>>()
                .map(|parts| parts.concat())
        })
    }
}

/// Renders `node` with a fresh [`Parenthesizer`].
pub fn parenthesize(node: &ParseNode, max_depth: usize) -> Result<String, RenderError> {
    Parenthesizer::new(max_depth).render(node)
}
