//! Concrete match trees.
//!
//! Alternation is transparent: a rule node's children are the nodes of the
//! alternative that matched. Every `*`, `+` or `?` yields exactly one
//! [`MatchNode::Iter`] holding the nodes of each repetition in order.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchNode {
    /// A successful rule application.
    Rule {
        name: Rc<str>,
        span: Range<usize>,
        children: Vec<Rc<MatchNode>>,
    },
    /// A literal or a built-in character match.
    Terminal { span: Range<usize> },
    /// The repetitions of one `*`, `+` or `?`.
    Iter {
        span: Range<usize>,
        children: Vec<Rc<MatchNode>>,
    },
}

impl MatchNode {
    pub fn span(&self) -> Range<usize> {
        match self {
            MatchNode::Rule { span, .. }
            | MatchNode::Terminal { span }
            | MatchNode::Iter { span, .. } => span.clone(),
        }
    }

    pub fn children(&self) -> &[Rc<MatchNode>] {
        match self {
            MatchNode::Rule { children, .. } | MatchNode::Iter { children, .. } => children,
            MatchNode::Terminal { .. } => &[],
        }
    }

    /// Name of the applied rule, for rule nodes.
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            MatchNode::Rule { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchNode::Terminal { .. })
    }

    pub fn is_iter(&self) -> bool {
        matches!(self, MatchNode::Iter { .. })
    }

    /// The matched text, given the input the tree was built from.
    pub fn source<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.span()).unwrap_or_default()
    }
}

/// The result of a successful match: the root node plus the input it covers.
#[derive(Debug, Clone)]
pub struct MatchTree<'i> {
    input: &'i str,
    root: Rc<MatchNode>,
}

impl<'i> MatchTree<'i> {
    pub(crate) fn new(input: &'i str, root: Rc<MatchNode>) -> Self {
        Self { input, root }
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    pub fn root(&self) -> &MatchNode {
        &self.root
    }

    /// Text matched by `node`, which must belong to this tree.
    pub fn text(&self, node: &MatchNode) -> &'i str {
        node.source(self.input)
    }

    /// An indented outline of rule names and matched text, for debugging.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&self.root, 0, &mut out);
        out
    }

    fn write_outline(&self, node: &MatchNode, indent: usize, out: &mut String) {
        let label = match node {
            MatchNode::Rule { name, .. } => name.to_string(),
            MatchNode::Terminal { .. } => "_terminal".to_string(),
            MatchNode::Iter { .. } => "_iter".to_string(),
        };
        out.push_str(&format!(
            "{}{} {:?}\n",
            "  ".repeat(indent),
            label,
            self.text(node)
        ));
        for child in node.children() {
            self.write_outline(child, indent + 1, out);
        }
    }
}

impl fmt::Display for MatchTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outline())
    }
}
