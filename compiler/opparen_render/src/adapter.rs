//! Parser adapter: runs the engine against a compiled grammar and lowers the
//! concrete match tree into a [`ParseNode`] tree.
//!
//! Lowering is driven entirely by the [`RuleBindings`] of the compiled grammar.
//! A rule without a binding is a [`RenderError::UnknownRule`], never a guess.

use std::rc::Rc;

use opparen_ast::{Associativity, AtomKind, ParseNode};
use opparen_engine::{Grammar, GrammarError, MatchNode, MatchTree};
use opparen_grammar::{CompiledGrammar, RuleBindings, RuleRole};

use crate::error::{PipelineError, RenderError};

/// One compiled grammar together with the engine grammar built from its text.
#[derive(Debug, Clone)]
pub struct ParserAdapter {
    compiled: CompiledGrammar,
    grammar: Grammar,
}

impl ParserAdapter {
    /// Hands the rule text to the engine. `max_depth` bounds input nesting
    /// during both matching and lowering.
    pub fn new(compiled: CompiledGrammar, max_depth: usize) -> Result<Self, GrammarError> {
        let grammar = Grammar::from_source(compiled.text())?.with_max_depth(max_depth);
        log::debug!(
            "engine accepted '{}' with {} precedence levels",
            grammar.name(),
            compiled.max_precedence()
        );
        Ok(Self { compiled, grammar })
    }

    pub fn compiled(&self) -> &CompiledGrammar {
        &self.compiled
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn max_depth(&self) -> usize {
        self.grammar.max_depth()
    }

    /// Matches `input` and lowers the result.
    pub fn parse(&self, input: &str) -> Result<ParseNode, PipelineError> {
        let tree = self.grammar.match_input(input)?;
        log::trace!("match tree:\n{}", tree.outline());
        let node = lower(&tree, self.compiled.bindings(), self.max_depth())?;
        log::debug!("lowered {} binary applications", node.binary_count());
        Ok(node)
    }
}

/// Lowers a match tree using `bindings`. Nesting of emitted groups, binary
/// nodes and sequences is bounded by `max_depth`; pass-through levels are free.
pub fn lower(
    tree: &MatchTree<'_>,
    bindings: &RuleBindings,
    max_depth: usize,
) -> Result<ParseNode, RenderError> {
    Lowering {
        tree,
        bindings,
        max_depth,
        depth: 0,
    }
    .lower(tree.root())
}

struct Lowering<'a, 't> {
    tree: &'a MatchTree<'t>,
    bindings: &'a RuleBindings,
    max_depth: usize,
    depth: usize,
}

impl Lowering<'_, '_> {
    fn lower(&mut self, node: &MatchNode) -> Result<ParseNode, RenderError> {
        match node {
            MatchNode::Terminal { .. } => {
                Ok(ParseNode::atom(AtomKind::Token, self.tree.text(node)))
            }
            MatchNode::Iter { children, .. } => self.nested(|this| {
                children
                    .iter()
                    .map(|child| this.lower(child))
                    .collect::<Result<Vec<_>, _>>()
                    .map(ParseNode::sequence)
            }),
            MatchNode::Rule { name, children, .. } => {
                let role = self
                    .bindings
                    .role(name)
                    .ok_or_else(|| RenderError::UnknownRule {
                        rule: name.to_string(),
                    })?;
                self.lower_rule(name, role, node, children)
            }
        }
    }

    fn lower_rule(
        &mut self,
        name: &str,
        role: RuleRole,
        node: &MatchNode,
        children: &[Rc<MatchNode>],
    ) -> Result<ParseNode, RenderError> {
        match role {
            RuleRole::Top | RuleRole::Primary => self.lower(single_child(name, children)?),
            RuleRole::Level(level) => {
                let child = single_child(name, children)?;
                if self.is_chain(child) {
                    self.lower(child)
                } else {
                    Ok(ParseNode::passthrough(level, self.lower(child)?))
                }
            }
            RuleRole::LeftChain(level) => {
                self.lower_chain(name, level, Associativity::Left, children)
            }
            RuleRole::RightChain(level) => {
                self.lower_chain(name, level, Associativity::Right, children)
            }
            RuleRole::Group => {
                let [open, inner, close] = three_children(name, children)?;
                if !open.is_terminal() || !close.is_terminal() {
                    return Err(RenderError::shape(name, "group is not delimited by terminals"));
                }
                self.nested(|this| Ok(ParseNode::group(this.lower(inner)?)))
            }
            RuleRole::Number => Ok(ParseNode::number(self.tree.text(node))),
            RuleRole::Identifier => Ok(ParseNode::ident(self.tree.text(node))),
        }
    }

    fn lower_chain(
        &mut self,
        name: &str,
        level: u32,
        associativity: Associativity,
        children: &[Rc<MatchNode>],
    ) -> Result<ParseNode, RenderError> {
        let [left, operator, right] = three_children(name, children)?;
        if !operator.is_terminal() {
            return Err(RenderError::shape(name, "operator is not a terminal"));
        }
        let symbol = self.tree.text(operator);
        if !self.bindings.binds(level, associativity, symbol) {
            return Err(RenderError::UnboundSymbol {
                symbol: symbol.to_string(),
                level,
                associativity,
            });
        }
        self.nested(|this| {
            let left = this.lower(left)?;
            let right = this.lower(right)?;
            Ok(ParseNode::binary(level, associativity, symbol, left, right))
        })
    }

    fn is_chain(&self, node: &MatchNode) -> bool {
        node.rule_name()
            .and_then(|name| self.bindings.role(name))
            .is_some_and(|role| role.chain().is_some())
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        if self.depth >= self.max_depth {
            return Err(RenderError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

fn single_child<'n>(
    rule: &str,
    children: &'n [Rc<MatchNode>],
) -> Result<&'n MatchNode, RenderError> {
    match children {
        [only] => Ok(&**only),
        _ => Err(RenderError::shape(
            rule,
            format!("expected 1 child, found {}", children.len()),
        )),
    }
}

fn three_children<'n>(
    rule: &str,
    children: &'n [Rc<MatchNode>],
) -> Result<[&'n MatchNode; 3], RenderError> {
    match children {
        [a, b, c] => Ok([&**a, &**b, &**c]),
        _ => Err(RenderError::shape(
            rule,
            format!("expected 3 children, found {}", children.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opparen_ast::{Operator, OperatorTable};
    use opparen_engine::DEFAULT_MAX_DEPTH;
    use opparen_grammar::compile;
    use pretty_assertions::assert_eq;

    fn adapter(table: Vec<Operator>) -> ParserAdapter {
        ParserAdapter::new(compile(&OperatorTable::new(table)), DEFAULT_MAX_DEPTH).unwrap()
    }

    #[test]
    fn levels_without_a_chain_are_passthroughs() {
        let adapter = adapter(vec![Operator::left("+", 1), Operator::left("*", 2)]);
        let node = adapter.parse("7").unwrap();
        assert_eq!(
            node,
            ParseNode::passthrough(1, ParseNode::passthrough(2, ParseNode::number("7")))
        );
    }

    #[test]
    fn chains_become_binary_nodes() {
        let adapter = adapter(vec![Operator::left("+", 1), Operator::left("*", 2)]);
        let node = adapter.parse("a + 2 * b").unwrap();
        assert_eq!(
            node,
            ParseNode::binary(
                1,
                Associativity::Left,
                "+",
                ParseNode::passthrough(1, ParseNode::passthrough(2, ParseNode::ident("a"))),
                ParseNode::binary(
                    2,
                    Associativity::Left,
                    "*",
                    ParseNode::passthrough(2, ParseNode::number("2")),
                    ParseNode::ident("b"),
                ),
            )
        );
    }

    #[test]
    fn right_chains_recurse_on_the_right() {
        let adapter = adapter(vec![Operator::right("^", 1)]);
        let node = adapter.parse("x ^ y ^ z").unwrap();
        let ParseNode::Binary(outer) = &node else {
            panic!("expected a binary node, got {node:?}");
        };
        assert_eq!(outer.associativity, Associativity::Right);
        assert_eq!(outer.left, ParseNode::ident("x"));
        assert_eq!(outer.right.binary_count(), 1);
    }

    #[test]
    fn groups_keep_their_own_node() {
        let adapter = adapter(vec![]);
        assert_eq!(
            adapter.parse("((5))").unwrap(),
            ParseNode::group(ParseNode::group(ParseNode::number("5")))
        );
    }

    #[test]
    fn unbound_rules_are_reported() {
        let compiled = compile(&OperatorTable::empty());
        let grammar = Grammar::from_source("G { Exp = Other  Other = digit }").unwrap();
        let tree = grammar.match_input("1").unwrap();
        let err = lower(&tree, compiled.bindings(), DEFAULT_MAX_DEPTH).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownRule {
                rule: "Other".to_string()
            }
        );
    }

    #[test]
    fn lowering_depth_is_bounded() {
        let compiled = compile(&OperatorTable::new(vec![Operator::left("-", 1)]));
        let grammar = Grammar::from_source(compiled.text()).unwrap();
        let tree = grammar.match_input("1-1-1-1-1-1").unwrap();
        assert_eq!(
            lower(&tree, compiled.bindings(), 3).unwrap_err(),
            RenderError::TooDeep { limit: 3 }
        );
        assert!(lower(&tree, compiled.bindings(), 16).is_ok());
    }

    #[test]
    fn passthrough_levels_do_not_count_towards_depth() {
        let adapter = ParserAdapter::new(
            compile(&OperatorTable::new(vec![Operator::left("+", 100)])),
            2,
        )
        .unwrap();
        let node = adapter.parse("((1))").unwrap();
        assert!(matches!(node.unwrap_passthrough(), ParseNode::Group { .. }));
        assert_eq!(node.binary_count(), 0);
        assert!(matches!(
            adapter.parse("(((1)))"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn repetitions_lower_to_sequences() {
        let compiled = compile(&OperatorTable::empty());
        let grammar = Grammar::from_source("G { Exp = Primary  Primary = digit+ }").unwrap();
        let tree = grammar.match_input("123").unwrap();
        assert_eq!(
            lower(&tree, compiled.bindings(), DEFAULT_MAX_DEPTH).unwrap(),
            ParseNode::sequence(vec![
                ParseNode::atom(AtomKind::Token, "1"),
                ParseNode::atom(AtomKind::Token, "2"),
                ParseNode::atom(AtomKind::Token, "3"),
            ])
        );
    }
}
