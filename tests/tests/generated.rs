//! Generated expressions checked against a reference precedence climber.

use opparen_ast::{Associativity, OperatorTable};
use opparen_render::{parse_and_parenthesize, Pipeline};
use proptest::prelude::*;
use tests::with_power;

/// Reference renderer for flat `atom (op atom)*` input.
struct Climber<'a> {
    table: &'a OperatorTable,
    atoms: &'a [String],
    ops: &'a [&'static str],
    next: usize,
}

impl Climber<'_> {
    fn binding(&self, symbol: &str) -> (u32, Associativity) {
        let op = self
            .table
            .iter()
            .find(|op| op.symbol == symbol)
            .expect("symbol comes from the table");
        (op.precedence, op.associativity)
    }

    fn expr(&mut self, min: u32) -> String {
        let mut lhs = self.atoms[self.next].clone();
        while let Some(&symbol) = self.ops.get(self.next) {
            let (precedence, associativity) = self.binding(symbol);
            if precedence < min {
                break;
            }
            self.next += 1;
            let next_min = match associativity {
                Associativity::Left => precedence + 1,
                Associativity::Right => precedence,
            };
            let rhs = self.expr(next_min);
            lhs = format!("({lhs} {symbol} {rhs})");
        }
        lhs
    }
}

fn reference(table: &OperatorTable, atoms: &[String], ops: &[&'static str]) -> String {
    Climber {
        table,
        atoms,
        ops,
        next: 0,
    }
    .expr(1)
}

fn atom() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,3}", "[a-z][a-z0-9]{0,3}"]
}

fn op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["+", "-", "*", "/", "**"])
}

fn gap() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", " ", "  ", "\t", "\n"])
}

prop_compose! {
    fn flat_expression()(
        first in atom(),
        rest in prop::collection::vec((gap(), op(), gap(), atom()), 0..8),
    ) -> (String, Vec<String>, Vec<&'static str>) {
        let mut source = first.clone();
        let mut atoms = vec![first];
        let mut ops = Vec::new();
        for (before, op, after, atom) in rest {
            source.push_str(before);
            source.push_str(op);
            source.push_str(after);
            source.push_str(&atom);
            ops.push(op);
            atoms.push(atom);
        }
        (source, atoms, ops)
    }
}

proptest! {
    #[test]
    fn matches_reference_climber((source, atoms, ops) in flat_expression()) {
        let table = with_power();
        let output = parse_and_parenthesize(&table, &source);
        prop_assert_eq!(output, reference(&table, &atoms, &ops));
    }

    #[test]
    fn one_pair_of_parentheses_per_operator((source, _atoms, ops) in flat_expression()) {
        let output = parse_and_parenthesize(&with_power(), &source);
        prop_assert_eq!(output.matches('(').count(), ops.len());
        prop_assert_eq!(output.matches(')').count(), ops.len());
    }

    #[test]
    fn outer_groups_wrap_the_result(
        (source, atoms, ops) in flat_expression(),
        depth in 1usize..4,
    ) {
        let table = with_power();
        let grouped = format!("{}{source}{}", "(".repeat(depth), ")".repeat(depth));
        let expected = format!(
            "{}{}{}",
            "(".repeat(depth),
            reference(&table, &atoms, &ops),
            ")".repeat(depth)
        );
        prop_assert_eq!(parse_and_parenthesize(&table, &grouped), expected);
    }

    #[test]
    fn cached_and_fresh_runs_agree((source, _atoms, _ops) in flat_expression()) {
        let table = with_power();
        let mut pipeline = Pipeline::default();
        let cached = pipeline.parenthesize(&table, &source);
        prop_assert_eq!(&cached, &pipeline.parenthesize(&table, &source));
        prop_assert_eq!(cached, parse_and_parenthesize(&table, &source));
    }
}
