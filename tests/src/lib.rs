//! Shared fixtures for the end-to-end tests.

use opparen_ast::{Operator, OperatorTable};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `+` and `-` at 1, `*` and `/` at 2, all left associative.
pub fn arithmetic() -> OperatorTable {
    OperatorTable::new(vec![
        Operator::left("+", 1),
        Operator::left("-", 1),
        Operator::left("*", 2),
        Operator::left("/", 2),
    ])
}

/// [`arithmetic`] plus right-associative `**` at 3.
pub fn with_power() -> OperatorTable {
    let mut table = arithmetic();
    table.push(Operator::right("**", 3));
    table
}

pub fn table(ops: &[(&str, u32, bool)]) -> OperatorTable {
    ops.iter()
        .map(|&(symbol, precedence, right)| {
            if right {
                Operator::right(symbol, precedence)
            } else {
                Operator::left(symbol, precedence)
            }
        })
        .collect()
}
