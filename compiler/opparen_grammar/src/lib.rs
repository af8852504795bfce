//! Grammar compiler: turns an operator table into a rule set that parses
//! binary infix expressions with the table's precedence and associativity.

pub mod bindings;
pub mod compiler;
pub mod levels;

pub use bindings::{RuleBindings, RuleRole};
pub use compiler::{compile, CompiledGrammar};
pub use levels::{build_levels, PrecedenceLevel};
