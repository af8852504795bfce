//! A packrat PEG engine that takes its rules as text.
//!
//! ```ignore
//! let grammar = Grammar::from_source(r#"G { Sum = Sum "+" digit  -- plus | digit }"#)?;
//! let tree = grammar.match_input("1 + 2 + 3")?;
//! ```
//!
//! Rule text supports ordered choice, sequencing, `*`/`+`/`?` repetition,
//! inline case alternatives (`-- name`), rule extension (`+=`), direct left
//! recursion and the built-in rules `any`, `end`, `digit`, `letter`, `alnum`
//! and `space`. Rules named with an uppercase first letter skip whitespace
//! before each term.

pub mod builtin;
pub mod check;
pub mod failure;
pub mod grammar;
mod matcher;
pub mod tree;

pub use builtin::Builtin;
pub use check::GrammarError;
pub use failure::{FailureKind, MatchFailure};
pub use grammar::{Grammar, Rule, RuleId, RuleKind, DEFAULT_MAX_DEPTH};
pub use tree::{MatchNode, MatchTree};
