//! Parser for opparen rule text.
//!
//! Rule text is what the grammar compiler emits and what the matching engine
//! consumes. This crate turns it back into an [`opparen_ast::GrammarDef`].

pub mod parser;

pub use parser::{parse_grammar, parse_tokens, TokenSlice};
