//! Rule-text lexical analyzer
//!
//! Turns grammar source such as `Exp1 = Exp1 "+" Exp2  -- left | Exp2` into a
//! stream of tokens for the rule-text parser.

pub mod lexer;
pub mod token;

// Re-export the main types for convenience
pub use lexer::{Lexer, LogosToken};
pub use token::{Location, Token, TokenType};
