//! Fully parenthesizing renderer for operator-precedence expressions.
//!
//! An [`OperatorTable`](opparen_ast::OperatorTable) is compiled into rule
//! text, the input is matched against it, the match tree is lowered to a
//! [`ParseNode`](opparen_ast::ParseNode) tree and that tree is rendered with
//! every binary application wrapped in parentheses.

pub mod adapter;
pub mod cache;
pub mod error;
pub mod parenthesize;
pub mod pipeline;

pub use adapter::{lower, ParserAdapter};
pub use cache::GrammarCache;
pub use error::{PipelineError, RenderError};
pub use parenthesize::{parenthesize, Parenthesizer};
pub use pipeline::{
    parse_and_parenthesize, try_parse_and_parenthesize, Pipeline, PipelineOptions,
    DEFAULT_CACHE_CAPACITY,
};

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
