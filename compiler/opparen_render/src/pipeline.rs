//! Table + input → output string.

use std::rc::Rc;

use opparen_ast::{OperatorTable, ParseNode};
use opparen_engine::DEFAULT_MAX_DEPTH;
use opparen_grammar::compile;

use crate::adapter::ParserAdapter;
use crate::cache::{table_key, GrammarCache};
use crate::error::PipelineError;
use crate::parenthesize::parenthesize;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Nesting bound applied while matching, lowering and rendering.
    pub max_depth: usize,
    /// Compiled grammars kept by a [`Pipeline`].
    pub cache_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// A reusable parenthesizer that remembers the grammars it compiled.
#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    cache: GrammarCache,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            cache: GrammarCache::new(options.cache_capacity),
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn cache(&self) -> &GrammarCache {
        &self.cache
    }

    /// The adapter for `table`, compiled on first use.
    pub fn adapter(&mut self, table: &OperatorTable) -> Result<Rc<ParserAdapter>, PipelineError> {
        let key = table_key(table);
        if let Some(adapter) = key.as_deref().and_then(|k| self.cache.get(k)) {
            return Ok(adapter);
        }
        let adapter = Rc::new(ParserAdapter::new(compile(table), self.options.max_depth)?);
        if let Some(key) = key {
            self.cache.insert(key, Rc::clone(&adapter));
        }
        Ok(adapter)
    }

    /// Matches and lowers `input` without rendering it.
    pub fn parse(&mut self, table: &OperatorTable, input: &str) -> Result<ParseNode, PipelineError> {
        self.adapter(table)?.parse(input)
    }

    pub fn render(&self, node: &ParseNode) -> Result<String, PipelineError> {
        Ok(parenthesize(node, self.options.max_depth)?)
    }

    pub fn try_parenthesize(
        &mut self,
        table: &OperatorTable,
        input: &str,
    ) -> Result<String, PipelineError> {
        let node = self.parse(table, input)?;
        self.render(&node)
    }

    /// Like [`Pipeline::try_parenthesize`], with failures folded into an
    /// `"Error: ..."` string.
    pub fn parenthesize(&mut self, table: &OperatorTable, input: &str) -> String {
        into_output(self.try_parenthesize(table, input))
    }
}

/// Parses `input` against the grammar compiled from `table` and renders it
/// fully parenthesized.
pub fn try_parse_and_parenthesize(
    table: &OperatorTable,
    input: &str,
) -> Result<String, PipelineError> {
    let options = PipelineOptions::default();
    let adapter = ParserAdapter::new(compile(table), options.max_depth)?;
    render_with(&adapter, input, options.max_depth)
}

/// Parses `input` against the grammar compiled from `table` and renders it
/// fully parenthesized. Any failure is returned as `"Error: <message>"`.
///
/// ```
/// use opparen_ast::{Operator, OperatorTable};
/// use opparen_render::parse_and_parenthesize;
///
/// let table = OperatorTable::new(vec![Operator::left("+", 1), Operator::left("*", 2)]);
/// assert_eq!(parse_and_parenthesize(&table, "1 + 2 * 3"), "(1 + (2 * 3))");
/// assert!(parse_and_parenthesize(&OperatorTable::empty(), "1 + 1").starts_with("Error:"));
/// ```
pub fn parse_and_parenthesize(table: &OperatorTable, input: &str) -> String {
    into_output(try_parse_and_parenthesize(table, input))
}

fn render_with(
    adapter: &ParserAdapter,
    input: &str,
    max_depth: usize,
) -> Result<String, PipelineError> {
    let node = adapter.parse(input)?;
    Ok(parenthesize(&node, max_depth)?)
}

fn into_output(result: Result<String, PipelineError>) -> String {
    result.unwrap_or_else(|err| {
        log::debug!("pipeline failed: {err}");
        format!("Error: {err}")
    })
}
