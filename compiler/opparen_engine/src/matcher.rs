//! Packrat matcher.
//!
//! Every application of a memoized rule at a given offset is evaluated at most
//! once per growth step. Direct left recursion is handled by seed growing: the
//! first recursive call at the same offset fails, whatever the rule matched
//! without recursing becomes the seed, and the body is re-run with the seed in
//! the memo table until the match stops getting longer.
//!
//! The depth guard counts input nesting: an application is charged only when
//! it starts past the offset of the application that called it. Descending
//! through rules at one offset is bounded by the grammar itself: a memoized
//! rule re-entered at its own offset is left recursion, and a case rule
//! re-entered at its own offset fails.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::grammar::{Expr, Grammar, RuleId};
use crate::failure::{FailureKind, MatchFailure};
use crate::tree::{MatchNode, MatchTree};

/// A rule application that succeeded: its node and end offset.
type Applied = Option<(Rc<MatchNode>, usize)>;

/// Nodes produced by one expression and the offset it stopped at.
struct Matched {
    end: usize,
    nodes: Vec<Rc<MatchNode>>,
}

/// Matching stops immediately, without a furthest-failure report.
enum Abort {
    TooDeep { offset: usize },
}

type Step<T> = Result<T, Abort>;

enum MemoEntry {
    /// The application is being evaluated; reaching it again means the rule
    /// is left recursive at this offset.
    InProgress { recursed: bool },
    Done(Applied),
}

/// Furthest position a terminal failed at, and what was tried there.
#[derive(Default)]
struct Expectations {
    offset: usize,
    items: Vec<String>,
}

impl Expectations {
    fn record(&mut self, offset: usize, description: &str) {
        if offset > self.offset || self.items.is_empty() {
            self.offset = offset;
            self.items.clear();
        }
        if offset == self.offset && !self.items.iter().any(|d| d == description) {
            self.items.push(description.to_string());
        }
    }
}

pub(crate) struct Matcher<'g, 'i> {
    grammar: &'g Grammar,
    input: &'i str,
    memo: HashMap<(RuleId, usize), MemoEntry>,
    expected: Expectations,
    /// Off while skipping whitespace, which never explains a failure.
    recording: bool,
    depth: usize,
    /// Start offset of the innermost active application.
    frame: usize,
    /// Case rules being evaluated; re-entering one at the same offset fails.
    active_cases: HashSet<(RuleId, usize)>,
}

impl<'g, 'i> Matcher<'g, 'i> {
    pub(crate) fn new(grammar: &'g Grammar, input: &'i str) -> Self {
        Self {
            grammar,
            input,
            memo: HashMap::new(),
            expected: Expectations::default(),
            recording: true,
            depth: 0,
            frame: 0,
            active_cases: HashSet::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<MatchTree<'i>, MatchFailure> {
        let start = self.grammar.start_id();
        log::debug!(
            "matching {} bytes against '{}'",
            self.input.len(),
            self.grammar.start_rule().name
        );
        match self.match_start(start) {
            Ok(Some(root)) => {
                log::trace!("match succeeded with {} memo entries", self.memo.len());
                Ok(MatchTree::new(self.input, root))
            }
            Ok(None) => {
                let failure = MatchFailure::new(
                    self.input,
                    self.expected.offset,
                    FailureKind::Mismatch {
                        expected: std::mem::take(&mut self.expected.items),
                    },
                );
                log::debug!("match failed: {failure}");
                Err(failure)
            }
            Err(Abort::TooDeep { offset }) => {
                let failure = MatchFailure::new(
                    self.input,
                    offset,
                    FailureKind::TooDeep {
                        limit: self.grammar.max_depth(),
                    },
                );
                log::debug!("match aborted: {failure}");
                Err(failure)
            }
        }
    }

    fn match_start(&mut self, start: RuleId) -> Step<Option<Rc<MatchNode>>> {
        let syntactic = self.grammar.rule(start).syntactic;
        let pos = self.skip_spaces_if(syntactic, 0)?;
        self.frame = pos;
        let Some((root, end)) = self.apply(start, pos)? else {
            return Ok(None);
        };
        let end = self.skip_spaces_if(syntactic, end)?;
        if end == self.input.len() {
            Ok(Some(root))
        } else {
            self.expect(end, "end of input");
            Ok(None)
        }
    }

    fn expect(&mut self, offset: usize, description: &str) {
        if self.recording {
            self.expected.record(offset, description);
        }
    }

    fn skip_spaces_if(&mut self, syntactic: bool, mut pos: usize) -> Step<usize> {
        if !syntactic {
            return Ok(pos);
        }
        let space = self.grammar.space_id();
        let recording = std::mem::replace(&mut self.recording, false);
        let result = loop {
            match self.enter(space, pos) {
                Ok(Some((_, end))) if end > pos => pos = end,
                Ok(_) => break Ok(pos),
                Err(abort) => break Err(abort),
            }
        };
        self.recording = recording;
        result
    }

    fn apply(&mut self, id: RuleId, pos: usize) -> Step<Applied> {
        if pos <= self.frame {
            return self.enter(id, pos);
        }
        if self.depth >= self.grammar.max_depth() {
            return Err(Abort::TooDeep { offset: pos });
        }
        self.depth += 1;
        let result = self.enter(id, pos);
        self.depth -= 1;
        result
    }

    /// Applies a rule without charging the depth guard. Whitespace skipping
    /// goes through here directly.
    fn enter(&mut self, id: RuleId, pos: usize) -> Step<Applied> {
        let outer = std::mem::replace(&mut self.frame, pos);
        let result = if self.grammar.rule(id).memoized() {
            self.apply_memoized(id, pos)
        } else if self.active_cases.insert((id, pos)) {
            let result = self.eval_rule(id, pos);
            self.active_cases.remove(&(id, pos));
            result
        } else {
            Ok(None)
        };
        self.frame = outer;
        result
    }

    fn apply_memoized(&mut self, id: RuleId, pos: usize) -> Step<Applied> {
        let key = (id, pos);
        match self.memo.get_mut(&key) {
            Some(MemoEntry::Done(applied)) => return Ok(applied.clone()),
            Some(MemoEntry::InProgress { recursed }) => {
                *recursed = true;
                return Ok(None);
            }
            None => {}
        }

        self.memo.insert(key, MemoEntry::InProgress { recursed: false });
        let mut result = self.eval_rule(id, pos)?;
        let recursed = matches!(
            self.memo.get(&key),
            Some(MemoEntry::InProgress { recursed: true })
        );

        if recursed {
            if let Some((_, mut best_end)) = result.clone() {
                log::trace!(
                    "growing left-recursive '{}' at {pos}",
                    self.grammar.rule(id).name
                );
                loop {
                    self.memo.insert(key, MemoEntry::Done(result.clone()));
                    match self.eval_rule(id, pos)? {
                        Some((node, end)) if end > best_end => {
                            best_end = end;
                            result = Some((node, end));
                        }
                        _ => break,
                    }
                }
            }
        }

        self.memo.insert(key, MemoEntry::Done(result.clone()));
        Ok(result)
    }

    fn eval_rule(&mut self, id: RuleId, pos: usize) -> Step<Applied> {
        let grammar = self.grammar;
        let rule = grammar.rule(id);
        Ok(self.eval(&rule.body, pos, rule.syntactic)?.map(|m| {
            let node = MatchNode::Rule {
                name: Rc::clone(&rule.name),
                span: pos..m.end,
                children: m.nodes,
            };
            (Rc::new(node), m.end)
        }))
    }

    fn eval(&mut self, expr: &Expr, pos: usize, syntactic: bool) -> Step<Option<Matched>> {
        match expr {
            Expr::Apply(id) => {
                let pos = self.skip_spaces_if(syntactic, pos)?;
                Ok(self.apply(*id, pos)?.map(|(node, end)| Matched {
                    end,
                    nodes: vec![node],
                }))
            }
            Expr::Terminal(terminal) => {
                let pos = self.skip_spaces_if(syntactic, pos)?;
                let matches = self
                    .input
                    .get(pos..)
                    .is_some_and(|rest| rest.starts_with(terminal.text.as_str()));
                if matches {
                    Ok(Some(terminal_at(pos, pos + terminal.text.len())))
                } else {
                    self.expect(pos, &terminal.description);
                    Ok(None)
                }
            }
            Expr::Native(builtin) => match builtin.match_at(self.input, pos) {
                Some(end) => Ok(Some(terminal_at(pos, end))),
                None => {
                    self.expect(pos, builtin.description());
                    Ok(None)
                }
            },
            Expr::Seq(items) => {
                let mut end = pos;
                let mut nodes = Vec::new();
                for item in items {
                    match self.eval(item, end, syntactic)? {
                        Some(m) => {
                            end = m.end;
                            nodes.extend(m.nodes);
                        }
                        None => return Ok(None),
                    }
                }
                Ok(Some(Matched { end, nodes }))
            }
            Expr::Alt(alternatives) => {
                for alt in alternatives {
                    if let Some(m) = self.eval(alt, pos, syntactic)? {
                        return Ok(Some(m));
                    }
                }
                Ok(None)
            }
            Expr::Star(inner) => self.repeat(inner, pos, syntactic, 0, usize::MAX),
            Expr::Plus(inner) => self.repeat(inner, pos, syntactic, 1, usize::MAX),
            Expr::Opt(inner) => self.repeat(inner, pos, syntactic, 0, 1),
        }
    }

    fn repeat(
        &mut self,
        inner: &Expr,
        pos: usize,
        syntactic: bool,
        min: usize,
        max: usize,
    ) -> Step<Option<Matched>> {
        let mut end = pos;
        let mut count = 0;
        let mut children = Vec::new();
        while count < max {
            let Some(m) = self.eval(inner, end, syntactic)? else {
                break;
            };
            count += 1;
            children.extend(m.nodes);
            let advanced = m.end > end;
            end = m.end;
            if !advanced {
                break;
            }
        }
        if count < min {
            return Ok(None);
        }
        let node = MatchNode::Iter {
            span: pos..end,
            children,
        };
        Ok(Some(Matched {
            end,
            nodes: vec![Rc::new(node)],
        }))
    }
}

fn terminal_at(start: usize, end: usize) -> Matched {
    Matched {
        end,
        nodes: vec![Rc::new(MatchNode::Terminal { span: start..end })],
    }
}
