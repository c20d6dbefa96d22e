use std::sync::Arc;

use quaestor_protocol::token::{join_lemma, join_surface};
use quaestor_protocol::Token;

/// Half-open token range `[start, end)` inside a token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub name: Arc<str>,
    pub span: Span,
}

/// Named groups recorded by one successful match, borrowing the matched stream.
///
/// Groups are kept in the order they completed. A group matched more than
/// once (inside a repeat) resolves to its last recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'t> {
    tokens: &'t [Token],
    groups: Vec<Capture>,
}

impl<'t> Captures<'t> {
    pub(crate) fn new(tokens: &'t [Token], groups: Vec<Capture>) -> Self {
        Self { tokens, groups }
    }

    pub fn get(&self, name: &str) -> Option<Captured<'t>> {
        self.groups
            .iter()
            .rev()
            .find(|capture| &*capture.name == name)
            .map(|capture| self.resolve(capture.span))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.iter().any(|capture| &*capture.name == name)
    }

    /// Every recording in completion order, repeats included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Captured<'t>)> + '_ {
        self.groups
            .iter()
            .map(move |capture| (&*capture.name, self.resolve(capture.span)))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn resolve(&self, span: Span) -> Captured<'t> {
        Captured {
            span,
            tokens: &self.tokens[span.start..span.end],
        }
    }
}

/// The tokens consumed by one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captured<'t> {
    pub span: Span,
    pub tokens: &'t [Token],
}

impl<'t> Captured<'t> {
    /// Surface forms joined by spaces.
    pub fn text(&self) -> String {
        join_surface(self.tokens)
    }

    /// Lemmas joined by spaces.
    pub fn lemmas(&self) -> String {
        join_lemma(self.tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Outcome of a successful `try_match`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'t> {
    pub end: usize,
    pub captures: Captures<'t>,
}
