use std::sync::Arc;

use quaestor_protocol::token::fold_eq;
use quaestor_protocol::Token;

use crate::capture::{Capture, Span};

/// One element of a rule's trigger pattern.
///
/// Patterns are plain data: build them with the constructor functions and
/// combinators below, then hand the root to [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Token lemma equals the text (lowercase folded on both sides).
    Literal(String),
    /// Token surface form equals the text (lowercase folded on both sides).
    Surface(String),
    /// Token POS tag equals the tag exactly.
    PosTag(String),
    /// Token POS tag starts with the prefix (`NN` covers `NNS`, `NNP`, ...).
    PosPrefix(String),
    /// Any single token.
    Wildcard,
    Sequence(Vec<Matcher>),
    /// First matching child wins. An empty alternation never matches.
    Alternation(Vec<Matcher>),
    Optional(Box<Matcher>),
    Repeat {
        child: Box<Matcher>,
        min: usize,
        max: Option<usize>,
    },
    Group {
        child: Box<Matcher>,
        name: Arc<str>,
    },
}

pub fn lemma(text: impl Into<String>) -> Matcher {
    Matcher::Literal(text.into())
}

pub fn surface(text: impl Into<String>) -> Matcher {
    Matcher::Surface(text.into())
}

pub fn pos(tag: impl Into<String>) -> Matcher {
    Matcher::PosTag(tag.into())
}

pub fn pos_prefix(prefix: impl Into<String>) -> Matcher {
    Matcher::PosPrefix(prefix.into())
}

pub fn any() -> Matcher {
    Matcher::Wildcard
}

pub fn seq(children: impl IntoIterator<Item = Matcher>) -> Matcher {
    Matcher::Sequence(children.into_iter().collect())
}

pub fn alt(children: impl IntoIterator<Item = Matcher>) -> Matcher {
    Matcher::Alternation(children.into_iter().collect())
}

/// Never matches; the empty alternation.
pub fn nothing() -> Matcher {
    Matcher::Alternation(Vec::new())
}

/// Sequence of `Literal`s, one per whitespace-separated lemma.
pub fn lemmas(text: &str) -> Matcher {
    seq(text.split_whitespace().map(lemma))
}

impl Matcher {
    /// Appends `next`, extending `self` in place when it already is a sequence.
    pub fn then(self, next: Matcher) -> Matcher {
        match self {
            Matcher::Sequence(mut children) => {
                children.push(next);
                Matcher::Sequence(children)
            }
            first => Matcher::Sequence(vec![first, next]),
        }
    }

    pub fn optional(self) -> Matcher {
        Matcher::Optional(Box::new(self))
    }

    pub fn repeat(self, min: usize, max: Option<usize>) -> Matcher {
        Matcher::Repeat {
            child: Box::new(self),
            min,
            max,
        }
    }

    /// One or more.
    pub fn plus(self) -> Matcher {
        self.repeat(1, None)
    }

    /// Zero or more.
    pub fn star(self) -> Matcher {
        self.repeat(0, None)
    }

    pub fn group(self, name: &str) -> Matcher {
        Matcher::Group {
            child: Box::new(self),
            name: Arc::from(name),
        }
    }

    /// Tries to match at `cursor`, returning the cursor after the match.
    ///
    /// Captures are appended to `captures`. On `None` the vector is left
    /// exactly as it was found, so failed branches never leak captures.
    pub(crate) fn match_at(&self, tokens: &[Token], cursor: usize, captures: &mut Vec<Capture>) -> Option<usize> {
        match self {
            Matcher::Literal(text) => single(tokens, cursor, |t| fold_eq(&t.lemma, text)),
            Matcher::Surface(text) => single(tokens, cursor, |t| fold_eq(&t.surface, text)),
            Matcher::PosTag(tag) => single(tokens, cursor, |t| t.pos == *tag),
            Matcher::PosPrefix(prefix) => single(tokens, cursor, |t| t.pos.starts_with(prefix.as_str())),
            Matcher::Wildcard => single(tokens, cursor, |_| true),

            Matcher::Sequence(children) => {
                let mark = captures.len();
                let mut pos = cursor;
                for child in children {
                    match child.match_at(tokens, pos, captures) {
                        Some(next) => pos = next,
                        None => {
                            captures.truncate(mark);
                            return None;
                        }
                    }
                }
                Some(pos)
            }

            // Commits to the first success; an outer sequence never comes back here.
            Matcher::Alternation(children) => children
                .iter()
                .find_map(|child| child.match_at(tokens, cursor, captures)),

            Matcher::Optional(child) => child.match_at(tokens, cursor, captures).or(Some(cursor)),

            Matcher::Repeat { child, min, max } => {
                let mark = captures.len();
                let mut pos = cursor;
                let mut count = 0;
                while max.map_or(true, |max| count < max) {
                    match child.match_at(tokens, pos, captures) {
                        Some(next) if next == pos => {
                            // A zero-width child could repeat forever: it satisfies any remaining minimum.
                            count = count.max(*min).max(1);
                            break;
                        }
                        Some(next) => {
                            count += 1;
                            pos = next;
                        }
                        None => break,
                    }
                }
                if count >= *min {
                    Some(pos)
                } else {
                    captures.truncate(mark);
                    None
                }
            }

            Matcher::Group { child, name } => {
                let end = child.match_at(tokens, cursor, captures)?;
                captures.push(Capture {
                    name: Arc::clone(name),
                    span: Span::new(cursor, end),
                });
                Some(end)
            }
        }
    }
}

fn single(tokens: &[Token], cursor: usize, accept: impl Fn(&Token) -> bool) -> Option<usize> {
    tokens
        .get(cursor)
        .filter(|token| accept(token))
        .map(|_| cursor + 1)
}
