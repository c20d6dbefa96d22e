use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::SentenceId;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One word of input as delivered by the external tagger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    pub surface: String,
    pub lemma: String,
    pub pos: String,
}

impl Token {
    pub fn new(surface: impl Into<String>, lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }
}

/// A question after tagging. The engine itself only ever borrows `&[Token]`.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedSentence {
    pub id: SentenceId,
    pub tokens: Vec<Token>,
}

impl TaggedSentence {
    pub fn new(id: SentenceId, tokens: Vec<Token>) -> Self {
        Self { id, tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Surface forms joined by single spaces.
    pub fn text(&self) -> String {
        join_surface(&self.tokens)
    }
}

/// Root of a compiled corpus file.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Corpus {
    pub version: u32,
    pub sentences: Vec<TaggedSentence>,
}

pub fn join_surface(tokens: &[Token]) -> String {
    join_with(tokens, |t| t.surface.as_str())
}

pub fn join_lemma(tokens: &[Token]) -> String {
    join_with(tokens, |t| t.lemma.as_str())
}

fn join_with<'a>(tokens: &'a [Token], field: impl Fn(&'a Token) -> &'a str) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(field(token));
    }
    out
}

/// Compares two strings under Unicode lowercase folding without allocating.
pub fn fold_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
