//! Token-level pattern matching: the matcher algebra, its compiler, and a
//! reader for pre-tagged `surface/lemma/TAG` text.
//!
//! Matching is greedy and never backtracks: an alternation commits to its
//! first successful branch and a repeat keeps its longest count even when a
//! later sibling then fails.

pub mod capture;
pub mod compile;
pub mod matcher;
pub mod tagged;

pub use capture::{Captured, Captures, MatchResult, Span};
pub use compile::{compile, CompiledPattern, PatternError};
pub use matcher::Matcher;
pub use tagged::{parse_tagged, TaggedParseError};

#[cfg(test)]
mod tests {
    use super::*;
    use super::matcher::{any, lemma, pos, pos_prefix};
    use proptest::prelude::*;
    use quaestor_protocol::Token;

    fn what_is() -> CompiledPattern {
        compile(
            lemma("what")
                .then(lemma("be"))
                .then(pos("DT").optional())
                .then(pos("NN").group("target")),
        )
        .unwrap()
    }

    #[test]
    fn test_what_is_a_car() {
        let tokens = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN").unwrap();
        let result = what_is().try_match(&tokens, 0).unwrap();

        assert_eq!(result.end, tokens.len());
        let target = result.captures.get("target").unwrap();
        assert_eq!(target.tokens, &[Token::new("car", "car", "NN")]);
        assert_eq!(target.span, Span::new(3, 4));
    }

    #[test]
    fn test_trailing_word_is_left_unconsumed() {
        let tokens = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN please/please/UH").unwrap();
        let result = what_is().try_match(&tokens, 0).unwrap();

        // The pattern stops before "please"; deciding that this is not a
        // full match belongs to the caller.
        assert_eq!(result.end, 4);
    }

    fn tag() -> impl Strategy<Value = Token> {
        prop_oneof![
            Just(Token::new("What", "what", "WP")),
            Just(Token::new("is", "be", "VBZ")),
            Just(Token::new("a", "a", "DT")),
            Just(Token::new("car", "car", "NN")),
            Just(Token::new("cars", "car", "NNS")),
            Just(Token::new("?", "?", ".")),
        ]
    }

    proptest! {
        #[test]
        fn test_matching_is_deterministic(tokens in prop::collection::vec(tag(), 0..8)) {
            let pattern = compile(
                any().star().group("head")
                    .then(pos_prefix("NN").plus().group("noun"))
                    .then(pos(".").optional()),
            ).unwrap();
            let other = what_is();

            prop_assert_eq!(pattern.try_match(&tokens, 0), pattern.try_match(&tokens, 0));
            prop_assert_eq!(other.try_match(&tokens, 0), other.try_match(&tokens, 0));
        }

        #[test]
        fn test_match_end_stays_in_bounds(tokens in prop::collection::vec(tag(), 0..8), start in 0usize..10) {
            let pattern = what_is();
            if let Some(result) = pattern.try_match(&tokens, start) {
                prop_assert!(result.end >= start && result.end <= tokens.len());
                for (_, group) in result.captures.iter() {
                    prop_assert!(group.span.end <= result.end);
                }
            }
        }
    }
}
