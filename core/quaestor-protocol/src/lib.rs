#![no_std] // Matching core stays usable from WASM/embedded hosts

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod token;
pub mod query;

// Re-export core types for convenience
pub use ids::{RuleId, SentenceId};
pub use token::{Corpus, TaggedSentence, Token};
pub use query::QueryExpr;

#[cfg(test)]
mod tests {
    use super::*;
    use super::query::{conjunction, definition, keyword, relation, typed};
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use rkyv::{from_bytes, to_bytes};

    #[test]
    fn test_corpus_archive() {
        let corpus = Corpus {
            version: 1,
            sentences: vec![TaggedSentence::new(
                SentenceId::new(0),
                vec![Token::new("What", "what", "WP"), Token::new("is", "be", "VBZ")],
            )],
        };

        let bytes = to_bytes::<_, 256>(&corpus).expect("Failed to serialize Corpus");
        let archived = rkyv::check_archived_root::<Corpus>(&bytes).expect("Corrupt archive");
        assert_eq!(archived.sentences[0].tokens[1].lemma.as_str(), "be");

        let restored: Corpus = from_bytes(&bytes).expect("Failed to deserialize Corpus");
        assert_eq!(restored.sentences[0].text(), "What is");
    }

    #[test]
    fn test_id_layout() {
        // RuleId(u32) must stay exactly 4 bytes
        assert_eq!(core::mem::size_of::<RuleId>(), 4);
        assert_eq!(RuleId::new(3).to_string(), "RuleId#3");
    }

    #[test]
    fn test_conjunction_flattening() {
        assert_eq!(conjunction(Vec::<QueryExpr>::new()), QueryExpr::Any);
        assert_eq!(conjunction(vec![keyword("car")]), keyword("car"));

        let nested = typed("Car").and(keyword("car")).and(typed("Vehicle").and(QueryExpr::Any));
        assert_eq!(
            nested,
            QueryExpr::Conjunction(vec![typed("Car"), keyword("car"), typed("Vehicle")])
        );
    }

    #[test]
    fn test_building_is_idempotent() {
        let build = || definition(relation(QueryExpr::Any, "capital", keyword("France")));
        let (a, b) = (build(), build());
        assert_eq!(a, b);
        assert_eq!(a.size(), 4);
        assert_eq!(
            a.to_string(),
            "definition(relation(any, \"capital\", keyword(\"France\")))"
        );
    }

    #[test]
    fn test_fold_eq() {
        assert!(token::fold_eq("What", "what"));
        assert!(token::fold_eq("ÄPFEL", "äpfel"));
        assert!(!token::fold_eq("what", "whaT?"));
    }
}
