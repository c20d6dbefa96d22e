use std::collections::HashSet;
use std::sync::Arc;

use quaestor_protocol::Token;
use thiserror::Error;

use crate::capture::{Captures, MatchResult};
use crate::matcher::Matcher;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("group name '{0}' is used more than once in the same pattern")]
    DuplicateGroup(String),
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("invalid repeat bounds: min {min} > max {max}")]
    InvalidRepeat { min: usize, max: usize },
    #[error("repeat with max 0 can never match anything")]
    EmptyRepeat,
}

/// A validated pattern, ready to be shared by every query and thread.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    root: Arc<Matcher>,
    groups: Arc<[Arc<str>]>,
}

/// Validates `root` and freezes it.
pub fn compile(root: Matcher) -> Result<CompiledPattern, PatternError> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    validate(&root, &mut seen, &mut groups)?;

    Ok(CompiledPattern {
        root: Arc::new(root),
        groups: groups.into(),
    })
}

fn validate(matcher: &Matcher, seen: &mut HashSet<Arc<str>>, groups: &mut Vec<Arc<str>>) -> Result<(), PatternError> {
    match matcher {
        Matcher::Literal(_)
        | Matcher::Surface(_)
        | Matcher::PosTag(_)
        | Matcher::PosPrefix(_)
        | Matcher::Wildcard => Ok(()),
        Matcher::Sequence(children) | Matcher::Alternation(children) => children
            .iter()
            .try_for_each(|child| validate(child, seen, groups)),
        Matcher::Optional(child) => validate(child, seen, groups),
        Matcher::Repeat { child, min, max } => {
            match *max {
                Some(0) => return Err(PatternError::EmptyRepeat),
                Some(max) if *min > max => return Err(PatternError::InvalidRepeat { min: *min, max }),
                _ => {}
            }
            validate(child, seen, groups)
        }
        Matcher::Group { child, name } => {
            if name.is_empty() {
                return Err(PatternError::EmptyGroupName);
            }
            // Names are unique across the whole pattern, branches included.
            if !seen.insert(Arc::clone(name)) {
                return Err(PatternError::DuplicateGroup(name.to_string()));
            }
            groups.push(Arc::clone(name));
            validate(child, seen, groups)
        }
    }
}

impl CompiledPattern {
    /// Matches starting at `cursor`; `None` means no match at that position.
    pub fn try_match<'t>(&self, tokens: &'t [Token], cursor: usize) -> Option<MatchResult<'t>> {
        if cursor > tokens.len() {
            return None;
        }
        let mut captures = Vec::with_capacity(self.groups.len());
        let end = self.root.match_at(tokens, cursor, &mut captures)?;
        Some(MatchResult {
            end,
            captures: Captures::new(tokens, captures),
        })
    }

    pub fn matcher(&self) -> &Matcher {
        &self.root
    }

    /// Group names in declaration order (outermost first).
    pub fn group_names(&self) -> &[Arc<str>] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{any, lemma, pos, seq};

    #[test]
    fn test_nested_duplicate_group_is_rejected() {
        let pattern = pos("NN").group("target").group("target");
        assert_eq!(
            compile(pattern).unwrap_err(),
            PatternError::DuplicateGroup("target".to_string())
        );
    }

    #[test]
    fn test_duplicate_group_across_branches_is_rejected() {
        let pattern = seq([lemma("what"), pos("NN").group("x"), pos("NNP").group("x")]);
        assert!(matches!(compile(pattern), Err(PatternError::DuplicateGroup(_))));
    }

    #[test]
    fn test_repeat_bounds_are_checked() {
        assert_eq!(
            compile(any().repeat(3, Some(2))).unwrap_err(),
            PatternError::InvalidRepeat { min: 3, max: 2 }
        );
        assert_eq!(compile(any().repeat(0, Some(0))).unwrap_err(), PatternError::EmptyRepeat);
        assert_eq!(compile(any().group("")).unwrap_err(), PatternError::EmptyGroupName);
        assert!(compile(any().repeat(2, Some(2))).is_ok());
    }

    #[test]
    fn test_group_names_in_declaration_order() {
        let pattern = compile(seq([
            pos("DT").group("det").optional(),
            pos("NN").group("head").group("phrase"),
        ]))
        .unwrap();

        let names: Vec<&str> = pattern.group_names().iter().map(|n| &**n).collect();
        assert_eq!(names, vec!["det", "phrase", "head"]);
    }

    #[test]
    fn test_try_match_from_cursor() {
        let tokens = vec![
            Token::new("What", "what", "WP"),
            Token::new("is", "be", "VBZ"),
            Token::new("a", "a", "DT"),
            Token::new("car", "car", "NN"),
        ];
        let pattern = compile(pos("DT").optional().then(pos("NN").group("target"))).unwrap();

        assert!(pattern.try_match(&tokens, 0).is_none());

        let result = pattern.try_match(&tokens, 2).unwrap();
        assert_eq!(result.end, 4);
        assert_eq!(result.captures.get("target").unwrap().text(), "car");

        assert!(pattern.try_match(&tokens, 5).is_none());
        assert!(compile(pos("NN").optional()).unwrap().try_match(&tokens, 4).is_some());
    }
}
