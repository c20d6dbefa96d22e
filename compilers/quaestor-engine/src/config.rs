use quaestor_pattern::{compile, CompiledPattern, Matcher, PatternError};
use quaestor_protocol::Token;

/// When a rule's match counts as covering the whole question.
#[derive(Debug, Clone, Default)]
pub enum EndCondition {
    /// The match must consume every token.
    #[default]
    Full,
    /// Unconsumed tokens are tolerated when each one matches the terminal
    /// pattern (typically trailing punctuation).
    AllowTrailing(CompiledPattern),
}

impl EndCondition {
    pub fn allow_trailing(terminal: Matcher) -> Result<Self, PatternError> {
        Ok(EndCondition::AllowTrailing(compile(terminal)?))
    }

    pub fn accepts(&self, tokens: &[Token], end: usize) -> bool {
        match self {
            EndCondition::Full => end == tokens.len(),
            EndCondition::AllowTrailing(terminal) => {
                let mut pos = end;
                while pos < tokens.len() {
                    match terminal.try_match(tokens, pos) {
                        Some(result) if result.end > pos => pos = result.end,
                        _ => return false,
                    }
                }
                pos == tokens.len()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub end: EndCondition,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_end(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quaestor_pattern::matcher::pos;

    #[test]
    fn test_end_conditions() {
        let tokens = vec![
            Token::new("car", "car", "NN"),
            Token::new("?", "?", "."),
            Token::new("!", "!", "."),
        ];

        assert!(EndCondition::Full.accepts(&tokens, 3));
        assert!(!EndCondition::Full.accepts(&tokens, 1));

        let trailing = EndCondition::allow_trailing(pos(".")).unwrap();
        assert!(trailing.accepts(&tokens, 1));
        assert!(trailing.accepts(&tokens, 3));
        assert!(!trailing.accepts(&tokens, 0));
    }

    #[test]
    fn test_zero_width_terminal_cannot_skip_words() {
        let tokens = vec![Token::new("car", "car", "NN"), Token::new("please", "please", "UH")];
        let trailing = EndCondition::allow_trailing(pos(".").optional()).unwrap();
        assert!(!trailing.accepts(&tokens, 1));
    }
}
