use std::sync::Arc;

use quaestor_pattern::Captures;
use quaestor_protocol::Token;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::registry::{Rule, RuleRegistry};

/// A rule whose pattern covered the question, with its captures.
#[derive(Debug, Clone)]
pub struct RuleMatch<'r, 't> {
    pub rule: &'r Rule,
    pub captures: Captures<'t>,
}

/// Tries rules in priority order against a token stream.
///
/// Holds only immutable state, so one engine can serve any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<RuleRegistry>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: impl Into<Arc<RuleRegistry>>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: impl Into<Arc<RuleRegistry>>, config: EngineConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The highest-priority rule that covers `tokens`, if any.
    ///
    /// No match is an ordinary outcome. An empty stream only matches rules
    /// whose pattern accepts zero tokens.
    pub fn find<'t>(&self, tokens: &'t [Token]) -> Option<RuleMatch<'_, 't>> {
        let found = self.matches(tokens).next();
        if found.is_none() {
            debug!(tokens = tokens.len(), "no rule matched");
        }
        found
    }

    /// Every covering rule, in priority order.
    pub fn matches<'a, 't>(&'a self, tokens: &'t [Token]) -> impl Iterator<Item = RuleMatch<'a, 't>> {
        self.registry.all_rules().iter().filter_map(move |rule| {
            let result = rule.pattern().try_match(tokens, 0)?;
            if !self.config.end.accepts(tokens, result.end) {
                trace!(rule = rule.name(), end = result.end, "partial match rejected");
                return None;
            }
            debug!(rule = rule.name(), id = %rule.id(), "rule matched");
            Some(RuleMatch {
                rule,
                captures: result.captures,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndCondition;
    use crate::registry::{Interpretation, RegistryBuilder};
    use quaestor_pattern::matcher::{any, lemma, pos};
    use quaestor_pattern::parse_tagged;
    use quaestor_protocol::query::keyword;
    use quaestor_protocol::RuleId;

    fn constant(text: &'static str) -> impl Fn(&Captures<'_>) -> Interpretation + Send + Sync {
        move |_| Ok(Some(keyword(text)))
    }

    fn what_is_pattern() -> quaestor_pattern::Matcher {
        lemma("what")
            .then(lemma("be"))
            .then(pos("DT").optional())
            .then(pos("NN").group("target"))
    }

    #[test]
    fn test_full_sequence_is_required() {
        let mut builder = RegistryBuilder::new();
        builder.register(what_is_pattern(), constant("x")).unwrap();
        let engine = Engine::new(builder.build());

        let full = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN").unwrap();
        let found = engine.find(&full).unwrap();
        assert_eq!(found.captures.get("target").unwrap().text(), "car");

        let trailing = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN please/please/UH").unwrap();
        assert!(engine.find(&trailing).is_none());
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let mut builder = RegistryBuilder::new();
        let specific = builder.register_named("specific", what_is_pattern(), constant("a")).unwrap();
        let general = builder.register_named("general", any().plus(), constant("b")).unwrap();
        let engine = Engine::new(builder.build());

        let tokens = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN").unwrap();
        assert_eq!(engine.find(&tokens).unwrap().rule.id(), specific);

        let ids: Vec<RuleId> = engine.matches(&tokens).map(|m| m.rule.id()).collect();
        assert_eq!(ids, vec![specific, general]);

        // Only the general rule covers this one.
        let other = parse_tagged("Hello/hello/UH").unwrap();
        assert_eq!(engine.find(&other).unwrap().rule.id(), general);
    }

    #[test]
    fn test_empty_stream() {
        let mut builder = RegistryBuilder::new();
        builder.register_named("words", any().plus(), constant("a")).unwrap();
        let engine = Engine::new(builder.build());
        assert!(engine.find(&[]).is_none());

        let mut builder = RegistryBuilder::new();
        let silence = builder.register_named("silence", any().star(), constant("b")).unwrap();
        let engine = Engine::new(builder.build());
        assert_eq!(engine.find(&[]).unwrap().rule.id(), silence);
    }

    #[test]
    fn test_trailing_punctuation_end_condition() {
        let mut builder = RegistryBuilder::new();
        builder.register(what_is_pattern(), constant("x")).unwrap();
        let registry = Arc::new(builder.build());

        let tokens = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN ?/?/.").unwrap();
        assert!(Engine::new(Arc::clone(&registry)).find(&tokens).is_none());

        let config = EngineConfig::new().with_end(EndCondition::allow_trailing(pos(".")).unwrap());
        let lenient = Engine::with_config(registry, config);
        assert!(lenient.find(&tokens).is_some());

        let please = parse_tagged("What/what/WP is/be/VBZ a/a/DT car/car/NN please/please/UH").unwrap();
        assert!(lenient.find(&please).is_none());
    }

    #[test]
    fn test_no_rules() {
        let engine = Engine::new(RegistryBuilder::new().build());
        let tokens = parse_tagged("What/what/WP").unwrap();
        assert!(engine.find(&tokens).is_none());
    }
}
