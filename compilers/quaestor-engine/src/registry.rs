use std::fmt;
use std::sync::Arc;

use quaestor_pattern::{compile, Captures, CompiledPattern, Matcher, PatternError};
use quaestor_protocol::{QueryExpr, RuleId};
use tracing::{debug, info};

use crate::error::InterpretationError;

/// `Ok(None)` means the rule declines this match and dispatch moves on.
pub type Interpretation = Result<Option<QueryExpr>, InterpretationError>;

type Interpreter = Arc<dyn Fn(&Captures<'_>) -> Interpretation + Send + Sync>;

/// One recognizable question form: a compiled trigger pattern and the
/// function that turns its captures into a query.
#[derive(Clone)]
pub struct Rule {
    id: RuleId,
    name: String,
    priority: i64,
    pattern: CompiledPattern,
    interpret: Interpreter,
}

impl Rule {
    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn interpret(&self, captures: &Captures<'_>) -> Interpretation {
        (self.interpret)(captures)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("pattern", self.pattern.matcher())
            .finish_non_exhaustive()
    }
}

/// Collects rules during start-up. Any pattern error aborts registration.
#[derive(Default)]
pub struct RegistryBuilder {
    rules: Vec<Rule>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule whose priority is its registration order.
    pub fn register<F>(&mut self, pattern: Matcher, interpret: F) -> Result<RuleId, PatternError>
    where
        F: Fn(&Captures<'_>) -> Interpretation + Send + Sync + 'static,
    {
        let name = format!("rule-{}", self.rules.len());
        self.register_named(&name, pattern, interpret)
    }

    pub fn register_named<F>(&mut self, name: &str, pattern: Matcher, interpret: F) -> Result<RuleId, PatternError>
    where
        F: Fn(&Captures<'_>) -> Interpretation + Send + Sync + 'static,
    {
        let priority = self.rules.len() as i64;
        self.register_with_priority(name, priority, pattern, interpret)
    }

    /// Lower priority values are tried first; equal values keep registration order.
    pub fn register_with_priority<F>(
        &mut self,
        name: &str,
        priority: i64,
        pattern: Matcher,
        interpret: F,
    ) -> Result<RuleId, PatternError>
    where
        F: Fn(&Captures<'_>) -> Interpretation + Send + Sync + 'static,
    {
        let pattern = compile(pattern)?;
        let id = RuleId::new(self.rules.len() as u32);
        debug!(%id, name, priority, "registered rule");

        self.rules.push(Rule {
            id,
            name: name.to_string(),
            priority,
            pattern,
            interpret: Arc::new(interpret),
        });
        Ok(id)
    }

    /// Freezes the rule set. The result has no mutating API.
    pub fn build(mut self) -> RuleRegistry {
        // Stable: equal priorities stay in registration order.
        self.rules.sort_by_key(Rule::priority);
        info!(rules = self.rules.len(), "rule registry frozen");
        RuleRegistry { rules: self.rules }
    }
}

/// Immutable, priority-ordered rule set; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Rules in the order the engine tries them.
    pub fn all_rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
