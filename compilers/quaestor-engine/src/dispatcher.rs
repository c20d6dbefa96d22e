use quaestor_protocol::{QueryExpr, RuleId, Token};
use tracing::{debug, warn};

use crate::engine::{Engine, RuleMatch};
use crate::error::DispatchError;

/// The query built for one question, and the rule that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub rule: RuleId,
    pub rule_name: String,
    pub expr: QueryExpr,
}

/// Turns a tagged question into a query expression.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    engine: Engine,
}

impl Dispatcher {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Interprets `tokens` with the first matching rule that accepts the match.
    ///
    /// `Ok(None)` means no rule understood the question; what to say then is
    /// the caller's business. A rule that fails to interpret its own match is
    /// reported for this question only.
    pub fn answer(&self, tokens: &[Token]) -> Result<Option<Answer>, DispatchError> {
        for found in self.engine.matches(tokens) {
            if let Some(answer) = interpret(found)? {
                return Ok(Some(answer));
            }
        }
        debug!(tokens = tokens.len(), "no interpretation");
        Ok(None)
    }

    /// Every interpretation in priority order, failures included.
    pub fn answers(&self, tokens: &[Token]) -> Vec<Result<Answer, DispatchError>> {
        self.engine
            .matches(tokens)
            .filter_map(|found| interpret(found).transpose())
            .collect()
    }
}

fn interpret(found: RuleMatch<'_, '_>) -> Result<Option<Answer>, DispatchError> {
    let rule = found.rule;
    match rule.interpret(&found.captures) {
        Ok(Some(expr)) => {
            debug!(rule = rule.name(), %expr, "interpreted");
            Ok(Some(Answer {
                rule: rule.id(),
                rule_name: rule.name().to_string(),
                expr,
            }))
        }
        Ok(None) => {
            debug!(rule = rule.name(), "rule declined its match");
            Ok(None)
        }
        Err(source) => {
            warn!(rule = rule.name(), error = %source, "interpretation failed");
            Err(DispatchError::Interpretation {
                rule: rule.id(),
                name: rule.name().to_string(),
                source,
            })
        }
    }
}
