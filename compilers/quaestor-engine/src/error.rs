use quaestor_pattern::{Captured, Captures};
use quaestor_protocol::RuleId;
use thiserror::Error;

/// A rule's interpretation could not work with the captures it was given.
///
/// This is a defect in the rule (its pattern and its interpretation disagree),
/// never a property of the question being asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretationError {
    #[error("required capture '{0}' is missing")]
    MissingCapture(String),
    #[error("capture '{0}' matched no tokens")]
    EmptyCapture(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("rule '{name}' ({rule}) failed to interpret its match: {source}")]
    Interpretation {
        rule: RuleId,
        name: String,
        #[source]
        source: InterpretationError,
    },
}

/// Looks up a group that the rule's pattern guarantees to be present and non-empty.
pub fn required<'t>(captures: &Captures<'t>, name: &str) -> Result<Captured<'t>, InterpretationError> {
    let group = captures
        .get(name)
        .ok_or_else(|| InterpretationError::MissingCapture(name.to_string()))?;
    if group.is_empty() {
        return Err(InterpretationError::EmptyCapture(name.to_string()));
    }
    Ok(group)
}
