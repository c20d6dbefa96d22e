//! A small general-knowledge rule set.

use quaestor_pattern::matcher::{lemma, pos, pos_prefix};
use quaestor_pattern::{Captures, PatternError};
use quaestor_protocol::query::{any, definition, keyword, relation, typed};

use crate::error::required;
use crate::registry::{Interpretation, RegistryBuilder, RuleRegistry};

/// "What is a car?" → definition of the thing named by the noun.
fn what_is(captures: &Captures<'_>) -> Interpretation {
    let target = required(captures, "target")?;
    Ok(Some(definition(keyword(target.text()))))
}

/// "What is the capital of France?" → the entity related to France by `capitalOf`.
fn property_of(captures: &Captures<'_>) -> Interpretation {
    let property = required(captures, "property")?;
    let subject = required(captures, "subject")?;
    let predicate = format!("{}Of", property.lemmas().replace(' ', "_"));
    Ok(Some(relation(any(), predicate, keyword(subject.text()))))
}

/// "Who is Ada Lovelace?" → definition of the person with that name.
fn who_is(captures: &Captures<'_>) -> Interpretation {
    let name = required(captures, "name")?;
    Ok(Some(definition(typed("Person").and(keyword(name.text())))))
}

/// Adds the basic rules to `builder`, most specific forms first.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), PatternError> {
    let question_mark = || pos(".").optional();

    builder.register_named(
        "what-is",
        lemma("what")
            .then(lemma("be"))
            .then(pos("DT").optional())
            .then(pos("NN").group("target"))
            .then(question_mark()),
        what_is,
    )?;

    builder.register_named(
        "property-of",
        lemma("what")
            .then(lemma("be"))
            .then(pos("DT"))
            .then(pos_prefix("NN").plus().group("property"))
            .then(lemma("of"))
            .then(pos("DT").optional())
            .then(pos_prefix("NN").plus().group("subject"))
            .then(question_mark()),
        property_of,
    )?;

    builder.register_named(
        "who-is",
        lemma("who")
            .then(lemma("be"))
            .then(pos("NNP").plus().group("name"))
            .then(question_mark()),
        who_is,
    )?;

    Ok(())
}

pub fn registry() -> Result<RuleRegistry, PatternError> {
    let mut builder = RegistryBuilder::new();
    register(&mut builder)?;
    Ok(builder.build())
}
