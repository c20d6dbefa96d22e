use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Abstract semantic query, independent of any concrete query language.
///
/// Every node owns its children, so a tree is always acyclic and is built
/// fresh for each interpreted question. The head of an expression is the
/// entity it describes: `Relation` describes its subject, `Definition` the
/// definition text of its subject, `Conjunction` the one entity all its
/// parts constrain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueryExpr {
    /// Unconstrained entity.
    Any,
    /// Entity found by keyword (label) lookup.
    KeywordEntity(String),
    /// Entity that is an instance of the named class.
    Typed(String),
    /// A literal data value.
    Literal(String),
    /// `subject --predicate--> object`; the head is the subject.
    Relation {
        subject: Box<QueryExpr>,
        predicate: String,
        object: Box<QueryExpr>,
    },
    /// The definition (abstract, description) of the subject.
    Definition(Box<QueryExpr>),
    /// All parts constrain the same head entity.
    Conjunction(Vec<QueryExpr>),
}

pub fn any() -> QueryExpr {
    QueryExpr::Any
}

pub fn keyword(text: impl Into<String>) -> QueryExpr {
    QueryExpr::KeywordEntity(text.into())
}

pub fn typed(class: impl Into<String>) -> QueryExpr {
    QueryExpr::Typed(class.into())
}

pub fn literal(value: impl Into<String>) -> QueryExpr {
    QueryExpr::Literal(value.into())
}

pub fn relation(subject: QueryExpr, predicate: impl Into<String>, object: QueryExpr) -> QueryExpr {
    QueryExpr::Relation {
        subject: Box::new(subject),
        predicate: predicate.into(),
        object: Box::new(object),
    }
}

pub fn definition(subject: QueryExpr) -> QueryExpr {
    QueryExpr::Definition(Box::new(subject))
}

/// Empty input yields `Any` (nothing constrained); a single part is returned as is.
pub fn conjunction(parts: impl IntoIterator<Item = QueryExpr>) -> QueryExpr {
    parts.into_iter().fold(QueryExpr::Any, QueryExpr::and)
}

impl QueryExpr {
    /// Conjoins two expressions, flattening nested conjunctions and dropping `Any`.
    pub fn and(self, other: QueryExpr) -> QueryExpr {
        match (self, other) {
            (QueryExpr::Any, e) | (e, QueryExpr::Any) => e,
            (QueryExpr::Conjunction(mut left), QueryExpr::Conjunction(right)) => {
                left.extend(right);
                QueryExpr::Conjunction(left)
            }
            (QueryExpr::Conjunction(mut left), e) => {
                left.push(e);
                QueryExpr::Conjunction(left)
            }
            (e, QueryExpr::Conjunction(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(e);
                parts.extend(right);
                QueryExpr::Conjunction(parts)
            }
            (a, b) => QueryExpr::Conjunction(alloc::vec![a, b]),
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            QueryExpr::Any
            | QueryExpr::KeywordEntity(_)
            | QueryExpr::Typed(_)
            | QueryExpr::Literal(_) => 1,
            QueryExpr::Relation { subject, object, .. } => 1 + subject.size() + object.size(),
            QueryExpr::Definition(subject) => 1 + subject.size(),
            QueryExpr::Conjunction(parts) => 1 + parts.iter().map(QueryExpr::size).sum::<usize>(),
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryExpr::Any => write!(f, "any"),
            QueryExpr::KeywordEntity(text) => write!(f, "keyword({:?})", text),
            QueryExpr::Typed(class) => write!(f, "typed({:?})", class),
            QueryExpr::Literal(value) => write!(f, "literal({:?})", value),
            QueryExpr::Relation { subject, predicate, object } => {
                write!(f, "relation({}, {:?}, {})", subject, predicate, object)
            }
            QueryExpr::Definition(subject) => write!(f, "definition({})", subject),
            QueryExpr::Conjunction(parts) => {
                write!(f, "and(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}
