pub mod basic;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod graph;
pub mod registry;

pub use config::{EndCondition, EngineConfig};
pub use dispatcher::{Answer, Dispatcher};
pub use engine::{Engine, RuleMatch};
pub use error::{required, DispatchError, InterpretationError};
pub use graph::{GraphNode, QueryGraph};
pub use registry::{Interpretation, RegistryBuilder, Rule, RuleRegistry};
