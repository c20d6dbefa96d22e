use std::fmt;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use quaestor_protocol::QueryExpr;

pub const KEYWORD: &str = "keyword";
pub const TYPE: &str = "type";
pub const VALUE: &str = "value";
pub const DEFINITION: &str = "definition";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    /// An entity the query solves for.
    Variable(u32),
    /// A fixed text value (keyword, class name, literal).
    Value(String),
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphNode::Variable(n) => write!(f, "?x{}", n),
            GraphNode::Value(text) => write!(f, "{:?}", text),
        }
    }
}

/// A query expression lowered to variables joined by labelled edges.
///
/// This is the shape a renderer for a triple-pattern query language works
/// from; the head variable is what the question asks for.
pub struct QueryGraph {
    graph: Graph<GraphNode, String, Directed>,
    head: NodeIndex,
    next_variable: u32,
}

impl QueryGraph {
    pub fn lower(expr: &QueryExpr) -> Self {
        let mut lowered = Self {
            graph: Graph::new(),
            head: NodeIndex::new(0),
            next_variable: 0,
        };
        let head = lowered.variable();
        lowered.head = head;
        lowered.pin(expr, head);
        lowered
    }

    fn variable(&mut self) -> NodeIndex {
        let n = self.next_variable;
        self.next_variable += 1;
        self.graph.add_node(GraphNode::Variable(n))
    }

    fn value(&mut self, text: &str) -> NodeIndex {
        self.graph.add_node(GraphNode::Value(text.to_string()))
    }

    fn edge(&mut self, from: NodeIndex, label: &str, to: NodeIndex) {
        self.graph.add_edge(from, to, label.to_string());
    }

    /// Adds the constraints of `expr` with `node` as its head.
    fn pin(&mut self, expr: &QueryExpr, node: NodeIndex) {
        match expr {
            QueryExpr::Any => {}
            QueryExpr::KeywordEntity(text) => {
                let value = self.value(text);
                self.edge(node, KEYWORD, value);
            }
            QueryExpr::Typed(class) => {
                let value = self.value(class);
                self.edge(node, TYPE, value);
            }
            QueryExpr::Literal(text) => {
                let value = self.value(text);
                self.edge(node, VALUE, value);
            }
            QueryExpr::Relation { subject, predicate, object } => {
                self.pin(subject, node);
                let target = self.variable();
                self.pin(object, target);
                self.edge(node, predicate, target);
            }
            QueryExpr::Definition(subject) => {
                let described = self.variable();
                self.pin(subject, described);
                self.edge(described, DEFINITION, node);
            }
            QueryExpr::Conjunction(parts) => {
                for part in parts {
                    self.pin(part, node);
                }
            }
        }
    }

    pub fn head(&self) -> &GraphNode {
        &self.graph[self.head]
    }

    pub fn variable_count(&self) -> usize {
        self.next_variable as usize
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges as `(from, label, to)` in the order they were added.
    pub fn triples(&self) -> Vec<(&GraphNode, &str, &GraphNode)> {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], edge.weight().as_str(), &self.graph[edge.target()]))
            .collect()
    }

    /// Expose the underlying petgraph for renderers
    pub fn inner(&self) -> &Graph<GraphNode, String, Directed> {
        &self.graph
    }
}

impl fmt::Debug for QueryGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGraph")
            .field("head", self.head())
            .field("triples", &self.triples())
            .finish()
    }
}
