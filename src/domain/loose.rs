//! Loosely typed boundary layer.
//!
//! The typed container methods (`add_node(Node)`, ...) cannot be handed the
//! wrong kind of value. Callers that start from dynamic data (scripts,
//! JSON, CLI input) go through [`Object`] and the `try_*` methods instead,
//! which reject mismatches with [`DotError::Type`].

use crate::domain::element::{Edge, Node};
use crate::domain::subgraph::Subgraph;
use crate::error::{DotError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Node(Node),
    Edge(Edge),
    Subgraph(Subgraph),
}

impl Object {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Text(_) => "string",
            Object::Integer(_) => "integer",
            Object::Float(_) => "float",
            Object::Bool(_) => "bool",
            Object::Node(_) => "node",
            Object::Edge(_) => "edge",
            Object::Subgraph(_) => "subgraph",
        }
    }

    pub(crate) fn into_text(self, expected: &'static str) -> Result<String> {
        match self {
            Object::Text(s) => Ok(s),
            other => Err(mismatch(expected, &other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Object) -> DotError {
    DotError::Type {
        expected,
        found: found.kind_name(),
    }
}

impl TryFrom<Object> for Node {
    type Error = DotError;

    fn try_from(obj: Object) -> Result<Self> {
        match obj {
            Object::Node(node) => Ok(node),
            other => Err(mismatch("node", &other)),
        }
    }
}

impl TryFrom<Object> for Edge {
    type Error = DotError;

    fn try_from(obj: Object) -> Result<Self> {
        match obj {
            Object::Edge(edge) => Ok(edge),
            other => Err(mismatch("edge", &other)),
        }
    }
}

impl TryFrom<Object> for Subgraph {
    type Error = DotError;

    fn try_from(obj: Object) -> Result<Self> {
        match obj {
            Object::Subgraph(sub) => Ok(sub),
            other => Err(mismatch("subgraph", &other)),
        }
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::Text(s.to_string())
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::Text(s)
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Object::Integer(n)
    }
}

impl From<i32> for Object {
    fn from(n: i32) -> Self {
        Object::Integer(n.into())
    }
}

impl From<f64> for Object {
    fn from(x: f64) -> Self {
        Object::Float(x)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Bool(b)
    }
}

impl From<Node> for Object {
    fn from(node: Node) -> Self {
        Object::Node(node)
    }
}

impl From<Edge> for Object {
    fn from(edge: Edge) -> Self {
        Object::Edge(edge)
    }
}

impl From<Subgraph> for Object {
    fn from(sub: Subgraph) -> Self {
        Object::Subgraph(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_from_object() {
        assert!(Node::try_from(Object::from(Node::new("a"))).is_ok());
        let err = Node::try_from(Object::from(1)).unwrap_err();
        assert!(matches!(err, DotError::Type { expected: "node", found: "integer" }));
        let err = Node::try_from(Object::from("a")).unwrap_err();
        assert!(matches!(err, DotError::Type { expected: "node", found: "string" }));
    }

    #[test]
    fn test_wrong_entity_kind() {
        let err = Edge::try_from(Object::from(Node::new("a"))).unwrap_err();
        assert!(matches!(err, DotError::Type { expected: "edge", found: "node" }));
        assert!(Subgraph::try_from(Object::from(Edge::new("a", "b"))).is_err());
    }
}
