// Graph elements: nodes, edges and default-attribute statements.

use crate::domain::attributes::{AttrValue, Attributes};
use crate::domain::id::Id;
use crate::domain::subgraph::Subgraph;

/// A node declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: Id,
    /// Raw `port[:compass]` text following the name, if any.
    port: Option<String>,
    attributes: Attributes,
}

impl Node {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            port: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attrs<I, K, V>(name: impl Into<Id>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        Self {
            name: name.into(),
            port: None,
            attributes: attrs.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &Id {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<Id>) {
        self.name = name.into();
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn set_port(&mut self, port: Option<String>) {
        self.port = port;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.set(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn add_style(&mut self, token: &str) {
        self.attributes.add_style(token);
    }

    pub fn style(&self) -> Option<String> {
        self.attributes.style()
    }
}

/// One end of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Node { id: Id, port: Option<String> },
    /// `a -> { b c }`: an edge to every node of the block.
    Subgraph(Box<Subgraph>),
}

impl Endpoint {
    pub fn node(id: impl Into<Id>) -> Self {
        Endpoint::Node {
            id: id.into(),
            port: None,
        }
    }

    pub fn with_port(id: impl Into<Id>, port: impl Into<String>) -> Self {
        Endpoint::Node {
            id: id.into(),
            port: Some(port.into()),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Endpoint::Node { id, .. } => Some(id),
            Endpoint::Subgraph(_) => None,
        }
    }

    pub fn port(&self) -> Option<&str> {
        match self {
            Endpoint::Node { port, .. } => port.as_deref(),
            Endpoint::Subgraph(_) => None,
        }
    }

    pub fn as_subgraph(&self) -> Option<&Subgraph> {
        match self {
            Endpoint::Subgraph(sub) => Some(sub),
            Endpoint::Node { .. } => None,
        }
    }

    /// Raw `id[:port]` text of a node endpoint.
    pub fn text(&self) -> Option<String> {
        match self {
            Endpoint::Node { id, port: None } => Some(id.as_str().to_string()),
            Endpoint::Node { id, port: Some(port) } => Some(format!("{id}:{port}")),
            Endpoint::Subgraph(_) => None,
        }
    }
}

impl PartialEq<str> for Endpoint {
    fn eq(&self, other: &str) -> bool {
        match self {
            Endpoint::Node { id, port: None } => id.as_str() == other,
            Endpoint::Node { id, port: Some(port) } => other
                .strip_prefix(id.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|rest| rest == port),
            Endpoint::Subgraph(_) => false,
        }
    }
}

impl PartialEq<&str> for Endpoint {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Endpoint::node(s)
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Endpoint::node(s)
    }
}

impl From<Id> for Endpoint {
    fn from(id: Id) -> Self {
        Endpoint::node(id)
    }
}

impl From<&Id> for Endpoint {
    fn from(id: &Id) -> Self {
        Endpoint::node(id.clone())
    }
}

impl From<i64> for Endpoint {
    fn from(n: i64) -> Self {
        Endpoint::node(n)
    }
}

impl From<Subgraph> for Endpoint {
    fn from(sub: Subgraph) -> Self {
        Endpoint::Subgraph(Box::new(sub))
    }
}

/// An edge between two endpoints. Endpoints are references by name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: Endpoint,
    destination: Endpoint,
    attributes: Attributes,
}

impl Edge {
    pub fn new(source: impl Into<Endpoint>, destination: impl Into<Endpoint>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn from_pair<A: Into<Endpoint>, B: Into<Endpoint>>((source, destination): (A, B)) -> Self {
        Self::new(source, destination)
    }

    pub fn with_attrs<I, K, V>(source: impl Into<Endpoint>, destination: impl Into<Endpoint>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        Self {
            source: source.into(),
            destination: destination.into(),
            attributes: attrs.into_iter().collect(),
        }
    }

    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.set(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn add_style(&mut self, token: &str) {
        self.attributes.add_style(token);
    }

    pub fn style(&self) -> Option<String> {
        self.attributes.style()
    }

    /// Same endpoints; for undirected graphs in either order.
    pub fn same_endpoints(&self, other: &Edge, directed: bool) -> bool {
        let forward = self.source == other.source && self.destination == other.destination;
        forward || (!directed && self.source == other.destination && self.destination == other.source)
    }

    pub(crate) fn connects(&self, src: &str, dst: &str) -> bool {
        self.source == src && self.destination == dst
    }
}

/// What a default-attribute statement applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultsKind {
    Node,
    Edge,
}

impl DefaultsKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DefaultsKind::Node => "node",
            DefaultsKind::Edge => "edge",
        }
    }
}

/// A positional `node [...]` or `edge [...]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    kind: DefaultsKind,
    attributes: Attributes,
}

impl Defaults {
    pub fn new(kind: DefaultsKind, attributes: Attributes) -> Self {
        Self { kind, attributes }
    }

    pub fn kind(&self) -> DefaultsKind {
        self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_style() {
        let mut node = Node::new("mynode");
        node.add_style("abc");
        assert_eq!(node.style().as_deref(), Some("abc"));
        node.add_style("def");
        node.add_style("ghi");
        assert_eq!(node.style().as_deref(), Some("abc,def,ghi"));
    }

    #[test]
    fn test_endpoint_compare_with_text() {
        assert!(Endpoint::node("a") == "a");
        assert!(Endpoint::with_port("a", "p1:n") == "a:p1:n");
        assert!(Endpoint::with_port("a", "p1") != "a");
        assert!(Endpoint::from(Subgraph::anonymous()) != "a");
    }

    #[test]
    fn test_same_endpoints() {
        let ab = Edge::new("a", "b");
        let ba = Edge::new("b", "a");
        assert!(ab.same_endpoints(&ba, false));
        assert!(!ab.same_endpoints(&ba, true));
        assert!(ab.same_endpoints(&Edge::new("a", "b"), true));
    }

    #[test]
    fn test_edge_from_pair() {
        let edge = Edge::from_pair(("D", "E"));
        assert!(*edge.source() == "D");
        assert!(*edge.destination() == "E");
        assert_eq!(edge.source().text().as_deref(), Some("D"));
    }
}
