//! Root graph ("Dot").

use crate::domain::charset::Charset;
use crate::domain::element::Edge;
use crate::domain::format::OutputFormat;
use crate::domain::id::Id;
use crate::domain::subgraph::{Container, Subgraph};
use crate::error::{DotError, Result};
use crate::ports::{GraphRenderer, RenderRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Name given to graphs built without one.
pub const DEFAULT_GRAPH_NAME: &str = "G";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    #[default]
    Graph,
    Digraph,
}

impl GraphKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            GraphKind::Graph => "graph",
            GraphKind::Digraph => "digraph",
        }
    }

    pub fn edge_op(&self) -> &'static str {
        match self {
            GraphKind::Graph => "--",
            GraphKind::Digraph => "->",
        }
    }

    pub fn is_directed(&self) -> bool {
        matches!(self, GraphKind::Digraph)
    }
}

impl FromStr for GraphKind {
    type Err = DotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "graph" => Ok(GraphKind::Graph),
            "digraph" => Ok(GraphKind::Digraph),
            _ => Err(DotError::Type {
                expected: "\"graph\" or \"digraph\"",
                found: "string",
            }),
        }
    }
}

impl std::fmt::Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A top-level graph: a body plus kind, strictness and output flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    kind: GraphKind,
    strict: bool,
    simplify: bool,
    body: Subgraph,
}

impl Graph {
    pub fn new(name: impl Into<Id>, kind: GraphKind) -> Self {
        Self {
            kind,
            strict: false,
            simplify: false,
            body: Subgraph::new(name),
        }
    }

    /// `graph { ... }` / `digraph { ... }` without a name.
    pub fn anonymous(kind: GraphKind) -> Self {
        Self {
            kind,
            strict: false,
            simplify: false,
            body: Subgraph::anonymous(),
        }
    }

    pub fn digraph(name: impl Into<Id>) -> Self {
        Self::new(name, GraphKind::Digraph)
    }

    pub fn name(&self) -> Option<&Id> {
        self.body.name()
    }

    pub fn set_name(&mut self, name: Option<Id>) {
        self.body.set_name(name);
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: GraphKind) {
        self.kind = kind;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Whether serialization skips edges repeating an earlier one.
    pub fn simplify(&self) -> bool {
        self.simplify
    }

    pub fn set_simplify(&mut self, simplify: bool) {
        self.simplify = simplify;
    }

    /// Charset from the `charset` graph attribute, UTF-8 when unset.
    pub fn charset(&self) -> Result<Charset> {
        match self.attributes().get_text("charset") {
            Some(label) => label.parse(),
            None => Ok(Charset::default()),
        }
    }

    pub fn set_charset(&mut self, label: &str) -> Result<()> {
        let charset: Charset = label.parse()?;
        self.attributes_mut().set("charset", charset.label());
        Ok(())
    }

    /// Canonical text encoded in the graph's charset.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.charset()?.encode(&self.to_string())
    }

    /// Render through `renderer` and return the raw output bytes.
    pub fn create(&self, renderer: &dyn GraphRenderer, request: &RenderRequest) -> Result<Vec<u8>> {
        renderer.render(&self.to_bytes()?, request)
    }

    /// Shorthand for rendering with the `dot` program.
    pub fn create_format(&self, renderer: &dyn GraphRenderer, format: &str) -> Result<Vec<u8>> {
        let request = RenderRequest::new(OutputFormat::from_str(format)?);
        self.create(renderer, &request)
    }

    /// Render and write the output to `path`.
    pub fn write(&self, path: &Path, renderer: &dyn GraphRenderer, request: &RenderRequest) -> Result<()> {
        let bytes = self.create(renderer, request)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Write the canonical DOT text itself to `path`.
    pub fn write_dot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_NAME, GraphKind::Graph)
    }
}

impl Container for Graph {
    fn body(&self) -> &Subgraph {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Subgraph {
        &mut self.body
    }

    /// Strict graphs merge an edge into an existing one with the same
    /// endpoints instead of adding a duplicate.
    fn add_edge(&mut self, edge: Edge) {
        if self.strict {
            let directed = self.kind.is_directed();
            self.body.merge_edge(edge, directed);
        } else {
            self.body.add_edge(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::Node;

    #[test]
    fn test_keep_graph_type() {
        let g = Graph::new("Test", GraphKind::Graph);
        assert_eq!(g.kind(), GraphKind::Graph);
        let g = Graph::new("Test", GraphKind::Digraph);
        assert_eq!(g.kind(), GraphKind::Digraph);
        assert_eq!("DIGRAPH".parse::<GraphKind>().unwrap(), GraphKind::Digraph);
        assert!("tree".parse::<GraphKind>().is_err());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Graph::default().name().unwrap(), DEFAULT_GRAPH_NAME);
        assert!(Graph::anonymous(GraphKind::Graph).name().is_none());
    }

    #[test]
    fn test_strict_merges_duplicate_edges() {
        let mut g = Graph::default();
        g.set_strict(true);
        g.add_edge(Edge::with_attrs("a", "b", [("color", "red")]));
        g.add_edge(Edge::with_attrs("b", "a", [("weight", "3")]));
        assert_eq!(g.get_edges().len(), 1);
        assert_eq!(g.get_edges()[0].attributes().get_text("weight"), Some("3"));

        let mut d = Graph::digraph("D");
        d.set_strict(true);
        d.add_edge(Edge::new("a", "b"));
        d.add_edge(Edge::new("b", "a"));
        d.add_edge(Edge::new("a", "b"));
        assert_eq!(d.get_edges().len(), 2);
    }

    #[test]
    fn test_non_strict_keeps_duplicates() {
        let mut g = Graph::default();
        g.add_edge(Edge::new("a", "b"));
        g.add_edge(Edge::new("a", "b"));
        assert_eq!(g.get_edges().len(), 2);
    }

    #[test]
    fn test_charset_attribute() {
        let mut g = Graph::default();
        assert_eq!(g.charset().unwrap(), Charset::Utf8);
        g.set_charset("ISO-8859-1").unwrap();
        assert_eq!(g.charset().unwrap(), Charset::Latin1);
        assert_eq!(g.attributes().get_text("charset"), Some("latin1"));
        assert!(g.set_charset("klingon").is_err());
    }

    #[test]
    fn test_to_bytes_latin1() {
        let mut g = Graph::default();
        g.set_charset("latin1").unwrap();
        g.add_node(Node::new("\"café\""));
        let bytes = g.to_bytes().unwrap();
        assert!(bytes.windows(5).any(|w| w == b"caf\xe9\""));

        g.add_node(Node::new("\"日本\""));
        assert!(matches!(g.to_bytes(), Err(DotError::Encode { .. })));
    }
}
