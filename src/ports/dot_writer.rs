//! DOT Writer
//!
//! Serializes the element model back to canonical DOT text. Output is a
//! pure function of the model and the [`WriterConfig`].

use crate::domain::attributes::{AttrValue, Attributes};
use crate::domain::element::{Defaults, Edge, Endpoint, Node};
use crate::domain::graph::{Graph, GraphKind};
use crate::domain::id::Id;
use crate::domain::subgraph::{Container, Statement, Subgraph};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Emit attributes sorted by name instead of in insertion order.
    pub sort_attributes: bool,
    pub attribute_separator: String,
    /// Repeated once per nesting level in front of each statement.
    pub indent: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            sort_attributes: false,
            attribute_separator: ", ".to_string(),
            indent: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DotWriter {
    config: WriterConfig,
}

impl DotWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn write_graph(&self, graph: &Graph) -> String {
        let mut out = String::new();
        if graph.is_strict() {
            out.push_str("strict ");
        }
        out.push_str(graph.kind().keyword());
        if let Some(name) = graph.name() {
            out.push(' ');
            out.push_str(&name.to_dot());
        }
        out.push_str(" {\n");
        self.write_body(&mut out, graph.body(), graph.kind(), graph.simplify(), 1);
        out.push_str("}\n");
        out
    }

    /// A standalone node line, without trailing newline. Empty for a node
    /// named after a keyword that carries no attributes.
    pub fn write_node(&self, node: &Node) -> String {
        let name = if node.name().is_keyword() {
            node.name().as_str().into()
        } else {
            node.name().to_dot()
        };
        if node.name().is_keyword() && node.attributes().is_empty() {
            return String::new();
        }

        let mut out = name.into_owned();
        if let Some(port) = node.port() {
            out.push(':');
            out.push_str(port);
        }
        if !node.attributes().is_empty() {
            out.push(' ');
            out.push_str(&self.attr_list(node.attributes()));
        }
        out.push(';');
        out
    }

    /// An edge line using the operator of `kind`.
    pub fn write_edge(&self, edge: &Edge, kind: GraphKind) -> String {
        let mut out = format!(
            "{} {} {}",
            self.endpoint(edge.source(), kind),
            kind.edge_op(),
            self.endpoint(edge.destination(), kind)
        );
        if !edge.attributes().is_empty() {
            out.push(' ');
            out.push_str(&self.attr_list(edge.attributes()));
        }
        out.push(';');
        out
    }

    pub fn write_defaults(&self, defaults: &Defaults) -> String {
        format!("{} {};", defaults.kind().keyword(), self.attr_list(defaults.attributes()))
    }

    /// A subgraph block ending in `}` (no trailing newline).
    pub fn write_subgraph(&self, subgraph: &Subgraph, kind: GraphKind) -> String {
        self.subgraph_block(subgraph, kind, false, 1)
    }

    fn subgraph_block(&self, subgraph: &Subgraph, kind: GraphKind, simplify: bool, depth: usize) -> String {
        let mut out = match subgraph.name() {
            Some(name) => format!("subgraph {} {{\n", name.to_dot()),
            None => "{\n".to_string(),
        };
        self.write_body(&mut out, subgraph, kind, simplify, depth);
        out.push_str(&self.config.indent.repeat(depth.saturating_sub(1)));
        out.push('}');
        out
    }

    fn write_body(&self, out: &mut String, body: &Subgraph, kind: GraphKind, simplify: bool, depth: usize) {
        let indent = self.config.indent.repeat(depth);

        for (key, value) in self.ordered(body.attributes()) {
            out.push_str(&indent);
            match value {
                AttrValue::Text(id) => {
                    out.push_str(&key_to_dot(key));
                    out.push('=');
                    out.push_str(&id.to_dot());
                    out.push(';');
                }
                AttrValue::Implicit => {
                    out.push_str("graph [");
                    out.push_str(&key_to_dot(key));
                    out.push_str("];");
                }
            }
            out.push('\n');
        }

        let mut seen: Vec<&Edge> = Vec::new();
        for statement in body.statements() {
            let line = match statement {
                Statement::Node(node) => self.write_node(node),
                Statement::Edge(edge) => {
                    if simplify {
                        if seen.iter().any(|e| e.same_endpoints(edge, kind.is_directed())) {
                            continue;
                        }
                        seen.push(edge);
                    }
                    self.write_edge(edge, kind)
                }
                Statement::Subgraph(sub) => self.subgraph_block(sub, kind, simplify, depth + 1),
                Statement::Defaults(defaults) => self.write_defaults(defaults),
            };
            if line.is_empty() {
                continue;
            }
            out.push_str(&indent);
            out.push_str(&line);
            out.push('\n');
        }
    }

    fn endpoint(&self, endpoint: &Endpoint, kind: GraphKind) -> String {
        match endpoint {
            Endpoint::Node { id, port: None } => id.to_dot().into_owned(),
            Endpoint::Node { id, port: Some(port) } => format!("{}:{}", id.to_dot(), port),
            Endpoint::Subgraph(sub) => self.subgraph_block(sub, kind, false, 1),
        }
    }

    fn ordered<'a>(&self, attrs: &'a Attributes) -> Vec<(&'a str, &'a AttrValue)> {
        let mut pairs = attrs.to_pairs();
        if self.config.sort_attributes {
            pairs.sort_by(|a, b| a.0.cmp(b.0));
        }
        pairs
    }

    fn attr_list(&self, attrs: &Attributes) -> String {
        let items: Vec<String> = self
            .ordered(attrs)
            .into_iter()
            .map(|(key, value)| match value {
                AttrValue::Text(id) => format!("{}={}", key_to_dot(key), id.to_dot()),
                AttrValue::Implicit => key_to_dot(key),
            })
            .collect();
        format!("[{}]", items.join(&self.config.attribute_separator))
    }
}

fn key_to_dot(key: &str) -> String {
    Id::new(key).to_dot().into_owned()
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&DotWriter::default().write_graph(self))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&DotWriter::default().write_node(self))
    }
}

/// Uses the undirected operator; the edge alone does not know its graph.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&DotWriter::default().write_edge(self, GraphKind::default()))
    }
}
