use serde::Serialize;

use crate::domain::attributes::{AttrValue, Attributes};
use crate::domain::element::{Edge, Endpoint};
use crate::domain::graph::{Graph, GraphKind};
use crate::domain::subgraph::{Container, Statement, Subgraph};

/// JSON view of a parsed graph, as printed by `dotkit json`.
/// Statements are grouped by kind, so the view is output only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDto {
    pub name: Option<String>,
    pub kind: GraphKind,
    pub strict: bool,
    #[serde(flatten)]
    pub body: BodyDto,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BodyDto {
    pub attributes: Vec<AttributeDto>,
    pub defaults: Vec<DefaultsDto>,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
    pub subgraphs: Vec<SubgraphDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgraphDto {
    pub name: Option<String>,
    #[serde(flatten)]
    pub body: BodyDto,
}

/// `value` is `None` for implicit attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDto {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultsDto {
    pub kind: String,
    pub attributes: Vec<AttributeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDto {
    pub id: String,
    pub port: Option<String>,
    pub attributes: Vec<AttributeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeDto {
    pub from: EndpointDto,
    pub to: EndpointDto,
    pub attributes: Vec<AttributeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EndpointDto {
    /// Raw `id[:port]`.
    Node(String),
    Subgraph(Box<SubgraphDto>),
}

fn attributes(attrs: &Attributes) -> Vec<AttributeDto> {
    attrs
        .iter()
        .map(|(name, value)| AttributeDto {
            name: name.to_string(),
            value: match value {
                AttrValue::Text(id) => Some(id.as_str().to_string()),
                AttrValue::Implicit => None,
            },
        })
        .collect()
}

impl From<&Endpoint> for EndpointDto {
    fn from(endpoint: &Endpoint) -> Self {
        match endpoint {
            Endpoint::Subgraph(sub) => EndpointDto::Subgraph(Box::new(SubgraphDto::from(sub.as_ref()))),
            node => EndpointDto::Node(node.text().unwrap_or_default()),
        }
    }
}

impl From<&Edge> for EdgeDto {
    fn from(edge: &Edge) -> Self {
        EdgeDto {
            from: edge.source().into(),
            to: edge.destination().into(),
            attributes: attributes(edge.attributes()),
        }
    }
}

impl From<&Subgraph> for BodyDto {
    fn from(body: &Subgraph) -> Self {
        let mut dto = BodyDto {
            attributes: attributes(body.attributes()),
            ..BodyDto::default()
        };
        for statement in body.statements() {
            match statement {
                Statement::Node(n) => dto.nodes.push(NodeDto {
                    id: n.name().as_str().to_string(),
                    port: n.port().map(str::to_string),
                    attributes: attributes(n.attributes()),
                }),
                Statement::Edge(e) => dto.edges.push(e.into()),
                Statement::Subgraph(s) => dto.subgraphs.push(s.into()),
                Statement::Defaults(d) => dto.defaults.push(DefaultsDto {
                    kind: d.kind().keyword().to_string(),
                    attributes: attributes(d.attributes()),
                }),
            }
        }
        dto
    }
}

impl From<&Subgraph> for SubgraphDto {
    fn from(sub: &Subgraph) -> Self {
        SubgraphDto {
            name: sub.name().map(|n| n.as_str().to_string()),
            body: sub.into(),
        }
    }
}

impl From<&Graph> for GraphDto {
    fn from(graph: &Graph) -> Self {
        GraphDto {
            name: graph.name().map(|n| n.as_str().to_string()),
            kind: graph.kind(),
            strict: graph.is_strict(),
            body: graph.body().into(),
        }
    }
}
