// dotkit: Graphviz DOT object model, parser, canonical writer and render bridge.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use domain::attributes::{AttrValue, Attributes};
pub use domain::builders::{graph_from_adjacency_matrix, graph_from_edges, graph_from_incidence_matrix};
pub use domain::charset::Charset;
pub use domain::element::{Defaults, DefaultsKind, Edge, Endpoint, Node};
pub use domain::format::OutputFormat;
pub use domain::graph::{Graph, GraphKind};
pub use domain::id::Id;
pub use domain::loose::Object;
pub use domain::subgraph::{Container, Statement, Subgraph};
pub use error::{DotError, Result};
pub use infrastructure::graphviz::{ExecutableTable, GraphvizRenderer};
pub use infrastructure::parser::{parse, parse_bytes, parse_file, Parsed, Parser, ParserConfig};
pub use ports::dot_writer::{DotWriter, WriterConfig};
pub use ports::{GraphRenderer, RenderRequest};
