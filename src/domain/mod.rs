// Graph object model for dotkit.

pub mod attributes;
pub mod builders;
pub mod charset;
pub mod element;
pub mod format;
pub mod graph;
pub mod id;
pub mod loose;
pub mod subgraph;
