// Infrastructure: text in (lexer, parser), processes out (graphviz), and
// the runtime plumbing around them.

pub mod concurrency;
pub mod config;
pub mod graphviz;
pub mod lexer;
pub mod parser;

pub use graphviz::{ExecutableTable, GraphvizRenderer};
pub use parser::{parse, parse_bytes, parse_file, Parsed, Parser, ParserConfig};
