// Ports: how graphs leave the model, as DOT text or as rendered artifacts.

use crate::domain::format::OutputFormat;
use crate::error::Result;
use std::path::PathBuf;

pub mod dot_writer;

/// Program used when a request does not name one.
pub const DEFAULT_PROGRAM: &str = "dot";

/// One render job: which layout program, which `-T` format, and any custom
/// shape files the graph references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub program: String,
    pub format: OutputFormat,
    pub shape_files: Vec<PathBuf>,
}

impl RenderRequest {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            format,
            shape_files: Vec::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_shape_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.shape_files = files.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

/// Turns DOT bytes into a rendered artifact.
pub trait GraphRenderer {
    fn render(&self, dot: &[u8], request: &RenderRequest) -> Result<Vec<u8>>;
}
