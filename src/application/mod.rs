// Use cases tying files, parser, writer and renderer together.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::graph::Graph;
use crate::infrastructure::parser::Parser;
use crate::ports::dot_writer::DotWriter;
use crate::ports::{GraphRenderer, RenderRequest};

fn parse_path(parser: &Parser, path: &Path) -> Result<Vec<Graph>> {
    let parsed = parser
        .parse_file(path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(parsed.into_graphs())
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileReport<T> {
    pub path: PathBuf,
    pub result: Result<T>,
}

impl<T> FileReport<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parse and re-emit DOT in canonical form.
pub struct FormatUsecase<'a> {
    pub parser: &'a Parser,
    pub writer: &'a DotWriter,
}

impl<'a> FormatUsecase<'a> {
    /// Canonical text of every graph in `src`, in order.
    pub fn format_text(&self, src: &str) -> Result<String> {
        let graphs = self.parser.parse(src)?.into_graphs();
        Ok(graphs.iter().map(|g| self.writer.write_graph(g)).collect())
    }

    /// Canonical bytes, each graph encoded in its declared charset.
    fn emit(&self, graphs: &[Graph]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for graph in graphs {
            let bytes = graph.charset()?.encode(&self.writer.write_graph(graph))?;
            out.extend_from_slice(&bytes);
        }
        Ok(out)
    }

    /// Format one file; with `in_place` the file is rewritten.
    pub fn run(&self, path: &Path, in_place: bool) -> Result<Vec<u8>> {
        let graphs = parse_path(self.parser, path)?;
        let bytes = self
            .emit(&graphs)
            .with_context(|| format!("Failed to encode {}", path.display()))?;
        if in_place {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!(path = %path.display(), "rewrote file");
        }
        Ok(bytes)
    }

    /// Format files in parallel; reports keep the input order.
    pub fn run_batch(&self, paths: &[PathBuf], in_place: bool) -> Vec<FileReport<Vec<u8>>> {
        paths
            .par_iter()
            .map(|path| FileReport {
                path: path.clone(),
                result: self.run(path, in_place),
            })
            .collect()
    }
}

/// Parse only.
pub struct CheckUsecase<'a> {
    pub parser: &'a Parser,
}

impl<'a> CheckUsecase<'a> {
    /// Number of graphs in the file.
    pub fn run(&self, path: &Path) -> Result<usize> {
        Ok(parse_path(self.parser, path)?.len())
    }

    pub fn run_batch(&self, paths: &[PathBuf]) -> Vec<FileReport<usize>> {
        let reports: Vec<FileReport<usize>> = paths
            .par_iter()
            .map(|path| FileReport {
                path: path.clone(),
                result: self.run(path),
            })
            .collect();
        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        info!(files = reports.len(), failed, "check finished");
        reports
    }
}

/// Parse a file and hand it to a renderer.
pub struct RenderUsecase<'a> {
    pub parser: &'a Parser,
    pub renderer: &'a dyn GraphRenderer,
}

impl<'a> RenderUsecase<'a> {
    /// Render every graph of `input` and concatenate the artifacts.
    pub fn render(&self, input: &Path, request: &RenderRequest) -> Result<Vec<u8>> {
        let graphs = parse_path(self.parser, input)?;
        let mut out = Vec::new();
        for graph in &graphs {
            let bytes = graph
                .create(self.renderer, request)
                .with_context(|| format!("Failed to render {} with {}", input.display(), request.program))?;
            out.extend_from_slice(&bytes);
        }
        Ok(out)
    }

    pub fn run(&self, input: &Path, request: &RenderRequest, output: &Path) -> Result<usize> {
        if input == output {
            bail!("Refusing to overwrite the input file {}", input.display());
        }
        let bytes = self.render(input, request)?;
        std::fs::write(output, &bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(
            input = %input.display(),
            output = %output.display(),
            format = %request.format,
            bytes = bytes.len(),
            "rendered"
        );
        Ok(bytes.len())
    }
}
