//! Output formats understood by the Graphviz `-T` flag.

use crate::error::DotError;
use std::str::FromStr;

pub const FORMATS: &[&str] = &[
    "canon", "cmap", "cmapx", "cmapx_np", "dia", "dot", "fig", "gd", "gd2", "gif", "hpgl", "imap",
    "imap_np", "ismap", "jpe", "jpeg", "jpg", "json", "json0", "mif", "mp", "pcl", "pdf", "pic",
    "plain", "plain-ext", "png", "ps", "ps2", "svg", "svgz", "tif", "tiff", "vml", "vmlz", "vrml",
    "vtx", "wbmp", "webp", "xdot", "xdot_json", "xlib",
];

/// A validated `-T` format token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputFormat(String);

impl OutputFormat {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `-T<format>` argument.
    pub fn flag(&self) -> String {
        format!("-T{}", self.0)
    }
}

impl FromStr for OutputFormat {
    type Err = DotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if FORMATS.contains(&lower.as_str()) {
            Ok(OutputFormat(lower))
        } else {
            Err(DotError::UnknownFormat(s.to_string()))
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat("ps".to_string())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
