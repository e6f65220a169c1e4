//! dotkit.toml
//!
//! ```toml
//! [executables]
//! dot = "/usr/local/bin/dot"
//!
//! [render]
//! timeout_secs = 30
//!
//! [writer]
//! sort_attributes = false
//! attribute_separator = ", "
//!
//! [parser]
//! inherit_defaults = true
//! ```
//!
//! Every section is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::graphviz::{ExecutableTable, GraphvizRenderer};
use super::parser::ParserConfig;
use crate::ports::dot_writer::WriterConfig;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "dotkit.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Overrides on top of the `PATH` defaults.
    pub executables: BTreeMap<String, PathBuf>,
    pub render: RenderConfig,
    pub writer: WriterConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Kill the renderer after this many seconds. Unset means wait forever.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid dotkit configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Load `path` if given, else `./dotkit.toml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using local config");
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn executable_table(&self) -> ExecutableTable {
        let mut table = ExecutableTable::from_path();
        table.extend(self.executables.clone());
        table
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.render.timeout_secs.map(Duration::from_secs)
    }

    pub fn renderer(&self) -> GraphvizRenderer {
        GraphvizRenderer::new(self.executable_table()).with_timeout(self.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.parser.inherit_defaults);
        assert_eq!(config.writer.attribute_separator, ", ");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
            [executables]
            dot = "/usr/local/bin/dot"

            [render]
            timeout_secs = 30

            [writer]
            sort_attributes = true

            [parser]
            inherit_defaults = false
            "#,
        )
        .unwrap();

        let table = config.executable_table();
        assert_eq!(table.get("dot"), Some(Path::new("/usr/local/bin/dot")));
        assert_eq!(table.get("neato"), Some(Path::new("neato")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.writer.sort_attributes);
        assert_eq!(config.writer.attribute_separator, ", ");
        assert!(!config.parser.inherit_defaults);
        assert_eq!(config.renderer().timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(Config::from_toml_str("[layout]\nengine = \"dot\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[render]\ntimeout_secs = 5\n").unwrap();
        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.render.timeout_secs, Some(5));

        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Cannot read config file"));
    }
}
