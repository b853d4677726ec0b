//
//  config.rs
//  graphgen
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GraphgenError, Result};
use crate::graph::discovery::default_excludes;
use crate::graph::stats::DEFAULT_TOP;
use crate::graph::BuilderOptions;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "graphgen.toml";

/// Top-level graphgen configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphgenConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root directory to scan, relative to the config file's directory.
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Glob patterns; empty means the language's defaults.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Walker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Directory names never descended into.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub link_lexical_parents: bool,
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Entries in the connectivity ranking.
    #[serde(default = "default_top_connected")]
    pub top_connected: usize,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_language() -> String {
    "python".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> String {
    "code_graph.json".to_string()
}

fn default_top_connected() -> usize {
    DEFAULT_TOP
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            language: default_language(),
            patterns: Vec::new(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclude: default_excludes(),
            respect_gitignore: true,
            include_hidden: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            top_connected: default_top_connected(),
        }
    }
}

impl GraphgenConfig {
    /// Load config from a TOML file. A missing file yields the defaults;
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(GraphgenError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve the project root relative to `base` (the config file's
    /// directory). Absolute roots are used as is.
    pub fn resolve_root(&self, base: &Path) -> PathBuf {
        base.join(&self.project.root)
    }

    pub fn resolve_output(&self, base: &Path) -> PathBuf {
        base.join(&self.output.path)
    }

    /// Builder options for this config, with the root resolved against `base`.
    pub fn builder_options(&self, base: &Path) -> BuilderOptions {
        self.builder_options_at(self.resolve_root(base))
    }

    /// Builder options scanning `root` instead of the configured root.
    pub fn builder_options_at(&self, root: PathBuf) -> BuilderOptions {
        BuilderOptions {
            root,
            language: self.project.language.clone(),
            exclude: self.discovery.exclude.clone(),
            respect_gitignore: self.discovery.respect_gitignore,
            include_hidden: self.discovery.include_hidden,
            parallel: self.extraction.parallel,
            link_lexical_parents: self.extraction.link_lexical_parents,
        }
    }
}
