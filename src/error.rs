//
//  error.rs
//  graphgen
//

//! Error types for graphgen.

use std::path::PathBuf;

/// Everything that can go wrong while generating or loading a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphgenError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to initialise {0} parser: {1}")]
    ParserInitError(String, String),

    #[error("tree-sitter returned no tree for {0}")]
    TreeSitterParseFailed(PathBuf),

    #[error("Invalid {kind} query for {language}: {message}")]
    QueryCompile {
        language: String,
        kind: String,
        message: String,
    },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("Edge {kind} {source_id} -> {target_id} references a node that is not in the graph")]
    DanglingEdge {
        source_id: String,
        target_id: String,
        kind: String,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for GraphgenError {
    fn from(e: toml::de::Error) -> Self {
        GraphgenError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GraphgenError>;
