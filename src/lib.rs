//
//  lib.rs
//  graphgen
//

//! # graphgen
//!
//! Structural code graphs from source trees.
//!
//! graphgen walks a source tree, parses every matching file with
//! tree-sitter, and records files, classes and functions as nodes joined by
//! `contains` edges. Node ids are content-derived, so the same source always
//! yields the same ids.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graphgen::{summarize, BuilderOptions, GraphBuilder};
//!
//! let builder = GraphBuilder::new(BuilderOptions::new(".", "python")).unwrap();
//! let graph = builder.generate(&["**/*.py".to_string()]).unwrap();
//!
//! let report = summarize(&graph);
//! println!("{} nodes, {:?}", graph.node_count(), report.node_types);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod storage;

// Re-exports for convenience
pub use config::GraphgenConfig;
pub use error::{GraphgenError, Result};
pub use graph::{
    assign, summarize, BuilderOptions, Edge, EdgeKind, Graph, GraphBuilder, Node, NodeKind,
    Report,
};
pub use parser::SupportedLanguage;
pub use storage::{load_graph, save_graph, save_report};
