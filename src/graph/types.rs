//
//  types.rs
//  graphgen
//

//! Core types for the structural graph.
//!
//! Defines node kinds, edge kinds, and the containers that hold them.
//! A graph is assembled in a [`GraphDraft`] (append-only) and frozen into a
//! read-only [`Graph`] once every file has been processed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::warn;

use super::id::NodeIdentity;
use crate::error::{GraphgenError, Result};

/// Version of the serialised graph document.
pub const SCHEMA_VERSION: u32 = 1;

/// The kind of a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A source file.
    File,
    /// A class-like declaration (class, struct, enum, trait).
    Class,
    /// A free function.
    Function,
    /// A function declared directly inside a class-like scope.
    Method,
    /// An interface declaration (TypeScript).
    Interface,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Class => "class",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Interface => "interface",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of an edge (relationship) in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// A file or declaration holds a declaration.
    Contains,
    /// A file imports another module.
    Imports,
    /// A declaration calls another declaration.
    Calls,
    /// A class inherits from another class.
    Inherits,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::Imports => "imports",
            EdgeKind::Calls => "calls",
            EdgeKind::Inherits => "inherits",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declaration starts: 1-based line, 0-based column.
///
/// File nodes use `(0, 0)`, meaning "the whole file".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const WHOLE_FILE: Location = Location { line: 0, column: 0 };
}

/// Typed node metadata. Only file nodes populate it today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Language tag of a file node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Raw import specifiers of a file node, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
}

impl NodeMetadata {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.imports.is_empty()
    }
}

/// A declaration or file unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Declared identifier, or the base name for file nodes.
    pub name: String,
    /// Path relative to the scanned root, forward slashes.
    pub path: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "NodeMetadata::is_empty")]
    pub metadata: NodeMetadata,
}

impl Node {
    /// Create the file node for `path` (already root-relative and normalised).
    pub fn file(path: &str, language: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        let id = NodeIdentity {
            kind: NodeKind::File,
            path,
            name: &name,
            start_line: 0,
        }
        .id();

        Self {
            id,
            kind: NodeKind::File,
            name,
            path: path.to_string(),
            location: Location::WHOLE_FILE,
            metadata: NodeMetadata {
                language: Some(language.to_string()),
                imports: Vec::new(),
            },
        }
    }

    /// Create a declaration node starting at the 0-based `(row, column)`.
    pub fn declaration(kind: NodeKind, path: &str, name: &str, row: usize, column: usize) -> Self {
        let id = NodeIdentity {
            kind,
            path,
            name,
            start_line: row,
        }
        .id();

        Self {
            id,
            kind,
            name: name.to_string(),
            path: path.to_string(),
            location: Location {
                line: row + 1,
                column,
            },
            metadata: NodeMetadata::default(),
        }
    }
}

/// A directed structural relationship between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: &str, target: &str, kind: EdgeKind) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }

    pub fn contains(source: &str, target: &str) -> Self {
        Self::new(source, target, EdgeKind::Contains)
    }
}

/// Run-level information stored next to the nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub generated: DateTime<Utc>,
    pub language: String,
    pub root_path: String,
    pub files_processed: usize,
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(default)]
    pub files_failed: usize,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl GraphMetadata {
    /// Metadata for a run starting now. Counts are filled in later.
    pub fn new(language: &str, root_path: &str) -> Self {
        Self {
            generated: Utc::now(),
            language: language.to_string(),
            root_path: root_path.to_string(),
            files_processed: 0,
            node_count: 0,
            edge_count: 0,
            files_failed: 0,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Nodes and edges extracted from a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFragment {
    /// Root-relative path of the file.
    pub path: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// An append-only graph under construction.
#[derive(Debug, Default)]
pub struct GraphDraft {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: HashSet<String>,
}

impl GraphDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Returns `false` (and keeps the first node) if its id
    /// is already present.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.ids.contains(&node.id) {
            warn!(
                id = %node.id,
                kind = %node.kind,
                name = %node.name,
                path = %node.path,
                "duplicate node id, dropping node"
            );
            return false;
        }
        self.ids.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    /// Append an edge. Endpoints are checked when the draft is frozen.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Append everything extracted from one file.
    ///
    /// Edges pointing at a node that was dropped as a duplicate are dropped
    /// too, so one declaration never receives two containment edges.
    pub fn append(&mut self, fragment: FileFragment) {
        let mut dropped: HashSet<String> = HashSet::new();
        for node in fragment.nodes {
            let id = node.id.clone();
            if !self.add_node(node) {
                dropped.insert(id);
            }
        }
        for edge in fragment.edges {
            if dropped.contains(&edge.target) {
                continue;
            }
            self.add_edge(edge);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check that every edge endpoint is a known node id.
    pub fn validate(&self) -> Result<()> {
        for edge in &self.edges {
            if !self.ids.contains(&edge.source) || !self.ids.contains(&edge.target) {
                return Err(GraphgenError::DanglingEdge {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    kind: edge.kind.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate and turn the draft into a read-only graph.
    /// Node and edge counts in `metadata` are overwritten.
    pub fn freeze(self, mut metadata: GraphMetadata) -> Result<Graph> {
        self.validate()?;

        metadata.node_count = self.nodes.len();
        metadata.edge_count = self.edges.len();

        let index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
            metadata,
            index,
        })
    }
}

/// A completed, read-only graph.
///
/// Nodes keep discovery order. The serialised form is the output document:
/// `{ "nodes": [...], "edges": [...], "metadata": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphDocument")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metadata: GraphMetadata,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// All file nodes, in discovery order.
    pub fn files(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::File)
    }
}

/// Deserialisation shape of [`Graph`]. Loading goes back through
/// [`GraphDraft::freeze`] so a loaded graph obeys the same invariants.
#[derive(Deserialize)]
struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metadata: GraphMetadata,
}

impl TryFrom<GraphDocument> for Graph {
    type Error = GraphgenError;

    fn try_from(doc: GraphDocument) -> Result<Self> {
        let mut draft = GraphDraft::new();
        for node in doc.nodes {
            if !draft.add_node(node) {
                return Err(GraphgenError::Config(
                    "graph document contains duplicate node ids".to_string(),
                ));
            }
        }
        for edge in doc.edges {
            draft.add_edge(edge);
        }
        draft.freeze(doc.metadata)
    }
}
