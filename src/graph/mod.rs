//
//  mod.rs
//  graphgen
//

//! Structural graph: data model, identifiers, discovery, assembly and
//! statistics.

pub mod builder;
pub mod discovery;
pub mod id;
pub mod stats;
pub mod types;

pub use builder::{BuilderOptions, GraphBuilder};
pub use discovery::{find_files, DiscoveryOptions, DEFAULT_EXCLUDES};
pub use id::assign;
pub use stats::{summarize, summarize_top, ConnectedNode, Report};
pub use types::{
    Edge, EdgeKind, FileFragment, Graph, GraphDraft, GraphMetadata, Location, Node, NodeKind,
    NodeMetadata,
};
