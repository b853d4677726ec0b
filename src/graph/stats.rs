//
//  stats.rs
//  graphgen
//

//! Summary statistics over a finished graph: kind histograms and a
//! connectivity ranking. Nothing here mutates the graph.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use super::types::{EdgeKind, Graph, NodeKind};

/// Entries kept in `top_connected` unless the caller asks otherwise.
pub const DEFAULT_TOP: usize = 5;

/// A node in the connectivity ranking, resolved back to its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub connections: usize,
}

/// Statistics derived from one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub node_types: BTreeMap<NodeKind, usize>,
    pub edge_types: BTreeMap<EdgeKind, usize>,
    /// Edges touching each node id, in order of first appearance in the
    /// edge list (source before target).
    #[serde(serialize_with = "ordered_map")]
    pub connectivity: Vec<(String, usize)>,
    pub top_connected: Vec<ConnectedNode>,
}

impl Report {
    pub fn connections(&self, id: &str) -> Option<usize> {
        self.connectivity
            .iter()
            .find(|(node_id, _)| node_id == id)
            .map(|(_, count)| *count)
    }
}

fn ordered_map<S: Serializer>(entries: &[(String, usize)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (id, count) in entries {
        map.serialize_entry(id, count)?;
    }
    map.end()
}

/// Summarise `graph` with the default ranking size.
pub fn summarize(graph: &Graph) -> Report {
    summarize_top(graph, DEFAULT_TOP)
}

/// Summarise `graph`, keeping the `top` most connected nodes.
pub fn summarize_top(graph: &Graph, top: usize) -> Report {
    let mut node_types = BTreeMap::new();
    for node in graph.nodes() {
        *node_types.entry(node.kind).or_insert(0) += 1;
    }

    let mut edge_types = BTreeMap::new();
    let mut connectivity: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for edge in graph.edges() {
        *edge_types.entry(edge.kind).or_insert(0) += 1;

        for id in [edge.source.as_str(), edge.target.as_str()] {
            match slots.get(id) {
                Some(&slot) => connectivity[slot].1 += 1,
                None => {
                    slots.insert(id, connectivity.len());
                    connectivity.push((id.to_string(), 1));
                }
            }
        }
    }

    // `sort_by` is stable: ties keep first-appearance order.
    let mut ranked: Vec<&(String, usize)> = connectivity.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let top_connected = ranked
        .into_iter()
        .filter_map(|(id, connections)| {
            let node = graph.node(id)?;
            Some(ConnectedNode {
                id: id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                path: node.path.clone(),
                connections: *connections,
            })
        })
        .take(top)
        .collect();

    Report {
        node_types,
        edge_types,
        connectivity,
        top_connected,
    }
}
