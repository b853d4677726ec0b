//
//  fs.rs
//  graphgen
//

//! JSON persistence for graphs and reports.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::graph::{Graph, Report};

/// Write `value` as pretty JSON to `path`.
///
/// Writes to a sibling temp file and renames it into place, so a reader
/// never sees a half-written document.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Save the graph document (`nodes`, `edges`, `metadata`).
pub fn save_graph(path: &Path, graph: &Graph) -> Result<()> {
    write_json_atomic(path, graph)?;
    debug!(path = %path.display(), nodes = graph.node_count(), "graph saved");
    Ok(())
}

/// Load a graph document. The loaded graph is re-validated, so duplicate
/// ids or dangling edges are rejected.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let file = File::open(path)?;
    let graph: Graph = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), nodes = graph.node_count(), "graph loaded");
    Ok(graph)
}

pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    write_json_atomic(path, report)
}
