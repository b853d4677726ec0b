//
//  stats.rs
//  graphgen
//

//! `graphgen stats`: report on a saved graph.

use anyhow::{Context, Result};
use std::path::Path;

use crate::graph::{summarize_top, Report};
use crate::storage::load_graph;

pub fn run(graph_path: &Path, top: usize, json: bool) -> Result<()> {
    let graph = load_graph(graph_path).with_context(|| format!("loading {}", graph_path.display()))?;
    let report = summarize_top(&graph, top);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let meta = graph.metadata();
    println!("Graph: {}", graph_path.display());
    println!("  Language: {}", meta.language);
    println!("  Root: {}", meta.root_path);
    println!("  Generated: {}", meta.generated.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Files processed: {}", meta.files_processed);
    println!("  Total nodes: {}", graph.node_count());
    println!("  Total edges: {}", graph.edge_count());
    print_report(&report);

    Ok(())
}

/// Print histograms and the connectivity ranking.
pub fn print_report(report: &Report) {
    println!();
    println!("  Nodes by type:");
    for (kind, count) in &report.node_types {
        println!("    {}: {}", kind, count);
    }

    println!();
    println!("  Edges by type:");
    for (kind, count) in &report.edge_types {
        println!("    {}: {}", kind, count);
    }

    if !report.top_connected.is_empty() {
        println!();
        println!("  Top connected nodes:");
        for node in &report.top_connected {
            println!("    {} ({}) - {} connections", node.name, node.kind, node.connections);
            println!("      {}", node.path);
        }
    }
}
