//
//  generate.rs
//  graphgen
//

//! `graphgen generate`: build, save and summarise.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::stats::print_report;
use super::RunPaths;
use crate::config::GraphgenConfig;
use crate::graph::{summarize_top, GraphBuilder};
use crate::storage::{save_graph, save_report};

pub fn run(config: &GraphgenConfig, paths: &RunPaths, report_path: Option<&Path>) -> Result<()> {
    let builder = GraphBuilder::new(config.builder_options_at(paths.root.clone()))?;
    let patterns = if config.project.patterns.is_empty() {
        builder.default_patterns()
    } else {
        config.project.patterns.clone()
    };

    println!("Generating code graph for {} files...", builder.language());
    println!("Root path: {}", builder.options().root.display());
    println!("Patterns: {}", patterns.join(", "));
    println!();

    let graph = builder.generate(&patterns)?;
    let report = summarize_top(&graph, config.output.top_connected);

    let output = &paths.output;
    save_graph(output, &graph).with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "graph saved");
    println!("✓ Graph saved to {}", output.display());

    if let Some(path) = report_path {
        save_report(path, &report).with_context(|| format!("writing {}", path.display()))?;
        println!("✓ Report saved to {}", path.display());
    }

    let meta = graph.metadata();
    println!();
    println!("Statistics:");
    println!("  Files processed: {}", meta.files_processed);
    if meta.files_failed > 0 {
        println!("  Files failed: {}", meta.files_failed);
    }
    println!("  Total nodes: {}", meta.node_count);
    println!("  Total edges: {}", meta.edge_count);
    print_report(&report);

    Ok(())
}
