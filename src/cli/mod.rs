//
//  mod.rs
//  graphgen
//

//! CLI module for graphgen.
//!
//! Commands:
//! - generate: scan a tree, write the graph document, print a summary
//! - stats: summarise an existing graph document
//! - languages: list registered languages

pub mod generate;
pub mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{GraphgenConfig, CONFIG_FILE};
use crate::parser::SupportedLanguage;

#[derive(Parser)]
#[command(name = "graphgen")]
#[command(about = "graphgen - structural code graphs from source trees", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph for a source tree and save it as JSON
    Generate {
        /// Language tag (python, javascript, typescript, rust)
        language: Option<String>,

        /// Root directory to scan
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Glob pattern relative to the root (repeatable)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,

        /// Directory name to skip (repeatable, replaces the defaults)
        #[arg(short, long = "exclude")]
        excludes: Vec<String>,

        /// Output file for the graph document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Extract files in parallel
        #[arg(long)]
        parallel: bool,

        /// Add contains edges from enclosing declarations
        #[arg(long)]
        link_parents: bool,

        /// Also write the statistics report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print statistics for a saved graph
    Stats {
        /// Graph document
        graph: PathBuf,

        /// Entries in the connectivity ranking
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered languages
    Languages,
}

/// Command-line values that override the config file. Paths are kept
/// apart in [`RunPaths`] since they resolve against a different directory.
#[derive(Debug, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub patterns: Vec<String>,
    pub excludes: Vec<String>,
    pub parallel: bool,
    pub link_parents: bool,
}

impl Overrides {
    /// Fold these flags into `config`. Flags win over file values.
    pub fn apply(self, config: &mut GraphgenConfig) {
        if let Some(language) = self.language {
            config.project.language = language;
        }
        if !self.patterns.is_empty() {
            config.project.patterns = self.patterns;
        }
        if !self.excludes.is_empty() {
            config.discovery.exclude = self.excludes;
        }
        config.extraction.parallel |= self.parallel;
        config.extraction.link_lexical_parents |= self.link_parents;
    }
}

/// Scan root and output file for one run.
///
/// A path given on the command line is taken relative to the working
/// directory. A path read from the config file is taken relative to the
/// directory holding that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub root: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    pub fn resolve(
        config: &GraphgenConfig,
        config_path: &Path,
        root: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        let base = config_base(config_path);
        Self {
            root: root.unwrap_or_else(|| config.resolve_root(&base)),
            output: output.unwrap_or_else(|| config.resolve_output(&base)),
        }
    }
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            language,
            root,
            patterns,
            excludes,
            output,
            config,
            parallel,
            link_parents,
            report,
        } => {
            let mut loaded = GraphgenConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            Overrides {
                language,
                patterns,
                excludes,
                parallel,
                link_parents,
            }
            .apply(&mut loaded);

            let paths = RunPaths::resolve(&loaded, &config, root, output);
            generate::run(&loaded, &paths, report.as_deref())
        }
        Commands::Stats { graph, top, json } => stats::run(&graph, top, json),
        Commands::Languages => {
            for lang in SupportedLanguage::ALL {
                println!("{:<12} {}", lang.tag(), lang.default_patterns().join(" "));
            }
            Ok(())
        }
    }
}

/// Directory that relative config file values resolve against.
fn config_base(config: &Path) -> PathBuf {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
