//
//  builder.rs
//  graphgen
//

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::discovery::{default_excludes, find_files, relative_path, DiscoveryOptions};
use super::types::{FileFragment, Graph, GraphDraft, GraphMetadata};
use crate::error::{GraphgenError, Result};
use crate::parser::{ExtractOptions, Extractor, ParserAdapter, QuerySet, SupportedLanguage};

/// Everything fixed at builder construction.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    pub root: PathBuf,
    /// Language tag, e.g. `"python"`.
    pub language: String,
    /// Directory names never descended into.
    pub exclude: Vec<String>,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
    /// Extract files on the rayon pool instead of one at a time.
    pub parallel: bool,
    pub link_lexical_parents: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            language: SupportedLanguage::Python.tag().to_string(),
            exclude: default_excludes(),
            respect_gitignore: true,
            include_hidden: false,
            parallel: false,
            link_lexical_parents: false,
        }
    }
}

impl BuilderOptions {
    pub fn new(root: impl Into<PathBuf>, language: &str) -> Self {
        Self {
            root: root.into(),
            language: language.to_string(),
            ..Self::default()
        }
    }
}

/// Drives discovery, extraction and assembly for one root and language.
#[derive(Debug)]
pub struct GraphBuilder {
    options: BuilderOptions,
    language: SupportedLanguage,
    extractor: Extractor,
}

impl GraphBuilder {
    /// Resolve the language, compile its queries and make the root absolute.
    ///
    /// An unknown language fails here, before any file is touched. A root
    /// that cannot be canonicalised (it may not exist yet) is kept as given.
    pub fn new(mut options: BuilderOptions) -> Result<Self> {
        let language = SupportedLanguage::from_tag(&options.language)?;
        match fs::canonicalize(&options.root) {
            Ok(root) => options.root = root,
            Err(e) => debug!(root = %options.root.display(), error = %e, "keeping root as given"),
        }
        let queries = Arc::new(QuerySet::compile(language)?);
        let extractor = Extractor::with_queries(
            queries,
            ExtractOptions {
                link_lexical_parents: options.link_lexical_parents,
            },
        );

        Ok(Self {
            options,
            language,
            extractor,
        })
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Patterns used when the caller passes none.
    pub fn default_patterns(&self) -> Vec<String> {
        self.language
            .default_patterns()
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    /// Discover, extract and assemble a graph for `patterns`.
    ///
    /// A file that cannot be read or parsed is logged and left out; it
    /// never aborts the run. No matching files yields an empty graph.
    pub fn generate(&self, patterns: &[String]) -> Result<Graph> {
        let patterns = if patterns.is_empty() {
            self.default_patterns()
        } else {
            patterns.to_vec()
        };

        let root = &self.options.root;
        let files = find_files(
            root,
            &patterns,
            &self.options.exclude,
            DiscoveryOptions {
                respect_gitignore: self.options.respect_gitignore,
                include_hidden: self.options.include_hidden,
            },
        )?;
        info!(
            root = %root.display(),
            language = %self.language,
            files = files.len(),
            "generating graph"
        );

        let results = if self.options.parallel {
            self.extract_parallel(&files)
        } else {
            self.extract_sequential(&files)?
        };

        let mut draft = GraphDraft::new();
        let mut metadata = GraphMetadata::new(self.language.tag(), &root.display().to_string());

        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(fragment) => {
                    debug!(
                        file = %fragment.path,
                        nodes = fragment.nodes.len(),
                        edges = fragment.edges.len(),
                        "extracted"
                    );
                    draft.append(fragment);
                    metadata.files_processed += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping file");
                    metadata.files_failed += 1;
                }
            }
        }

        let graph = draft.freeze(metadata)?;
        info!(
            files = graph.metadata().files_processed,
            failed = graph.metadata().files_failed,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph complete"
        );
        Ok(graph)
    }

    fn extract_sequential(&self, files: &[PathBuf]) -> Result<Vec<Result<FileFragment>>> {
        let mut adapter = ParserAdapter::new(self.language)?;
        Ok(files
            .iter()
            .map(|path| self.process_file(&mut adapter, path))
            .collect())
    }

    /// One parser per rayon worker; `collect` keeps discovery order.
    fn extract_parallel(&self, files: &[PathBuf]) -> Vec<Result<FileFragment>> {
        files
            .par_iter()
            .map_init(
                || ParserAdapter::new(self.language),
                |adapter, path| match adapter {
                    Ok(adapter) => self.process_file(adapter, path),
                    Err(e) => Err(GraphgenError::ParserInitError(
                        self.language.tag().to_string(),
                        e.to_string(),
                    )),
                },
            )
            .collect()
    }

    /// Read, parse and extract a single file.
    pub fn process_file(&self, adapter: &mut ParserAdapter, path: &Path) -> Result<FileFragment> {
        let source = fs::read(path).map_err(|source| GraphgenError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let rel_path = relative_path(&self.options.root, path);
        self.extractor
            .extract_source(adapter, path, &rel_path, &source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{EdgeKind, NodeKind};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "app/models.py",
            b"import json\n\nclass User:\n    def save(self):\n        pass\n",
        );
        write(dir.path(), "app/main.py", b"from app.models import User\n\ndef main():\n    User().save()\n");
        write(dir.path(), "node_modules/x.py", b"def hidden():\n    pass\n");
        dir
    }

    fn builder(root: &Path) -> GraphBuilder {
        GraphBuilder::new(BuilderOptions::new(root, "python")).unwrap()
    }

    #[test]
    fn test_unsupported_language_is_fatal() {
        let err = GraphBuilder::new(BuilderOptions::new(".", "cobol")).unwrap_err();
        assert!(matches!(err, GraphgenError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_generate_project() {
        let dir = project();
        let graph = builder(dir.path()).generate(&[]).unwrap();

        let meta = graph.metadata();
        assert_eq!(meta.files_processed, 2);
        assert_eq!(meta.files_failed, 0);
        assert_eq!(meta.language, "python");
        assert_eq!(meta.node_count, graph.nodes().len());
        assert_eq!(meta.edge_count, graph.edges().len());

        let names: Vec<(&str, NodeKind)> = graph.nodes().iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("main.py", NodeKind::File),
                ("main", NodeKind::Function),
                ("models.py", NodeKind::File),
                ("User", NodeKind::Class),
                ("save", NodeKind::Method),
            ]
        );
        assert!(graph.edges().iter().all(|e| e.kind == EdgeKind::Contains));
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.nodes()[0].path, "app/main.py");
        assert_eq!(graph.nodes()[0].metadata.imports, vec!["app.models"]);
    }

    #[test]
    fn test_empty_input_is_valid() {
        let dir = TempDir::new().unwrap();
        let graph = builder(dir.path()).generate(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.metadata().files_processed, 0);
        assert_eq!(graph.metadata().node_count, 0);
        assert_eq!(graph.metadata().edge_count, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_leaves_other_files_untouched() {
        let dir = project();
        let clean = builder(dir.path()).generate(&[]).unwrap();

        // Sorts ahead of main.py and cannot be read.
        std::os::unix::fs::symlink(dir.path().join("app/missing.py"), dir.path().join("app/broken.py"))
            .unwrap();
        let with_failure = builder(dir.path()).generate(&[]).unwrap();

        assert_eq!(with_failure.metadata().files_processed, 2);
        assert_eq!(with_failure.metadata().files_failed, 1);
        assert_eq!(with_failure.nodes(), clean.nodes());
        assert_eq!(with_failure.edges(), clean.edges());
    }

    #[test]
    fn test_non_utf8_file_is_processed() {
        let dir = project();
        write(dir.path(), "app/legacy.py", b"# caf\xe9\nclass Ok:\n    pass\n");

        let graph = builder(dir.path()).generate(&[]).unwrap();
        assert_eq!(graph.metadata().files_processed, 3);
        assert_eq!(graph.metadata().files_failed, 0);
        assert!(graph
            .nodes()
            .iter()
            .any(|n| n.name == "Ok" && n.path == "app/legacy.py"));
    }

    #[test]
    fn test_root_path_is_absolute() {
        let dir = project();
        let expected = fs::canonicalize(dir.path()).unwrap();

        for root in [dir.path().join("."), dir.path().join("app/..")] {
            let b = builder(&root);
            assert_eq!(b.options().root, expected);
            let graph = b.generate(&[]).unwrap();
            let root_path = &graph.metadata().root_path;
            assert!(Path::new(root_path).is_absolute(), "{root_path}");
            assert_eq!(Path::new(root_path), expected.as_path());
            assert_eq!(graph.metadata().files_processed, 2);
        }
    }

    #[test]
    fn test_tsx_files_found_by_default() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/App.tsx",
            b"export function App() { return <div/>; }\nclass Widget {}\n",
        );
        write(dir.path(), "src/api.ts", b"export function fetchUser(id: number) {}\n");

        let graph = GraphBuilder::new(BuilderOptions::new(dir.path(), "typescript"))
            .unwrap()
            .generate(&[])
            .unwrap();
        assert_eq!(graph.metadata().files_processed, 2);
        let names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["App.tsx", "Widget", "App", "api.ts", "fetchUser"]);
    }

    #[test]
    fn test_explicit_patterns() {
        let dir = project();
        let graph = builder(dir.path())
            .generate(&["app/models.py".to_string()])
            .unwrap();
        assert_eq!(graph.files().count(), 1);
        assert_eq!(graph.metadata().files_processed, 1);
    }

    #[test]
    fn test_runs_are_identical_except_timestamp() {
        let dir = project();
        let b = builder(dir.path());
        let first = b.generate(&[]).unwrap();
        let second = b.generate(&[]).unwrap();
        assert_eq!(first.nodes(), second.nodes());
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = project();
        for i in 0..20 {
            write(
                dir.path(),
                &format!("gen/m{i:02}.py"),
                format!("class C{i}:\n    def m(self):\n        pass\n").as_bytes(),
            );
        }

        let sequential = builder(dir.path()).generate(&[]).unwrap();
        let mut options = BuilderOptions::new(dir.path(), "python");
        options.parallel = true;
        let parallel = GraphBuilder::new(options).unwrap().generate(&[]).unwrap();

        assert_eq!(sequential.nodes(), parallel.nodes());
        assert_eq!(sequential.edges(), parallel.edges());
        assert_eq!(
            sequential.metadata().files_processed,
            parallel.metadata().files_processed
        );
    }
}
