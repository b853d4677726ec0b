//
//  mod.rs
//  graphgen
//

//! Per-file extraction: syntax tree in, nodes and edges out.
//!
//! For one file the extractor emits:
//! 1. exactly one `file` node carrying the language tag,
//! 2. a node per named class-like declaration, with a `contains` edge from
//!    the file node,
//! 3. a node per named function-like declaration, likewise,
//! 4. the raw import specifiers, attached to the file node when non-empty.
//!
//! Nested declarations are emitted independently at their own line. Unless
//! lexical-parent linking is switched on, their only edge is the file-level
//! `contains` edge.

mod helpers;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use self::helpers::{ancestors, in_class_scope, node_text};
use super::adapter::{query, ParsedFile, ParserAdapter};
use super::language::SupportedLanguage;
use super::queries::{
    capture_to_kind, DeclarationKind, QuerySet, DEFINITION_PREFIX, IMPORT_CAPTURE, NAME_CAPTURE,
};
use crate::error::Result;
use crate::graph::types::{Edge, FileFragment, Node, NodeKind};

/// Knobs that change what an extractor emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Add a `contains` edge from each nested declaration's nearest
    /// enclosing declaration, on top of the file-level edge.
    pub link_lexical_parents: bool,
}

/// Extractor for one language. Cheap to clone; the compiled queries are
/// shared.
#[derive(Debug, Clone)]
pub struct Extractor {
    queries: Arc<QuerySet>,
    options: ExtractOptions,
}

impl Extractor {
    /// Compile the queries for `language` and build an extractor.
    pub fn new(language: SupportedLanguage, options: ExtractOptions) -> Result<Self> {
        Ok(Self::with_queries(Arc::new(QuerySet::compile(language)?), options))
    }

    pub fn with_queries(queries: Arc<QuerySet>, options: ExtractOptions) -> Self {
        Self { queries, options }
    }

    pub fn language(&self) -> SupportedLanguage {
        self.queries.language()
    }

    /// Extract nodes and edges from an already parsed file.
    ///
    /// `path` is the root-relative, forward-slash path used in node ids.
    /// Names and import specifiers that are not valid UTF-8 are skipped;
    /// the rest of the file is still extracted.
    pub fn extract(&self, parsed: &ParsedFile, source: &[u8], path: &str) -> Result<FileFragment> {
        let tree = &parsed.tree;
        let mut file = Node::file(path, self.language().tag());
        let scopes = self.queries.scopes();

        // Syntax node id -> graph node id, for lexical-parent lookups.
        let mut emitted: HashMap<usize, String> = HashMap::new();
        let mut seen: HashSet<usize> = HashSet::new();
        let mut declarations = Vec::new();

        for kind in [DeclarationKind::Class, DeclarationKind::Function] {
            let compiled = self.queries.query(parsed.grammar, kind)?;
            for hit in query(tree, compiled, source) {
                let (Some(name_node), Some(def)) =
                    (hit.get(NAME_CAPTURE), hit.with_prefix(DEFINITION_PREFIX))
                else {
                    continue;
                };
                let Some(captured_kind) = capture_to_kind(def.label) else {
                    continue;
                };
                // Anonymous or empty names are skipped, not placeholdered.
                let Some(name) = node_text(&name_node, source) else {
                    continue;
                };
                if !seen.insert(def.node.id()) {
                    continue;
                }

                let node_kind = match captured_kind {
                    NodeKind::Function if in_class_scope(def.node, scopes) => NodeKind::Method,
                    other => other,
                };
                let start = def.node.start_position();
                let node = Node::declaration(node_kind, path, &name, start.row, start.column);

                emitted.insert(def.node.id(), node.id.clone());
                declarations.push((def.node, node));
            }
        }

        let mut edges = Vec::with_capacity(declarations.len());
        for (syntax, node) in &declarations {
            edges.push(Edge::contains(&file.id, &node.id));

            if self.options.link_lexical_parents {
                if let Some(parent_id) = ancestors(*syntax).find_map(|a| emitted.get(&a.id())) {
                    edges.push(Edge::contains(parent_id, &node.id));
                }
            }
        }

        let import_query = self.queries.query(parsed.grammar, DeclarationKind::Import)?;
        let imports: Vec<String> = query(tree, import_query, source)
            .iter()
            .filter_map(|hit| hit.get(IMPORT_CAPTURE))
            .filter_map(|n| node_text(&n, source))
            .collect();
        file.metadata.imports = imports;

        let mut nodes = Vec::with_capacity(declarations.len() + 1);
        nodes.push(file);
        nodes.extend(declarations.into_iter().map(|(_, node)| node));

        Ok(FileFragment {
            path: path.to_string(),
            nodes,
            edges,
        })
    }

    /// Parse `source` with `adapter` and extract it.
    ///
    /// `display_path` picks the grammar and names the file in errors. Source
    /// bytes go to tree-sitter as is, so a file in a legacy encoding still
    /// contributes every declaration whose name decodes. Syntax errors inside
    /// the file are tolerated.
    pub fn extract_source(
        &self,
        adapter: &mut ParserAdapter,
        display_path: &Path,
        rel_path: &str,
        source: &[u8],
    ) -> Result<FileFragment> {
        let parsed = adapter.parse(display_path, source)?;
        self.extract(&parsed, source, rel_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{EdgeKind, Location};

    const PY_SOURCE: &str = r#"import os
import os.path as osp
from typing import Optional, List
from . import sibling
from ..pkg.mod import thing

class UserService:
    def __init__(self, db):
        self.db = db

    @staticmethod
    def helper():
        def inner():
            pass
        return inner

    class Config:
        pass

def main():
    service = UserService(None)
    return service

square = lambda x: x * x
"#;

    fn extract_py(source: &str, options: ExtractOptions) -> FileFragment {
        let extractor = Extractor::new(SupportedLanguage::Python, options).unwrap();
        let mut adapter = ParserAdapter::new(SupportedLanguage::Python).unwrap();
        extractor
            .extract_source(&mut adapter, Path::new("pkg/service.py"), "pkg/service.py", source.as_bytes())
            .unwrap()
    }

    fn find<'a>(fragment: &'a FileFragment, name: &str) -> &'a Node {
        fragment
            .nodes
            .iter()
            .find(|n| n.name == name)
            .unwrap_or_else(|| panic!("{name} not extracted"))
    }

    #[test]
    fn test_single_file_node_first() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());
        let files: Vec<&Node> = fragment.nodes.iter().filter(|n| n.kind == NodeKind::File).collect();
        assert_eq!(files.len(), 1);
        assert_eq!(fragment.nodes[0].kind, NodeKind::File);
        assert_eq!(fragment.nodes[0].name, "service.py");
        assert_eq!(fragment.nodes[0].path, "pkg/service.py");
        assert_eq!(fragment.nodes[0].location, Location::WHOLE_FILE);
        assert_eq!(fragment.nodes[0].metadata.language.as_deref(), Some("python"));
    }

    #[test]
    fn test_classes_then_functions_in_source_order() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());
        let names: Vec<&str> = fragment.nodes.iter().skip(1).map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["UserService", "Config", "__init__", "helper", "inner", "main"]
        );
    }

    #[test]
    fn test_kinds_and_locations() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());

        let service = find(&fragment, "UserService");
        assert_eq!(service.kind, NodeKind::Class);
        assert_eq!(service.location, Location { line: 7, column: 0 });

        let init = find(&fragment, "__init__");
        assert_eq!(init.kind, NodeKind::Method);
        assert_eq!(init.location, Location { line: 8, column: 4 });

        // Decorated: location is the `def` line, not the decorator.
        let helper = find(&fragment, "helper");
        assert_eq!(helper.kind, NodeKind::Method);
        assert_eq!(helper.location.line, 12);

        // Nested in a method, so a plain function.
        assert_eq!(find(&fragment, "inner").kind, NodeKind::Function);
        assert_eq!(find(&fragment, "Config").kind, NodeKind::Class);
        assert_eq!(find(&fragment, "main").kind, NodeKind::Function);
    }

    #[test]
    fn test_anonymous_lambda_is_skipped() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());
        assert!(fragment.nodes.iter().all(|n| n.name != "square"));
        assert_eq!(fragment.nodes.len(), 7);
    }

    #[test]
    fn test_every_declaration_has_exactly_one_file_edge() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());
        let file_id = &fragment.nodes[0].id;

        assert_eq!(fragment.edges.len(), fragment.nodes.len() - 1);
        for node in fragment.nodes.iter().skip(1) {
            let count = fragment
                .edges
                .iter()
                .filter(|e| e.kind == EdgeKind::Contains && &e.source == file_id && e.target == node.id)
                .count();
            assert_eq!(count, 1, "{}", node.name);
        }
    }

    #[test]
    fn test_imports_in_source_order() {
        let fragment = extract_py(PY_SOURCE, ExtractOptions::default());
        assert_eq!(
            fragment.nodes[0].metadata.imports,
            vec!["os", "os.path", "typing", ".", "..pkg.mod"]
        );
    }

    #[test]
    fn test_no_imports_leaves_metadata_bare() {
        let fragment = extract_py("def f():\n    pass\n", ExtractOptions::default());
        assert!(fragment.nodes[0].metadata.imports.is_empty());
        let json = serde_json::to_value(&fragment.nodes[0]).unwrap();
        assert!(json["metadata"].get("imports").is_none());
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let first = extract_py(PY_SOURCE, ExtractOptions::default());
        let second = extract_py(PY_SOURCE, ExtractOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_lexical_parent_linking() {
        let options = ExtractOptions {
            link_lexical_parents: true,
        };
        let fragment = extract_py(PY_SOURCE, options);
        let file_id = fragment.nodes[0].id.clone();
        let parent_of = |name: &str| -> Vec<String> {
            let id = &find(&fragment, name).id;
            fragment
                .edges
                .iter()
                .filter(|e| &e.target == id && e.source != file_id)
                .map(|e| e.source.clone())
                .collect()
        };

        assert_eq!(parent_of("__init__"), vec![find(&fragment, "UserService").id.clone()]);
        assert_eq!(parent_of("Config"), vec![find(&fragment, "UserService").id.clone()]);
        assert_eq!(parent_of("inner"), vec![find(&fragment, "helper").id.clone()]);
        assert!(parent_of("main").is_empty());
        assert!(parent_of("UserService").is_empty());

        // File-level containment is unchanged.
        let file_edges = fragment.edges.iter().filter(|e| e.source == file_id).count();
        assert_eq!(file_edges, fragment.nodes.len() - 1);
    }

    #[test]
    fn test_malformed_source_is_tolerated() {
        let fragment = extract_py("class Broken(:\n    def ok(self):\n        pass\n", ExtractOptions::default());
        assert_eq!(fragment.nodes[0].kind, NodeKind::File);
    }

    #[test]
    fn test_latin1_comment_keeps_declarations() {
        let mut source = b"# -*- coding: latin-1 -*-\n# caf".to_vec();
        source.push(0xe9);
        source.extend_from_slice(b" au lait\nimport os\n\nclass Ok:\n    def run(self):\n        pass\n");

        let extractor = Extractor::new(SupportedLanguage::Python, ExtractOptions::default()).unwrap();
        let mut adapter = ParserAdapter::new(SupportedLanguage::Python).unwrap();
        let fragment = extractor
            .extract_source(&mut adapter, Path::new("legacy.py"), "legacy.py", &source)
            .unwrap();

        let names: Vec<(&str, NodeKind)> = fragment.nodes.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("legacy.py", NodeKind::File),
                ("Ok", NodeKind::Class),
                ("run", NodeKind::Method),
            ]
        );
        assert_eq!(find(&fragment, "Ok").location.line, 5);
        assert_eq!(fragment.nodes[0].metadata.imports, vec!["os"]);
    }

    #[test]
    fn test_empty_source() {
        let fragment = extract_py("", ExtractOptions::default());
        assert_eq!(fragment.nodes.len(), 1);
        assert!(fragment.edges.is_empty());
    }

    fn extract_with(language: SupportedLanguage, path: &str, source: &str) -> FileFragment {
        let extractor = Extractor::new(language, ExtractOptions::default()).unwrap();
        let mut adapter = ParserAdapter::new(language).unwrap();
        extractor
            .extract_source(&mut adapter, Path::new(path), path, source.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_javascript_contract() {
        let source = r#"import { useState } from 'react';
const axios = require("axios");

class ApiClient {
    constructor(baseUrl) {
        this.baseUrl = baseUrl;
    }

    fetchData(endpoint) {
        return axios.get(endpoint);
    }
}

function App() {
    return null;
}

const handler = () => 1;
"#;
        let fragment = extract_with(SupportedLanguage::JavaScript, "src/app.js", source);
        let kinds: Vec<(&str, NodeKind)> = fragment
            .nodes
            .iter()
            .skip(1)
            .map(|n| (n.name.as_str(), n.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("ApiClient", NodeKind::Class),
                ("constructor", NodeKind::Method),
                ("fetchData", NodeKind::Method),
                ("App", NodeKind::Function),
                ("handler", NodeKind::Function),
            ]
        );
        assert_eq!(fragment.nodes[0].metadata.imports, vec!["react", "axios"]);
        assert_eq!(fragment.nodes[0].metadata.language.as_deref(), Some("javascript"));
    }

    #[test]
    fn test_typescript_interfaces() {
        let source = r#"import { Request } from 'express';

interface UserDTO {
    id: number;
}

class UserController {
    getUser(req: Request): void {}
}
"#;
        let fragment = extract_with(SupportedLanguage::TypeScript, "src/users.ts", source);
        let dto = fragment.nodes.iter().find(|n| n.name == "UserDTO").unwrap();
        assert_eq!(dto.kind, NodeKind::Interface);
        let get_user = fragment.nodes.iter().find(|n| n.name == "getUser").unwrap();
        assert_eq!(get_user.kind, NodeKind::Method);
        assert_eq!(fragment.nodes[0].metadata.imports, vec!["express"]);
    }

    #[test]
    fn test_tsx_declarations_after_jsx() {
        let source = r#"import React from 'react';

export function App() {
    return <div className="app"><Widget /></div>;
}

class Widget {
    render() {
        return <span />;
    }
}
"#;
        let fragment = extract_with(SupportedLanguage::TypeScript, "src/App.tsx", source);
        let kinds: Vec<(&str, NodeKind)> = fragment
            .nodes
            .iter()
            .map(|n| (n.name.as_str(), n.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("App.tsx", NodeKind::File),
                ("Widget", NodeKind::Class),
                ("App", NodeKind::Function),
                ("render", NodeKind::Method),
            ]
        );
        assert_eq!(fragment.nodes[0].metadata.language.as_deref(), Some("typescript"));
        assert_eq!(fragment.nodes[0].metadata.imports, vec!["react"]);
    }

    #[test]
    fn test_rust_contract() {
        let source = r#"use std::collections::HashMap;

pub struct Config {
    values: HashMap<String, i32>,
}

impl Config {
    pub fn new() -> Self {
        Config { values: HashMap::new() }
    }
}

fn main() {}
"#;
        let fragment = extract_with(SupportedLanguage::Rust, "src/main.rs", source);
        let kinds: Vec<(&str, NodeKind)> = fragment
            .nodes
            .iter()
            .skip(1)
            .map(|n| (n.name.as_str(), n.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Config", NodeKind::Class),
                ("new", NodeKind::Method),
                ("main", NodeKind::Function),
            ]
        );
        assert_eq!(
            fragment.nodes[0].metadata.imports,
            vec!["std::collections::HashMap"]
        );
    }
}
