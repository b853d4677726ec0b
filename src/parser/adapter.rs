//
//  adapter.rs
//  graphgen
//

//! Thin wrapper over tree-sitter: parse source bytes, run structural queries.
//!
//! A `tree_sitter::Parser` must not be shared between concurrent parses, so
//! each worker owns its own `ParserAdapter`. Compiled queries are shareable.
//! The grammar is chosen per file: `.tsx` files get the TSX grammar.

use std::path::Path;

use tree_sitter::{Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

use super::language::{Grammar, SupportedLanguage};
use crate::error::{GraphgenError, Result};

/// One captured syntax node and the label it was captured under.
#[derive(Debug, Clone, Copy)]
pub struct Capture<'tree, 'query> {
    pub node: Node<'tree>,
    pub label: &'query str,
}

/// All captures of one pattern match.
#[derive(Debug, Clone)]
pub struct QueryHit<'tree, 'query> {
    pub captures: Vec<Capture<'tree, 'query>>,
}

impl<'tree, 'query> QueryHit<'tree, 'query> {
    /// First node captured under exactly `label`.
    pub fn get(&self, label: &str) -> Option<Node<'tree>> {
        self.captures
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.node)
    }

    /// First capture whose label starts with `prefix`.
    pub fn with_prefix(&self, prefix: &str) -> Option<Capture<'tree, 'query>> {
        self.captures
            .iter()
            .find(|c| c.label.starts_with(prefix))
            .copied()
    }
}

/// A syntax tree and the grammar that produced it.
pub struct ParsedFile {
    pub grammar: Grammar,
    pub tree: Tree,
}

/// Parsers for one language, one per grammar it uses.
pub struct ParserAdapter {
    language: SupportedLanguage,
    parsers: Vec<(Grammar, Parser)>,
}

impl ParserAdapter {
    pub fn new(language: SupportedLanguage) -> Result<Self> {
        let mut parsers = Vec::with_capacity(language.grammars().len());
        for &grammar in language.grammars() {
            let mut parser = Parser::new();
            parser
                .set_language(&grammar.tree_sitter_language())
                .map_err(|e| GraphgenError::ParserInitError(grammar.name().to_string(), e.to_string()))?;
            parsers.push((grammar, parser));
        }
        Ok(Self { language, parsers })
    }

    /// Parse `source` with the grammar `path` calls for.
    ///
    /// tree-sitter recovers from syntax errors, so malformed code still
    /// yields a tree (with `ERROR` nodes). `None` only happens when parsing
    /// is cancelled.
    pub fn parse(&mut self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        let grammar = self.language.grammar_for(path);
        let (_, parser) = self
            .parsers
            .iter_mut()
            .find(|(g, _)| *g == grammar)
            .ok_or_else(|| GraphgenError::UnsupportedLanguage(grammar.name().to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GraphgenError::TreeSitterParseFailed(path.to_path_buf()))?;
        Ok(ParsedFile { grammar, tree })
    }
}

/// Run `query` over the whole tree and collect every match, in the order
/// tree-sitter reports them (by start position).
pub fn query<'tree, 'query>(
    tree: &'tree Tree,
    query: &'query Query,
    source: &[u8],
) -> Vec<QueryHit<'tree, 'query>> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    let mut hits = Vec::new();
    while let Some(m) = matches.next() {
        let captures = m
            .captures
            .iter()
            .map(|c| Capture {
                node: c.node,
                label: names[c.index as usize],
            })
            .collect();
        hits.push(QueryHit { captures });
    }
    hits
}
