//
//  mod.rs
//  graphgen
//

//! Structural query registry.
//!
//! Maps `(language, declaration kind)` to a tree-sitter pattern. A
//! [`QuerySet`] compiles the patterns of one language once; extractors share
//! it (behind an `Arc`) across every file of that language.
//!
//! Capture labels used by the patterns:
//! - `@name`: the declared identifier
//! - `@definition.class`, `@definition.interface`, `@definition.function`,
//!   `@definition.method`: the declaration node, whose start is the node's
//!   location
//! - `@import`: the raw module specifier text
//!
//! Labels starting with `_` are helpers for predicates and carry no meaning.

pub mod javascript;
pub mod python;
pub mod rust;
pub mod typescript;

use std::fmt;
use tree_sitter::Query;

use super::language::{Grammar, SupportedLanguage};
use crate::error::{GraphgenError, Result};
use crate::graph::types::NodeKind;

/// What a query looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Function,
    Import,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::Import => "import",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const NAME_CAPTURE: &str = "name";
pub const IMPORT_CAPTURE: &str = "import";
pub const DEFINITION_PREFIX: &str = "definition.";

/// Map a definition capture label to the node kind it produces.
pub fn capture_to_kind(label: &str) -> Option<NodeKind> {
    match label {
        "definition.class" => Some(NodeKind::Class),
        "definition.interface" => Some(NodeKind::Interface),
        "definition.function" => Some(NodeKind::Function),
        "definition.method" => Some(NodeKind::Method),
        _ => None,
    }
}

/// Pattern source for one `(language, kind)` entry.
pub fn pattern(lang: SupportedLanguage, kind: DeclarationKind) -> &'static str {
    match (lang, kind) {
        (SupportedLanguage::Python, DeclarationKind::Class) => python::CLASS,
        (SupportedLanguage::Python, DeclarationKind::Function) => python::FUNCTION,
        (SupportedLanguage::Python, DeclarationKind::Import) => python::IMPORT,
        (SupportedLanguage::JavaScript, DeclarationKind::Class) => javascript::CLASS,
        (SupportedLanguage::JavaScript, DeclarationKind::Function) => javascript::FUNCTION,
        (SupportedLanguage::JavaScript, DeclarationKind::Import) => javascript::IMPORT,
        (SupportedLanguage::TypeScript, DeclarationKind::Class) => typescript::CLASS,
        (SupportedLanguage::TypeScript, DeclarationKind::Function) => typescript::FUNCTION,
        (SupportedLanguage::TypeScript, DeclarationKind::Import) => typescript::IMPORT,
        (SupportedLanguage::Rust, DeclarationKind::Class) => rust::CLASS,
        (SupportedLanguage::Rust, DeclarationKind::Function) => rust::FUNCTION,
        (SupportedLanguage::Rust, DeclarationKind::Import) => rust::IMPORT,
    }
}

/// Syntax node kinds that open a class-like or function-like scope.
/// Used to tell methods from functions and to find lexical parents.
#[derive(Debug, Clone, Copy)]
pub struct Scopes {
    pub class: &'static [&'static str],
    pub function: &'static [&'static str],
}

pub fn scopes(lang: SupportedLanguage) -> Scopes {
    match lang {
        SupportedLanguage::Python => Scopes {
            class: python::CLASS_SCOPES,
            function: python::FUNCTION_SCOPES,
        },
        SupportedLanguage::JavaScript => Scopes {
            class: javascript::CLASS_SCOPES,
            function: javascript::FUNCTION_SCOPES,
        },
        SupportedLanguage::TypeScript => Scopes {
            class: typescript::CLASS_SCOPES,
            function: typescript::FUNCTION_SCOPES,
        },
        SupportedLanguage::Rust => Scopes {
            class: rust::CLASS_SCOPES,
            function: rust::FUNCTION_SCOPES,
        },
    }
}

/// The three queries of one language, compiled against one grammar.
struct CompiledQueries {
    class: Query,
    function: Query,
    import: Query,
}

impl CompiledQueries {
    fn compile(language: SupportedLanguage, grammar: Grammar) -> Result<Self> {
        let ts_lang = grammar.tree_sitter_language();
        let compile = |kind: DeclarationKind| {
            Query::new(&ts_lang, pattern(language, kind)).map_err(|e| {
                GraphgenError::QueryCompile {
                    language: grammar.name().to_string(),
                    kind: kind.to_string(),
                    message: e.to_string(),
                }
            })
        };

        Ok(Self {
            class: compile(DeclarationKind::Class)?,
            function: compile(DeclarationKind::Function)?,
            import: compile(DeclarationKind::Import)?,
        })
    }

    fn get(&self, kind: DeclarationKind) -> &Query {
        match kind {
            DeclarationKind::Class => &self.class,
            DeclarationKind::Function => &self.function,
            DeclarationKind::Import => &self.import,
        }
    }
}

/// Compiled queries for one language, once per grammar it parses with.
///
/// A query is tied to the grammar it was compiled for; running it over a
/// tree from another grammar silently matches the wrong node types.
pub struct QuerySet {
    language: SupportedLanguage,
    compiled: Vec<(Grammar, CompiledQueries)>,
    scopes: Scopes,
}

impl fmt::Debug for QuerySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grammars: Vec<&str> = self.compiled.iter().map(|(g, _)| g.name()).collect();
        f.debug_struct("QuerySet")
            .field("language", &self.language)
            .field("grammars", &grammars)
            .finish()
    }
}

impl QuerySet {
    /// Compile every pattern registered for `language`, for each of its
    /// grammars.
    pub fn compile(language: SupportedLanguage) -> Result<Self> {
        let compiled = language
            .grammars()
            .iter()
            .map(|&grammar| Ok((grammar, CompiledQueries::compile(language, grammar)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            language,
            compiled,
            scopes: scopes(language),
        })
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// The query for `kind`, compiled for `grammar`.
    pub fn query(&self, grammar: Grammar, kind: DeclarationKind) -> Result<&Query> {
        self.compiled
            .iter()
            .find(|(g, _)| *g == grammar)
            .map(|(_, queries)| queries.get(kind))
            .ok_or_else(|| GraphgenError::UnsupportedLanguage(grammar.name().to_string()))
    }

    pub fn scopes(&self) -> Scopes {
        self.scopes
    }
}
