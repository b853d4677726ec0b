//
//  language.rs
//  graphgen
//

//! Language tags and tree-sitter grammar loading.

use std::fmt;
use std::path::Path;
use tree_sitter::Language;

use crate::error::{GraphgenError, Result};

/// Languages with a registered extraction contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Python,
    JavaScript,
    TypeScript,
    Rust,
}

impl SupportedLanguage {
    /// Every registered language.
    pub const ALL: [SupportedLanguage; 4] = [
        SupportedLanguage::Python,
        SupportedLanguage::JavaScript,
        SupportedLanguage::TypeScript,
        SupportedLanguage::Rust,
    ];

    /// Resolve a language tag such as `"python"` or `"ts"`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(SupportedLanguage::Python),
            "javascript" | "js" => Ok(SupportedLanguage::JavaScript),
            "typescript" | "ts" => Ok(SupportedLanguage::TypeScript),
            "rust" | "rs" => Ok(SupportedLanguage::Rust),
            _ => Err(GraphgenError::UnsupportedLanguage(tag.to_string())),
        }
    }

    /// Canonical tag, as stored in file node metadata.
    pub fn tag(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::TypeScript => "typescript",
            SupportedLanguage::Rust => "rust",
        }
    }

    /// Glob used for discovery when no patterns are configured.
    pub fn default_patterns(&self) -> &'static [&'static str] {
        match self {
            SupportedLanguage::Python => &["**/*.py"],
            SupportedLanguage::JavaScript => &["**/*.js", "**/*.mjs", "**/*.cjs", "**/*.jsx"],
            SupportedLanguage::TypeScript => &["**/*.ts", "**/*.tsx"],
            SupportedLanguage::Rust => &["**/*.rs"],
        }
    }

    /// Grammars used for this language's files, primary first.
    pub fn grammars(&self) -> &'static [Grammar] {
        match self {
            SupportedLanguage::Python => &[Grammar::Python],
            SupportedLanguage::JavaScript => &[Grammar::JavaScript],
            SupportedLanguage::TypeScript => &[Grammar::TypeScript, Grammar::Tsx],
            SupportedLanguage::Rust => &[Grammar::Rust],
        }
    }

    /// Grammar to parse `path` with. Falls back to the primary grammar when
    /// the extension says nothing more specific.
    pub fn grammar_for(&self, path: &Path) -> Grammar {
        let grammars = self.grammars();
        Grammar::from_path(path)
            .filter(|g| grammars.contains(g))
            .unwrap_or(grammars[0])
    }
}

/// A concrete tree-sitter grammar. TypeScript has two: plain and TSX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
}

impl Grammar {
    /// Detect grammar from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "py" | "pyw" => Some(Grammar::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Grammar::JavaScript),
            "ts" | "mts" | "cts" => Some(Grammar::TypeScript),
            "tsx" => Some(Grammar::Tsx),
            "rs" => Some(Grammar::Rust),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Python => "python",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
            Grammar::Rust => "rust",
        }
    }

    /// Get the tree-sitter Language for this grammar.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Grammar::Python => tree_sitter_python::LANGUAGE.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
