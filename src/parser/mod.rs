//
//  mod.rs
//  graphgen
//

pub mod adapter;
pub mod extractor;
pub mod language;
pub mod queries;

pub use adapter::{ParsedFile, ParserAdapter};
pub use extractor::{ExtractOptions, Extractor};
pub use language::{Grammar, SupportedLanguage};
pub use queries::{DeclarationKind, QuerySet};
