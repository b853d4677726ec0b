//
//  typescript.rs
//  graphgen
//

//! TypeScript structural patterns.
//!
//! The TypeScript grammar names class identifiers `type_identifier`, so the
//! class patterns differ from JavaScript. Function and import patterns are
//! shared.

pub const CLASS: &str = r#"
(class_declaration name: (type_identifier) @name) @definition.class
(abstract_class_declaration name: (type_identifier) @name) @definition.class
(interface_declaration name: (type_identifier) @name) @definition.interface
"#;

pub use super::javascript::{FUNCTION, IMPORT};

pub const CLASS_SCOPES: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "interface_declaration",
];

pub use super::javascript::FUNCTION_SCOPES;
