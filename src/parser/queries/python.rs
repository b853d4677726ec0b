//
//  python.rs
//  graphgen
//

//! Python structural patterns.

/// Class definitions, decorated or not.
pub const CLASS: &str = r#"
(class_definition name: (identifier) @name) @definition.class
"#;

/// Function definitions at any depth (module, class body, nested).
pub const FUNCTION: &str = r#"
(function_definition name: (identifier) @name) @definition.function
"#;

/// Module referenced by `import a.b`, `import a.b as c`, `from a.b import x`
/// and `from .rel import x`.
pub const IMPORT: &str = r#"
(import_statement name: (dotted_name) @import)
(import_statement name: (aliased_import name: (dotted_name) @import))
(import_from_statement module_name: (dotted_name) @import)
(import_from_statement module_name: (relative_import) @import)
"#;

pub const CLASS_SCOPES: &[&str] = &["class_definition"];

pub const FUNCTION_SCOPES: &[&str] = &["function_definition"];
