//
//  javascript.rs
//  graphgen
//

//! JavaScript structural patterns.

pub const CLASS: &str = r#"
(class_declaration name: (identifier) @name) @definition.class
"#;

/// Declared functions, class methods, and functions bound to a variable.
pub const FUNCTION: &str = r#"
(function_declaration name: (identifier) @name) @definition.function
(generator_function_declaration name: (identifier) @name) @definition.function
(method_definition name: (property_identifier) @name) @definition.method
(variable_declarator
  name: (identifier) @name
  value: [(arrow_function) (function_expression)]) @definition.function
"#;

/// Module specifiers of `import`, re-exporting `export ... from` and
/// `require("...")` calls.
pub const IMPORT: &str = r#"
(import_statement source: (string (string_fragment) @import))
(export_statement source: (string (string_fragment) @import))
(call_expression
  function: (identifier) @_require
  arguments: (arguments (string (string_fragment) @import))
  (#eq? @_require "require"))
"#;

pub const CLASS_SCOPES: &[&str] = &["class_declaration", "class"];

pub const FUNCTION_SCOPES: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "arrow_function",
    "method_definition",
];
