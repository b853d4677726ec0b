//
//  rust.rs
//  graphgen
//

//! Rust structural patterns. Structs, enums and traits are class-like.

pub const CLASS: &str = r#"
(struct_item name: (type_identifier) @name) @definition.class
(enum_item name: (type_identifier) @name) @definition.class
(trait_item name: (type_identifier) @name) @definition.class
"#;

/// `fn` items anywhere, plus bodiless trait method signatures.
pub const FUNCTION: &str = r#"
(function_item name: (identifier) @name) @definition.function
(function_signature_item name: (identifier) @name) @definition.method
"#;

pub const IMPORT: &str = r#"
(use_declaration argument: (_) @import)
(extern_crate_declaration name: (identifier) @import)
"#;

pub const CLASS_SCOPES: &[&str] = &["impl_item", "trait_item"];

pub const FUNCTION_SCOPES: &[&str] = &["function_item", "closure_expression"];
