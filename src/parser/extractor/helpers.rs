//
//  helpers.rs
//  graphgen
//

use tree_sitter::Node;

use crate::parser::queries::Scopes;

/// Get the trimmed text of a node, or `None` when it is empty or not UTF-8.
pub fn node_text(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Ancestors of a node, innermost first, excluding the node itself.
pub fn ancestors<'tree>(node: Node<'tree>) -> impl Iterator<Item = Node<'tree>> {
    std::iter::successors(node.parent(), |n| n.parent())
}

/// Whether the nearest enclosing declaration scope of `node` is class-like.
pub fn in_class_scope(node: Node, scopes: Scopes) -> bool {
    for parent in ancestors(node) {
        let kind = parent.kind();
        if scopes.class.contains(&kind) {
            return true;
        }
        if scopes.function.contains(&kind) {
            return false;
        }
    }
    false
}
