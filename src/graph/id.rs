//
//  id.rs
//  graphgen
//

//! Stable node identifiers.
//!
//! An id is a pure function of `(kind, path, name, start_line)`. Re-running
//! generation over unchanged source yields the same ids, so two graphs
//! produced at different times can be diffed node by node.
//!
//! The canonical string joins the four parts with the ASCII unit separator,
//! which cannot appear in identifiers or normalised paths. It is hashed with
//! SHA-256 and the first 128 bits are hex-encoded. Collisions are possible in
//! principle (birthday bound around 2^64 nodes) and are not checked here;
//! `GraphDraft` drops and logs any duplicate id it sees within one run.

use sha2::{Digest, Sha256};

use super::types::NodeKind;

/// Separator between the canonical components.
const SEPARATOR: char = '\u{1f}';

/// Number of hex characters kept from the digest.
pub const ID_LEN: usize = 32;

/// Compute the id for a declaration.
pub fn assign(kind: &str, path: &str, name: &str, start_line: usize) -> String {
    let canonical = format!("{kind}{SEPARATOR}{path}{SEPARATOR}{name}{SEPARATOR}{start_line}");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();

    digest[..ID_LEN / 2]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// The four inputs of an id, kept together so callers cannot mix them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIdentity<'a> {
    pub kind: NodeKind,
    pub path: &'a str,
    pub name: &'a str,
    /// 0-based start row; `0` for file nodes.
    pub start_line: usize,
}

impl NodeIdentity<'_> {
    pub fn id(&self) -> String {
        assign(self.kind.as_str(), self.path, self.name, self.start_line)
    }
}
