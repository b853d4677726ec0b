//
//  mod.rs
//  graphgen
//

//! Storage layer for graphgen.
//!
//! Reads and writes graph documents and statistics reports as JSON.

mod fs;

pub use fs::{load_graph, save_graph, save_report};
