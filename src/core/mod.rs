// EMR Log Analyser - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: ui, platform, app, or open files directly.

pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod stats;
