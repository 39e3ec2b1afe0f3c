// EMR Log Analyser - app/mod.rs
//
// Application layer: file ingestion and analysis orchestration.
// Dependencies: core layer.
// Must NOT depend on: ui.

pub mod analyse;
pub mod ingest;
