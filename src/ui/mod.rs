// EMR Log Analyser - ui/mod.rs
//
// Presentation layer: plain-text and coloured terminal rendering.

pub mod report;
pub mod summary;
pub mod theme;
