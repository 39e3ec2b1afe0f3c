// EMR Log Analyser - lib.rs
//
// Library entry point. The binary in `main.rs` is a thin clap front-end over
// these modules; integration tests drive them directly.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
