//! Command implementations for the live-server CLI.
//!
//! There is a single command, [`serve`], which loads configuration, starts
//! the watcher and runs the HTTP server until Ctrl+C.

pub mod serve;

pub use serve::execute as serve_execute;
