// SimpleLogs - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or touch the filesystem directly.

pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod stats;
pub mod timeline;
