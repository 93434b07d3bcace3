// SimpleLogs - app/mod.rs
//
// Application layer: the entry collection, its persistence, imports and the
// command handlers.
// Dependencies: core, platform, util.

pub mod commands;
pub mod import;
pub mod repository;
pub mod store;
