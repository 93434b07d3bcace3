// SimpleLogs - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file access.
// Dependencies: standard library, directories crate, core value types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
