//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the agent's TOML file from the platform
//! config directory, falls back to defaults on first run, and can write the
//! effective settings back.

pub mod config;
