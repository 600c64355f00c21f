//! Configuration module for the stylemill build tasks
//!
//! Provides types and parsing for `stylemill.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
