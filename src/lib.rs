//! Stylemill - stylesheet build tool
//!
//! This library provides the build tasks behind the `sty` binary:
//! - Lint SCSS sources against a small rule set, incrementally
//! - Compile SCSS to CSS with source maps, vendor prefixes and optional
//!   minification
//! - Watch sources and rebuild on change, pushing live-reload events
//! - Clean previously generated output

pub mod clean;
pub mod cli;
pub mod compile;
pub mod config;
pub mod lint;
pub mod postprocess;
pub mod reload;
pub mod task;
pub mod watch;
