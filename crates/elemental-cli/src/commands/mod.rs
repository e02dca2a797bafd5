//! CLI command implementations

pub mod completions;
pub mod config;
pub mod elements;
pub mod search;
pub mod serve;
