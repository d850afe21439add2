//! mediafetch Core
//!
//! Shared plumbing for the mediafetch crates: logging setup, profiling
//! scopes, math re-exports, hashed collections and JSON configuration files.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod math;
pub mod profiling;
