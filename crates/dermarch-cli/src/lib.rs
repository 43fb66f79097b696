//! Library components backing the `dermarch` binary.
//!
//! The binary keeps argument parsing and terminal rendering to itself;
//! everything that loads, mutates, or saves image records lives here so
//! integration tests can drive it directly.

pub mod ingest;
pub mod logging;
pub mod store;
