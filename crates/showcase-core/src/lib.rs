// Library root: re-exports all modules so integration tests and the binaries
// can reach the crate's public API.

pub mod app;
pub mod config;
pub mod distribute;
pub mod ingest;
pub mod roster;
pub mod source;
