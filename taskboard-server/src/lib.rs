//! `TaskBoard` task API server library.
//!
//! Exposes the HTTP routes and the JSON-file task store for use in tests
//! and embedding. The server owns the authoritative task list; board
//! clients fetch it wholesale and persist one task at a time.

pub mod config;
pub mod server;
pub mod store;
