//! Kanban task board client library.
//!
//! Holds the local task collection, turns drag-and-drop gestures into
//! reorders, and keeps the collection in sync with the REST task API.

pub mod api;
pub mod board;
pub mod config;
pub mod notify;
