//! Domain logic for the wiki: page paths, permission resolution, the edit
//! arbiter's decision rule, validation, and search helpers.
//!
//! This crate has no internal dependencies and performs no I/O, so the
//! repository layer and the HTTP layer can both build on it.

pub mod comment;
pub mod diff;
pub mod error;
pub mod path;
pub mod permission;
pub mod revision;
pub mod search;
pub mod types;
pub mod wiki;
