//! access-core: Shared infrastructure for the access crates.
pub mod config;
pub mod error;
pub mod observability;
