//! Verba: read-through, write-invalidate caching for a translation store.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
