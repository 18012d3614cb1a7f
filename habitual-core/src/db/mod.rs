//! Database layer for habitual
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for habit and event queries

pub mod repo;
pub mod schema;

pub use repo::Database;
