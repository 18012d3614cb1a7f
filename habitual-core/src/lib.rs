//! # habitual-core
//!
//! Core library for habitual - a tracker for recurring habits.
//!
//! This library provides:
//! - Domain types for habits, period types and timestamps
//! - The period index: timestamp → period key, previous/next period
//! - Streak analytics: bucketing, current and longest streaks
//! - Database storage layer with SQLite
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitual_core::analytics::HabitAnalytics;
//! use habitual_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let analytics = HabitAnalytics::new(&db);
//! let groups = analytics.group_by_period_type().expect("failed to group habits");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use period::{map_to_period, PeriodKey};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod period;
pub mod types;
