//! Database repository layer
//!
//! Provides query and insert operations for habits and their events.

use crate::analytics::HabitSource;
use crate::error::{Error, Result};
use crate::types::*;
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Database handle around a single SQLite connection
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.connection();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Create a habit, stamped with the current local time.
    ///
    /// Fails with [`Error::HabitExists`] when the name is taken and with
    /// [`Error::InvalidRequiredCount`] unless the required count is positive.
    pub fn create_habit(&self, habit: &NewHabit) -> Result<Habit> {
        let required_count = u32::try_from(habit.required_count)
            .ok()
            .filter(|&count| count > 0)
            .ok_or(Error::InvalidRequiredCount(habit.required_count))?;
        let created_at = Local::now().naive_local();

        let conn = self.connection();
        if Self::find_habit_id(&conn, &habit.name)?.is_some() {
            return Err(Error::HabitExists(habit.name.clone()));
        }

        conn.execute(
            r#"
            INSERT INTO habits (name, description, period_type, required_count, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                habit.name,
                habit.description,
                habit.period_type.code(),
                required_count,
                format_timestamp(&created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!(
            habit = %habit.name,
            period_type = %habit.period_type,
            required_count,
            "Created habit"
        );

        Ok(Habit {
            id,
            name: habit.name.clone(),
            description: habit.description.clone(),
            period_type: habit.period_type,
            required_count,
            created_at,
        })
    }

    /// Get a habit by its unique name
    pub fn get_habit_by_name(&self, name: &str) -> Result<Option<Habit>> {
        let conn = self.connection();
        conn.query_row(
            "SELECT * FROM habits WHERE name = ?",
            [name],
            Self::row_to_habit,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Get a habit by ID
    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>> {
        let conn = self.connection();
        conn.query_row("SELECT * FROM habits WHERE id = ?", [id], Self::row_to_habit)
            .optional()
            .map_err(Error::from)
    }

    /// List all habits in creation order
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT * FROM habits ORDER BY id")?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    /// Delete a habit by name; its events go with it.
    pub fn delete_habit(&self, name: &str) -> Result<()> {
        let conn = self.connection();
        let deleted = conn.execute("DELETE FROM habits WHERE name = ?", [name])?;
        if deleted == 0 {
            return Err(Error::HabitNotFound(name.to_string()));
        }
        tracing::info!(habit = %name, "Deleted habit");
        Ok(())
    }

    fn find_habit_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
        conn.query_row("SELECT id FROM habits WHERE name = ?", [name], |r| r.get(0))
            .optional()
            .map_err(Error::from)
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let period_code: i64 = row.get("period_type")?;
        let required: i64 = row.get("required_count")?;
        let created_at_str: String = row.get("created_at")?;

        let period_type = PeriodType::from_code(period_code).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e))
        })?;
        let required_count = u32::try_from(required).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e))
        })?;
        let created_at = parse_timestamp(&created_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?;

        Ok(Habit {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            period_type,
            required_count,
            created_at,
        })
    }

    // ============================================
    // Event operations
    // ============================================

    /// Record one completion of the named habit.
    pub fn record_event(&self, name: &str, occurred_at: &NaiveDateTime) -> Result<()> {
        let conn = self.connection();
        let habit_id = Self::find_habit_id(&conn, name)?
            .ok_or_else(|| Error::HabitNotFound(name.to_string()))?;

        conn.execute(
            "INSERT INTO events (habit_id, occurred_at) VALUES (?1, ?2)",
            params![habit_id, format_timestamp(occurred_at)],
        )?;

        tracing::info!(habit = %name, occurred_at = %occurred_at, "Recorded event");
        Ok(())
    }

    /// All event timestamps of a habit, oldest first
    pub fn get_habit_events(&self, habit_id: i64) -> Result<Vec<NaiveDateTime>> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT occurred_at FROM events WHERE habit_id = ? ORDER BY occurred_at")?;
        let raw: Vec<String> = stmt
            .query_map([habit_id], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        raw.iter().map(|s| parse_timestamp(s)).collect()
    }

    /// Count events of a single habit
    pub fn count_habit_events(&self, habit_id: i64) -> Result<i64> {
        let conn = self.connection();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM events WHERE habit_id = ?",
            [habit_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    // ============================================
    // Statistics
    // ============================================

    /// Count stored habits
    pub fn count_habits(&self) -> Result<i64> {
        let conn = self.connection();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM habits", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Count events across all habits
    pub fn count_events(&self) -> Result<i64> {
        let conn = self.connection();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |r| r.get(0))?;
        Ok(count)
    }
}

impl HabitSource for Database {
    fn resolve_habit(&self, name: &str) -> Result<Option<Habit>> {
        self.get_habit_by_name(name)
    }

    fn fetch_events(&self, habit_id: i64) -> Result<Vec<NaiveDateTime>> {
        self.get_habit_events(habit_id)
    }

    fn list_habits(&self) -> Result<Vec<Habit>> {
        Database::list_habits(self)
    }
}
