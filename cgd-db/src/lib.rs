//! In-memory SQLite database layer for COVID-19 country time-series data.
//!
//! This crate provides a shared database abstraction that loads CSV data
//! into an in-memory SQLite database and exposes typed query methods for
//! consumption by Dioxus/D3.js dashboard applications compiled to WASM.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite` (compiles to WASM via `wasm32-unknown-unknown`)
//! - CSV data loaded via `include_str!` at compile time in consuming crates
//! - Typed query methods returning serializable structs for JSON export to D3.js
//!
//! # Usage
//!
//! ```rust
//! use cgd_db::Database;
//!
//! let db = Database::new().unwrap();
//!
//! // Load CSV data (typically via include_str! in the consuming crate)
//! db.load_countries("ISO_CODE,NAME,CONTINENT,POPULATION\nUSA,United States,North America,331000000\n").unwrap();
//! db.load_observations("USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000\n").unwrap();
//!
//! // Query typed results
//! let countries = db.query_countries().unwrap();
//! let (min_date, max_date) = db.query_date_range().unwrap();
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `countries` - Country metadata (ISO code, name, continent, population)
//! - `observations` - Daily per-country case/death/hospital/vaccination counts
//!
//! Derived figures (summary totals, rates, correlations) are computed
//! on the fly from these base tables plus `cgd-data` transforms.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database wrapping COVID country observations.
///
/// This struct is cheaply cloneable (via `Rc`) and suitable for sharing
/// across Dioxus components in a single-threaded WASM environment.
///
/// # Example
///
/// ```rust
/// use cgd_db::Database;
///
/// let db = Database::new().unwrap();
/// db.load_countries("ISO_CODE,NAME,CONTINENT,POPULATION\nKEN,Kenya,Africa,53000000\n").unwrap();
/// let countries = db.query_countries().unwrap();
/// assert_eq!(countries.len(), 1);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        // Both should reference the same underlying connection
        db.load_countries(
            "ISO_CODE,NAME,CONTINENT,POPULATION\nUSA,United States,North America,331000000\n",
        )
        .unwrap();
        let countries = db2.query_countries().unwrap();
        assert_eq!(countries.len(), 1, "Clone should see same data via shared Rc");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        let countries = db.query_countries().unwrap();
        assert!(countries.is_empty(), "New database should have no countries");
    }
}
