//! SQLite persistence for the fleet.
//!
//! A [`Database`] is a cheap, cloneable handle around one connection. Each
//! entity's operations live in their own submodule as inherent methods.

mod assignments;
mod cars;
mod drivers;
mod manufacturers;
pub mod schema;
mod sessions;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Transaction};

use crate::error::{EntityKind, Error, Result};
use crate::filter::{self, FilterPredicate};
use crate::models::FleetSummary;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::validation::ValidationErrors;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    page_size: u32,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Opens `taxi.db` in the platform data directory, creating the
    /// directory if needed.
    pub fn open_default() -> anyhow::Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }
        Ok(Self::open(&path)?)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "taxi")
            .context("could not determine a home directory for the database")?;
        Ok(dirs.data_dir().join("taxi.db"))
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.create_scalar_function(
            "icontains",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let haystack: String = ctx.get(0)?;
                let needle: String = ctx.get(1)?;
                Ok(filter::icontains(&haystack, &needle))
            },
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(schema::SCHEMA)?;
            tracing::debug!("Database schema is up to date");
            Ok(())
        })
    }

    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock();
        f(&conn)
    }

    /// Runs `f` in a transaction that commits only if `f` succeeds.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fleet_summary(&self) -> Result<FleetSummary> {
        Ok(FleetSummary {
            num_drivers: self.count_drivers()?,
            num_cars: self.count_cars()?,
            num_manufacturers: self.count_manufacturers()?,
        })
    }
}

/// The needle to bind for a search on `field`, `None` for the identity
/// predicate. Queries use it as `(?1 IS NULL OR icontains(column, ?1))`.
fn search_needle<'a>(filter: &'a FilterPredicate, field: &str) -> Result<Option<&'a str>> {
    match filter {
        FilterPredicate::All => Ok(None),
        FilterPredicate::Contains { field: f, needle } if f == field => Ok(Some(needle.as_str())),
        FilterPredicate::Contains { field: f, .. } => {
            let mut errors = ValidationErrors::new();
            errors.add(f.as_str(), format!("Cannot search on {}; expected {}.", f, field));
            Err(Error::Validation(errors))
        }
    }
}

fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<u64> {
    let n: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(u64::try_from(n).unwrap_or_default())
}

fn exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table);
    Ok(conn.query_row(&sql, [id], |row| row.get(0))?)
}

fn require<T>(value: Option<T>, kind: EntityKind, id: i64) -> Result<T> {
    value.ok_or_else(|| Error::not_found(kind, id))
}
