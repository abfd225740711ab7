/*!
 * Database connection management.
 *
 * This module handles SQLite connection creation, initialization and
 * closing, and provides async-safe access using tokio's spawn_blocking.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::models::TranslateTable;
use super::schema;
use crate::errors::ConnectionClosed;

/// Path reported for in-memory databases
const IN_MEMORY_PATH: &str = ":memory:";

type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Connection, `None` once closed
    connection: SharedConnection,
}

impl DatabaseConnection {
    /// Open (creating if absent) the database at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            connection: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        lock(&self.connection).map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Close the connection. Later operations fail with [`ConnectionClosed`].
    pub fn close(&self) -> Result<()> {
        let mut guard = lock(&self.connection)?;

        match guard.take() {
            Some(conn) => {
                info!("Closing database at: {:?}", self.db_path);
                conn.close().map_err(|(conn, e)| {
                    // Keep the connection usable if SQLite refused to close it
                    *guard = Some(conn);
                    anyhow::Error::new(e).context("Failed to close database")
                })
            }
            None => {
                debug!("Database at {:?} already closed", self.db_path);
                Ok(())
            }
        }
    }

    /// Execute a database operation with the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = lock(&self.connection)?;
        let conn = guard.as_ref().ok_or(ConnectionClosed)?;

        f(conn)
    }

    /// Execute a database operation asynchronously using spawn_blocking
    ///
    /// This is the preferred method for async contexts as it prevents
    /// blocking the async runtime.
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let guard = lock(&shared)?;
            let conn = guard.as_ref().ok_or(ConnectionClosed)?;

            f(conn)
        })
        .await
        .context("Database task panicked")?
    }

    /// Begin a transaction and execute operations within it
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T>,
    {
        let mut guard = lock(&self.connection)?;
        let conn = guard.as_mut().ok_or(ConnectionClosed)?;

        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }

    /// Begin an async transaction and execute operations within it
    ///
    /// The transaction rolls back if the closure returns an error.
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&shared)?;
            let conn = guard.as_mut().ok_or(ConnectionClosed)?;

            let tx = conn.transaction()?;
            let result = f(&tx)?;
            tx.commit()?;

            Ok(result)
        })
        .await
        .context("Database transaction task panicked")?
    }

    /// Vacuum the database to reclaim space
    pub fn vacuum(&self) -> Result<()> {
        self.execute(|conn| {
            conn.execute("VACUUM", [])?;
            Ok(())
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        let (favorites_count, histories_count) = self.execute(|conn| {
            let mut counts = [0i64; 2];
            for (slot, table) in counts.iter_mut().zip(TranslateTable::ALL) {
                *slot = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            }
            Ok((counts[0], counts[1]))
        })?;

        let file_size_bytes = if self.db_path.as_os_str() != IN_MEMORY_PATH {
            std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(DatabaseStats {
            favorites_count,
            histories_count,
            file_size_bytes,
        })
    }
}

fn lock(shared: &SharedConnection) -> Result<MutexGuard<'_, Option<Connection>>> {
    shared
        .lock()
        .map_err(|e| anyhow::anyhow!("Failed to acquire database lock: {}", e))
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of favorite records
    pub favorites_count: i64,
    /// Number of history records
    pub histories_count: i64,
    /// Database file size in bytes (0 for in-memory databases)
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Favorites: {}, Histories: {}, Size: {} KB",
            self.favorites_count,
            self.histories_count,
            self.file_size_bytes / 1024
        )
    }
}
