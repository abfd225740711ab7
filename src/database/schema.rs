/*!
 * Database schema definitions.
 *
 * Both record tables share one layout. `AUTOINCREMENT` keeps the highest
 * assigned id in `sqlite_sequence`, so ids are never reused, not even after
 * the newest record is deleted and the database is reopened.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use super::models::TranslateTable;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unknown database schema v{}, expected v{}",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .context("Failed to read schema version")?;

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// DDL for one record table and its secondary indexes
fn translate_table_sql(table: TranslateTable) -> String {
    let name = table.as_str();
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            source_text TEXT NOT NULL,
            result_text TEXT NOT NULL,
            source_json TEXT NOT NULL,
            result_json TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{name}_date ON {name}(date);
        CREATE INDEX IF NOT EXISTS idx_{name}_source_text ON {name}(source_text);
        CREATE INDEX IF NOT EXISTS idx_{name}_result_text ON {name}(result_text);
        "#
    )
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases silently keep "memory"
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    for table in TranslateTable::ALL {
        conn.execute_batch(&translate_table_sql(table))
            .with_context(|| format!("Failed to create table {}", table))?;
    }

    info!("Database schema created successfully");
    Ok(())
}
