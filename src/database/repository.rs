/*!
 * Repository layer for the translate store.
 *
 * [`TranslateStore`] owns the `favorites` and `histories` tables and exposes
 * the same count/list/add/remove operations for both, plus one aggregate
 * read. Every failure is reported to the configured [`DiagnosticSink`]
 * before it is returned to the caller.
 */

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::OnceCell;
use rusqlite::{Connection, ErrorCode, params};
use std::path::Path;
use std::sync::Arc;

use super::connection::DatabaseConnection;
use super::models::{AllTranslates, Translate, TranslateTable};
use crate::app_config::StoreConfig;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::errors::{ConnectionClosed, StoreError, StoreResult};

/// Process-wide store, see [`TranslateStore::shared`]
static SHARED: OnceCell<TranslateStore> = OnceCell::new();

/// Which failure class an operation falls into when storage misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationKind {
    Open,
    Read,
    Write,
}

/// Persistent favorites/histories table pair
#[derive(Clone)]
pub struct TranslateStore {
    /// Database connection
    db: DatabaseConnection,
    /// Where failures are reported
    sink: Arc<dyn DiagnosticSink>,
}

impl TranslateStore {
    /// Create a store over an already opened connection, logging failures
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            sink: Arc::new(LogSink),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Open (creating if absent) the database file at `db_path`
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        Self::open_with_diagnostics(db_path, Arc::new(LogSink))
    }

    /// Open the database file at `db_path`, reporting every failure to `sink`,
    /// including a failure to open
    pub fn open_with_diagnostics<P: AsRef<Path>>(
        db_path: P,
        sink: Arc<dyn DiagnosticSink>,
    ) -> StoreResult<Self> {
        Self::from_open_outcome(DatabaseConnection::new(db_path), sink)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_open_outcome(DatabaseConnection::new_in_memory(), Arc::new(LogSink))
    }

    /// Open the database selected by `config`
    pub fn open_with_config(config: &StoreConfig) -> StoreResult<Self> {
        Self::open_with_config_and_diagnostics(config, Arc::new(LogSink))
    }

    /// Open the database selected by `config`, reporting failures to `sink`
    pub fn open_with_config_and_diagnostics(
        config: &StoreConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> StoreResult<Self> {
        let outcome = config
            .validate()
            .and_then(|_| config.resolve_database_path())
            .and_then(DatabaseConnection::new);
        Self::from_open_outcome(outcome, sink)
    }

    fn from_open_outcome(
        outcome: Result<DatabaseConnection>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> StoreResult<Self> {
        match outcome {
            Ok(db) => Ok(Self { db, sink }),
            Err(e) => {
                let error = classify(OperationKind::Open, &e);
                sink.report("open", &error);
                Err(error)
            }
        }
    }

    /// Open the process-wide store with `config`.
    ///
    /// Only the first successful call opens a database; later calls return
    /// the store that is already shared.
    pub fn init_shared(config: &StoreConfig) -> StoreResult<&'static TranslateStore> {
        Self::init_shared_with_diagnostics(config, Arc::new(LogSink))
    }

    /// Like [`init_shared`](Self::init_shared), reporting to `sink`.
    ///
    /// `sink` is ignored when the shared store is already open.
    pub fn init_shared_with_diagnostics(
        config: &StoreConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> StoreResult<&'static TranslateStore> {
        if let Some(store) = SHARED.get() {
            debug!("Shared store already open at {:?}", store.db.path());
            return Ok(store);
        }
        SHARED.get_or_try_init(|| Self::open_with_config_and_diagnostics(config, sink))
    }

    /// The process-wide store, opened at the default location on first use
    pub fn shared() -> StoreResult<&'static TranslateStore> {
        SHARED.get_or_try_init(|| Self::open_with_config(&StoreConfig::default()))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database. Every later operation fails with `StorageUnavailable`.
    pub fn close(&self) -> StoreResult<()> {
        let outcome = self.db.close();
        self.finish("close", OperationKind::Open, outcome)
    }

    // =========================================================================
    // Table Operations
    // =========================================================================

    /// Number of records stored in `table`
    pub async fn count(&self, table: TranslateTable) -> StoreResult<usize> {
        let outcome = self
            .db
            .execute_async(move |conn| Self::count_sync(conn, table))
            .await;

        self.finish(&format!("count {}", table), OperationKind::Read, outcome)
    }

    /// Up to `limit` records of `table`, newest first.
    ///
    /// `None` selects the table's default limit.
    pub async fn list(
        &self,
        table: TranslateTable,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Translate>> {
        let limit = limit.unwrap_or_else(|| table.default_limit());
        let outcome = self
            .db
            .execute_async(move |conn| Self::list_sync(conn, table, limit))
            .await;

        self.finish(&format!("list {}", table), OperationKind::Read, outcome)
    }

    /// Insert `record` under a freshly assigned id, then return the default-size list.
    ///
    /// Any id already set on `record` is ignored. The insert and the re-read
    /// share one transaction, so a failure persists nothing.
    pub async fn add(&self, table: TranslateTable, record: &Translate) -> StoreResult<Vec<Translate>> {
        let record = record.clone();
        let limit = table.default_limit();

        let outcome = self
            .db
            .transaction_async(move |tx| {
                let id = Self::insert_sync(tx, table, &record)?;
                debug!("Added {} record {}", table, id);
                Self::list_sync(tx, table, limit)
            })
            .await;

        self.finish(&format!("add {}", table), OperationKind::Write, outcome)
    }

    /// Delete the record carrying `record`'s id, then return up to `limit` records.
    ///
    /// Deleting an absent id, or a record that was never stored, is not an error.
    pub async fn remove(
        &self,
        table: TranslateTable,
        record: &Translate,
        limit: usize,
    ) -> StoreResult<Vec<Translate>> {
        let id = record.id;

        let outcome = self
            .db
            .transaction_async(move |tx| {
                match id {
                    Some(id) => {
                        let deleted = tx.execute(
                            &format!("DELETE FROM {} WHERE id = ?1", table),
                            [id],
                        )?;
                        if deleted == 0 {
                            debug!("No {} record with id {}, nothing removed", table, id);
                        } else {
                            debug!("Removed {} record {}", table, id);
                        }
                    }
                    None => debug!("{} record without id, nothing removed", table),
                }
                Self::list_sync(tx, table, limit)
            })
            .await;

        self.finish(&format!("remove {}", table), OperationKind::Write, outcome)
    }

    /// Counts and default-size lists of both tables.
    ///
    /// The four reads run concurrently and the first failure fails the whole view.
    pub async fn get_all(&self) -> StoreResult<AllTranslates> {
        let (favorites_count, histories_count, favorites, histories) = futures::try_join!(
            self.count(TranslateTable::Favorites),
            self.count(TranslateTable::Histories),
            self.list(TranslateTable::Favorites, None),
            self.list(TranslateTable::Histories, None),
        )?;

        Ok(AllTranslates {
            favorites_count,
            histories_count,
            favorites,
            histories,
        })
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub async fn favorites_count(&self) -> StoreResult<usize> {
        self.count(TranslateTable::Favorites).await
    }

    pub async fn get_favorites(&self, limit: Option<usize>) -> StoreResult<Vec<Translate>> {
        self.list(TranslateTable::Favorites, limit).await
    }

    pub async fn add_favorite(&self, record: &Translate) -> StoreResult<Vec<Translate>> {
        self.add(TranslateTable::Favorites, record).await
    }

    pub async fn remove_favorite(
        &self,
        record: &Translate,
        limit: usize,
    ) -> StoreResult<Vec<Translate>> {
        self.remove(TranslateTable::Favorites, record, limit).await
    }

    // =========================================================================
    // Histories
    // =========================================================================

    pub async fn histories_count(&self) -> StoreResult<usize> {
        self.count(TranslateTable::Histories).await
    }

    pub async fn get_histories(&self, limit: Option<usize>) -> StoreResult<Vec<Translate>> {
        self.list(TranslateTable::Histories, limit).await
    }

    pub async fn add_history(&self, record: &Translate) -> StoreResult<Vec<Translate>> {
        self.add(TranslateTable::Histories, record).await
    }

    pub async fn remove_history(
        &self,
        record: &Translate,
        limit: usize,
    ) -> StoreResult<Vec<Translate>> {
        self.remove(TranslateTable::Histories, record, limit).await
    }

    // =========================================================================
    // Synchronous helpers (run inside spawn_blocking)
    // =========================================================================

    fn count_sync(conn: &Connection, table: TranslateTable) -> Result<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn list_sync(conn: &Connection, table: TranslateTable, limit: usize) -> Result<Vec<Translate>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(&format!(
            "SELECT id, date, source_json, result_json FROM {} ORDER BY id DESC LIMIT ?1",
            table
        ))?;

        let records = stmt
            .query_map([limit], row_to_translate)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    fn insert_sync(conn: &Connection, table: TranslateTable, record: &Translate) -> Result<i64> {
        let source_json = serde_json::to_string(&record.source)?;
        let result_json = serde_json::to_string(&record.result)?;

        conn.execute(
            &format!(
                r#"
                INSERT INTO {} (date, source_text, result_text, source_json, result_json)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                table
            ),
            params![
                record.date_column(),
                record.source.text,
                record.result.text,
                source_json,
                result_json,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Report a failed outcome to the sink and convert it for the caller
    fn finish<T>(&self, operation: &str, kind: OperationKind, outcome: Result<T>) -> StoreResult<T> {
        outcome.map_err(|e| {
            let error = classify(kind, &e);
            self.sink.report(operation, &error);
            error
        })
    }
}

impl std::fmt::Debug for TranslateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateStore")
            .field("path", &self.db.path())
            .field("open", &self.db.is_open())
            .finish()
    }
}

fn row_to_translate(row: &rusqlite::Row) -> rusqlite::Result<Translate> {
    let date: String = row.get(1)?;
    let date = DateTime::parse_from_rfc3339(&date)
        .map_err(|e| conversion_error(1, e))?
        .with_timezone(&Utc);

    let source_json: String = row.get(2)?;
    let result_json: String = row.get(3)?;

    Ok(Translate {
        id: Some(row.get(0)?),
        date,
        source: serde_json::from_str(&source_json).map_err(|e| conversion_error(2, e))?,
        result: serde_json::from_str(&result_json).map_err(|e| conversion_error(3, e))?,
    })
}

fn conversion_error<E>(column: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(error))
}

/// Map an internal error onto the public taxonomy
fn classify(kind: OperationKind, error: &anyhow::Error) -> StoreError {
    let description = format!("{:#}", error);

    if storage_unavailable(error) {
        return StoreError::StorageUnavailable(description);
    }

    match kind {
        OperationKind::Open => StoreError::StorageUnavailable(description),
        OperationKind::Read => StoreError::ReadFailure(description),
        OperationKind::Write => StoreError::WriteFailure(description),
    }
}

fn storage_unavailable(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        if cause.downcast_ref::<ConnectionClosed>().is_some() {
            return true;
        }
        cause
            .downcast_ref::<rusqlite::Error>()
            .and_then(|e| e.sqlite_error_code())
            .is_some_and(|code| {
                matches!(
                    code,
                    ErrorCode::CannotOpen
                        | ErrorCode::PermissionDenied
                        | ErrorCode::NotADatabase
                        | ErrorCode::DatabaseCorrupt
                )
            })
    })
}
