/*!
 * # translate-store
 *
 * Local persistence for translation records, kept in two independent,
 * bounded tables: `favorites` and `histories`.
 *
 * ## Features
 *
 * - SQLite storage with durable, never reused record ids
 * - Newest-first bounded retrieval with per-table default limits
 * - Atomic add/remove that hand back the refreshed list
 * - One aggregate read across both tables
 * - Failures reported to a pluggable diagnostic sink before being returned
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration and the fixed store constants
 * - `database`: SQLite persistence:
 *   - `database::connection`: Connection lifecycle and async access
 *   - `database::schema`: Table definitions and schema versioning
 *   - `database::models`: Record types
 *   - `database::repository`: The `TranslateStore` operations
 * - `diagnostics`: Sinks receiving store failures
 * - `logging`: Colored stderr logger for embedding applications
 * - `errors`: Error taxonomy surfaced to callers
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod diagnostics;
pub mod errors;
pub mod logging;

// Re-export main types for easier usage
pub use app_config::{
    DATABASE_NAME, DEFAULT_LIMIT_FAVORITES, DEFAULT_LIMIT_HISTORIES, LogLevel, StoreConfig,
};
pub use database::{AllTranslates, Translate, TranslateStore, TranslateTable, TranslateText};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink};
pub use errors::{StoreError, StoreResult};
