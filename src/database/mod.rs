/*!
 * Database module for persistent storage of translation records.
 *
 * This module provides SQLite-based persistence for:
 * - Favorite translations
 * - Translation history
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{AllTranslates, Translate, TranslateTable, TranslateText};
pub use repository::TranslateStore;
