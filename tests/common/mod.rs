/*!
 * Common test utilities for the translate-store test suite
 */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;
use translate_store::{MemorySink, Translate, TranslateStore, TranslateText};

/// Route library logs to the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test databases
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Database file path inside `dir`
pub fn database_path(dir: &TempDir) -> PathBuf {
    dir.path().join("translates.sqlite")
}

/// Opens a store on disk with an in-memory diagnostic sink
pub fn open_store(path: &PathBuf) -> Result<(TranslateStore, Arc<MemorySink>)> {
    let sink = Arc::new(MemorySink::new());
    let store = TranslateStore::open_with_diagnostics(path, sink.clone())?;
    Ok((store, sink))
}

/// Builds an English to French record numbered `n`
pub fn sample_translate(n: usize) -> Translate {
    Translate::new(
        TranslateText::new(format!("hello {}", n)).with_field("lang", "en"),
        TranslateText::new(format!("bonjour {}", n)).with_field("lang", "fr"),
    )
}

/// Ids of a list, in list order
pub fn ids(records: &[Translate]) -> Vec<i64> {
    records.iter().filter_map(|r| r.id).collect()
}
