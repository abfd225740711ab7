/*!
 * Integration tests for opening, closing and reopening on-disk stores
 */

use anyhow::Result;
use std::sync::Arc;
use translate_store::{MemorySink, StoreConfig, StoreError, TranslateStore, TranslateTable};
use crate::common;

/// Ids keep growing after the newest record is deleted and the store reopened
#[tokio::test]
async fn test_reopen_afterDeletingNewest_shouldNotReuseIds() -> Result<()> {
    common::init_test_logging();
    let dir = common::create_temp_dir()?;
    let path = common::database_path(&dir);

    {
        let (store, _) = common::open_store(&path)?;
        for n in 1..=3 {
            store.add_history(&common::sample_translate(n)).await?;
        }
        let newest = store.get_histories(Some(1)).await?.remove(0);
        store.remove_history(&newest, 32).await?;
        store.close()?;
    }

    let (store, sink) = common::open_store(&path)?;
    assert_eq!(store.histories_count().await?, 2);

    let list = store.add_history(&common::sample_translate(4)).await?;
    assert_eq!(common::ids(&list), vec![4, 2, 1]);
    assert!(sink.is_empty());

    Ok(())
}

/// Records survive a close/reopen cycle unchanged
#[tokio::test]
async fn test_reopen_shouldReturnSameRecords() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(&dir);

    let before = {
        let (store, _) = common::open_store(&path)?;
        store.add_favorite(&common::sample_translate(1)).await?;
        let all = store.add_favorite(&common::sample_translate(2)).await?;
        store.close()?;
        all
    };

    let (store, _) = common::open_store(&path)?;
    let after = store.get_favorites(None).await?;

    assert_eq!(before, after);
    assert_eq!(after[0].source.text, "hello 2");
    assert_eq!(after[0].result.extra["lang"], "fr");

    Ok(())
}

/// A path that cannot be created is reported as unavailable storage
#[test]
fn test_open_withBlockedParent_shouldBeStorageUnavailable() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory")?;

    let sink = Arc::new(MemorySink::new());

    let err = TranslateStore::open_with_diagnostics(
        blocker.join("nested").join("db.sqlite"),
        sink.clone(),
    )
    .unwrap_err();

    assert!(matches!(err, StoreError::StorageUnavailable(_)), "got {:?}", err);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.reports()[0].operation, "open");
    Ok(())
}

/// A file that is not a SQLite database cannot be opened
#[test]
fn test_open_withGarbageFile_shouldBeStorageUnavailable() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(&dir);
    std::fs::write(&path, vec![0x42u8; 4096])?;

    let err = TranslateStore::open(&path).unwrap_err();

    assert!(matches!(err, StoreError::StorageUnavailable(_)), "got {:?}", err);
    Ok(())
}

/// A closed store refuses every operation, including the aggregate read
#[test]
fn test_closedStore_getAll_shouldBeStorageUnavailable() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (store, sink) = common::open_store(&common::database_path(&dir))?;

    store.close()?;
    let result = tokio_test::block_on(async {
        // spawn_blocking needs a runtime; tokio_test provides a current-thread one
        store.get_all().await
    });

    assert!(matches!(result, Err(StoreError::StorageUnavailable(_))));
    assert!(!sink.is_empty());
    Ok(())
}

/// The process-wide store is opened once and then reused
#[tokio::test]
async fn test_initShared_shouldReturnSameInstance() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = StoreConfig::with_database_path(common::database_path(&dir));

    let first = TranslateStore::init_shared(&config)?;
    let second = TranslateStore::shared()?;
    assert!(std::ptr::eq(first, second));

    let before = second.count(TranslateTable::Favorites).await?;
    first.add(TranslateTable::Favorites, &common::sample_translate(1)).await?;
    assert_eq!(second.count(TranslateTable::Favorites).await?, before + 1);

    first.close()?;
    Ok(())
}

/// Stats reflect both tables and the file on disk
#[tokio::test]
async fn test_stats_shouldCountBothTables() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(&dir);
    let (store, _) = common::open_store(&path)?;

    store.add_favorite(&common::sample_translate(1)).await?;
    for n in 1..=2 {
        store.add_history(&common::sample_translate(n)).await?;
    }

    let stats = store.connection().stats()?;
    assert_eq!(stats.favorites_count, 1);
    assert_eq!(stats.histories_count, 2);

    store.connection().vacuum()?;
    store.close()?;

    // Closing the last connection checkpoints the WAL into the main file
    assert!(std::fs::metadata(&path)?.len() > 0);
    Ok(())
}
