/*!
 * Tests for store configuration loading and saving
 */

use std::path::PathBuf;

use translate_store::{LogLevel, StoreConfig, DATABASE_NAME, DEFAULT_LIMIT_FAVORITES, DEFAULT_LIMIT_HISTORIES};
use crate::common;

#[test]
fn test_constants_shouldMatchPublishedValues() {
    assert_eq!(DATABASE_NAME, "TG_TRANSLATES_TEST_1");
    assert_eq!(DEFAULT_LIMIT_FAVORITES, 32);
    assert_eq!(DEFAULT_LIMIT_HISTORIES, 32);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefault() {
    let dir = common::create_temp_dir().unwrap();
    let config_path = dir.path().join("conf.json");

    let config = StoreConfig::load_or_create(&config_path).expect("Failed to create config");

    assert_eq!(config, StoreConfig::default());
    assert!(config_path.exists());

    let written: StoreConfig =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(written, config);
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() {
    let dir = common::create_temp_dir().unwrap();
    let config_path = dir.path().join("conf.json");
    let db_path = dir.path().join("store.sqlite");

    let mut config = StoreConfig::with_database_path(&db_path);
    config.log_level = LogLevel::Debug;
    config.save(&config_path).unwrap();

    let loaded = StoreConfig::load_or_create(&config_path).unwrap();

    assert_eq!(loaded.database_path, Some(db_path.clone()));
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.resolve_database_path().unwrap(), db_path);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let config_path = dir.path().join("conf.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    assert!(StoreConfig::load_or_create(&config_path).is_err());
}

#[test]
fn test_loadOrCreate_withDirectoryDatabasePath_shouldFailValidation() {
    let dir = common::create_temp_dir().unwrap();
    let config_path = dir.path().join("conf.json");

    StoreConfig::with_database_path(PathBuf::from(dir.path()))
        .save(&config_path)
        .unwrap();

    assert!(StoreConfig::load_or_create(&config_path).is_err());
}
