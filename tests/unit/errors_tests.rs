/*!
 * Tests for error types
 */

use translate_store::StoreError;

#[test]
fn test_storageUnavailable_shouldDisplayCorrectly() {
    let error = StoreError::StorageUnavailable("permission denied".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Storage unavailable"));
    assert!(display.contains("permission denied"));
}

#[test]
fn test_writeFailure_shouldDisplayCorrectly() {
    let error = StoreError::WriteFailure("disk I/O error".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Write failed"));
    assert!(display.contains("disk I/O error"));
}

#[test]
fn test_readFailure_shouldDisplayCorrectly() {
    let error = StoreError::ReadFailure("no such table".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Read failed"));
    assert!(display.contains("no such table"));
}

#[test]
fn test_description_shouldStripVariantPrefix() {
    let error = StoreError::WriteFailure("constraint".to_string());
    assert_eq!(error.description(), "constraint");
}
