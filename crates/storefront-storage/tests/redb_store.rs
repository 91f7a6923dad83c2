#![cfg(feature = "redb")]

use std::path::PathBuf;
use storefront_storage::redb::RedbStore;
use storefront_types::ports::key_value_store::KeyValueStore;

fn temp_db_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storefront-test.redb");
    (dir, path)
}

#[test]
fn redb_store_get_set_remove_flow() {
    let (_dir, path) = temp_db_path();
    let store = RedbStore::open(&path).unwrap();

    assert!(store.get("orders").unwrap().is_none());

    store.set("orders", b"[{\"id\":\"x\"}]").unwrap();
    assert_eq!(store.get("orders").unwrap().unwrap(), b"[{\"id\":\"x\"}]");

    store.set("orders", b"[]").unwrap();
    assert_eq!(store.get("orders").unwrap().unwrap(), b"[]");

    store.remove("orders").unwrap();
    assert!(store.get("orders").unwrap().is_none());

    store.remove("orders").unwrap();
}

#[test]
fn redb_store_survives_reopen() {
    let (_dir, path) = temp_db_path();

    {
        let store = RedbStore::open(&path).unwrap();
        store.set("current-cart-order-id", b"ORD-1-abc").unwrap();
    }

    let reopened = RedbStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("current-cart-order-id").unwrap().unwrap(),
        b"ORD-1-abc"
    );
}

#[test]
fn redb_store_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("kv.redb");

    let store = RedbStore::open(&path).unwrap();
    store.set("k", b"v").unwrap();
    assert_eq!(store.get("k").unwrap().unwrap(), b"v");
}
