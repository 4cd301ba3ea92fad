use spendbook_core::storage::{load_book, save_book, LocalStore};
use spendbook_domain::{Book, Category};
use spendbook_storage_json::{save_text_to_path, load_text_from_path, JsonFileStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn json_store_persists_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let data = dir.path().join("data");
    let backups = dir.path().join("backups");

    let store = JsonFileStore::open(data.clone(), backups.clone()).expect("open store");
    store.set("tempUserId", "temp_1").expect("set");
    store.set("lastActivity_temp_1", "2024-01-01T00:00:00Z").expect("set");
    store.remove("lastActivity_temp_1").expect("remove");
    assert!(store.path().exists());
    drop(store);

    let reopened = JsonFileStore::open(data, backups).expect("reopen");
    assert_eq!(reopened.get("tempUserId").unwrap().as_deref(), Some("temp_1"));
    assert_eq!(reopened.keys().unwrap(), vec!["tempUserId".to_string()]);
}

#[test]
fn json_store_round_trips_a_book() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("data"), dir.path().join("backups"))
        .expect("open store");
    let mut book = Book::new();
    book.insert_category("travel", Category::new("Travel", "fas fa-plane"));

    save_book(&store, "u1", &book, chrono::Utc::now()).expect("save");
    let loaded = load_book(&store, "u1").expect("load");
    assert_eq!(loaded.slugs(), vec!["daily", "travel"]);
}

#[test]
fn json_store_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("data"), dir.path().join("backups"))
        .expect("open store");
    store.set("categories_u1", "{}").expect("set");

    let info = store.backup(Some("before import")).expect("backup");
    assert!(info.id.ends_with("_before-import.json"), "unexpected id {}", info.id);
    let listed = store.list_backups().expect("list");
    assert!(listed.iter().any(|entry| entry.id == info.id));

    store.set("categories_u1", "{\"changed\":true}").expect("overwrite");
    store.restore_backup(&info).expect("restore");
    assert_eq!(store.get("categories_u1").unwrap().as_deref(), Some("{}"));
}

#[test]
fn corrupt_store_file_opens_empty() {
    let dir = tempdir().expect("tempdir");
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("local_store.json"), "{broken").unwrap();

    let store = JsonFileStore::open(data, dir.path().join("backups")).expect("open store");
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn text_files_are_written_atomically() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("export.json");
    save_text_to_path(&path, "{\"version\":\"1.0.0\"}").expect("write");
    assert_eq!(load_text_from_path(&path).unwrap(), "{\"version\":\"1.0.0\"}");
    assert!(!dir.path().join("export.json.tmp").exists());
}
