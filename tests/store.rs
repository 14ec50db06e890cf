use camino::Utf8PathBuf;
use serde_json::json;

use fixture_extract::store::{DataStore, LAYOUT};

fn temp_store() -> (tempfile::TempDir, DataStore) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().join("data")).unwrap();
    (temp, DataStore::new(root))
}

#[test]
fn ensure_layout_is_idempotent() {
    let (_temp, store) = temp_store();
    store.ensure_layout().unwrap();
    store.ensure_layout().unwrap();

    for dir in LAYOUT {
        assert!(store.root().join(dir).is_dir(), "{dir} missing");
    }
}

#[test]
fn write_json_is_pretty_and_keeps_unicode() {
    let (_temp, store) = temp_store();
    let path = store.root().join("plans/details/m_30_plan_v1.json");

    DataStore::write_json(&path, &json!({"name": "Crème brûlée", "tiers": [1, 2]})).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "{\n  \"name\": \"Crème brûlée\",\n  \"tiers\": [\n    1,\n    2\n  ]\n}\n"
    );
}

#[test]
fn write_json_replaces_and_leaves_no_temp_files() {
    let (_temp, store) = temp_store();
    let path = store.merchants_index_path();

    DataStore::write_json(&path, &json!([1])).unwrap();
    DataStore::write_json(&path, &json!([2])).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n  2\n]\n");
    let entries: Vec<_> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("merchants.json")]);
}

#[test]
fn existing_ids_ignore_non_json_and_why() {
    let (_temp, store) = temp_store();
    assert!(store.existing_transaction_ids().unwrap().is_empty());

    store.ensure_layout().unwrap();
    let dir = store.transactions_dir();
    std::fs::write(dir.join("dd129486-0b41-4b60-b023-b84834eb88d1.json"), "{}").unwrap();
    std::fs::write(dir.join("notes.txt"), "").unwrap();
    std::fs::write(dir.join("why/dd120776-d050-44ad-a807-0881ec66b25c.json"), "{}").unwrap();

    let ids = store.existing_transaction_ids().unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(
        ids.iter().next().unwrap().as_str(),
        "dd129486-0b41-4b60-b023-b84834eb88d1"
    );
}
