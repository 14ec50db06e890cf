use std::collections::BTreeSet;
use std::fs;

use fixture_extract::discovery::{WorkSet, extract_transaction_ids, scan_transaction_ids};
use fixture_extract::domain::TransactionId;
use fixture_extract::store::DataStore;

const TX_A: &str = "dd129486-0b41-4b60-b023-b84834eb88d1";
const TX_B: &str = "dd120776-d050-44ad-a807-0881ec66b25c";
const TX_C: &str = "dd12603e-30b4-4893-b057-d1424ce10003";

fn ids(values: &[&str]) -> BTreeSet<TransactionId> {
    values.iter().map(|value| TransactionId::new(*value)).collect()
}

#[test]
fn extract_ids_from_noisy_text() {
    let text = format!(
        "prefix {{\"transaction_id\": \"{TX_A}\"}} junk \"transaction_id\":\"{TX_B}\" \
         again \"transaction_id\": \"{TX_A}\" suffix"
    );
    assert_eq!(extract_transaction_ids(&text), ids(&[TX_A, TX_B]));
}

#[test]
fn scan_tolerates_unreadable_files() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("monthly")).unwrap();
    fs::create_dir_all(root.join("plans/details")).unwrap();
    fs::write(
        root.join("monthly/30.json"),
        format!(r#"[{{"transaction_id": "{TX_A}"}}]"#),
    )
    .unwrap();
    fs::write(root.join("plans/details/broken.json"), [0xff, 0xfe, 0x00, 0x81]).unwrap();
    fs::write(
        root.join("plans/details/m_30_plan_v1.json"),
        format!(r#"{{"samples": [{{"transaction_id": "{TX_B}"}}]}}"#),
    )
    .unwrap();
    fs::write(root.join("notes.txt"), format!(r#""transaction_id": "{TX_C}""#)).unwrap();

    let scan = scan_transaction_ids(root, None);

    assert_eq!(scan.ids, ids(&[TX_A, TX_B]));
    assert_eq!(scan.files_scanned, 2);
    assert_eq!(scan.issues.len(), 1);
    assert!(scan.issues[0].path.ends_with("broken.json"));
}

#[test]
fn scan_excludes_only_transactions_subtree() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("transactions/why")).unwrap();
    fs::create_dir_all(root.join("merchants")).unwrap();
    fs::write(
        root.join(format!("transactions/{TX_A}.json")),
        format!(r#"{{"transaction_id": "{TX_A}"}}"#),
    )
    .unwrap();
    fs::write(
        root.join(format!("transactions/why/{TX_B}.json")),
        format!(r#"{{"transaction_id": "{TX_B}"}}"#),
    )
    .unwrap();
    fs::write(
        root.join("merchants/transactions_summary.json"),
        format!(r#"{{"transaction_id": "{TX_C}"}}"#),
    )
    .unwrap();

    let scan = scan_transaction_ids(root, Some(&root.join("transactions")));
    assert_eq!(scan.ids, ids(&[TX_C]));
}

#[test]
fn scan_of_missing_root_is_empty() {
    let temp = tempfile::tempdir().unwrap();
    let scan = scan_transaction_ids(&temp.path().join("absent"), None);
    assert!(scan.ids.is_empty());
    assert!(scan.issues.is_empty());
}

#[test]
fn work_set_against_store() {
    let temp = tempfile::tempdir().unwrap();
    let root = camino::Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let store = DataStore::new(root.clone());
    store.ensure_layout().unwrap();
    fs::write(root.join(format!("transactions/{TX_A}.json")), "{}").unwrap();
    fs::write(root.join(format!("transactions/why/{TX_B}.json")), "{}").unwrap();

    let existing = store.existing_transaction_ids().unwrap();
    assert_eq!(existing, ids(&[TX_A]));

    let work = WorkSet::plan(&ids(&[TX_A, TX_B]), &existing);
    assert_eq!(work.missing, vec![TransactionId::new(TX_B)]);
    assert!(WorkSet::plan(&ids(&[TX_A]), &existing).is_empty());
}
