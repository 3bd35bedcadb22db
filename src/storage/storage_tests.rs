use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    widget_id: String,
    color: String,
    size: i64,
}

impl Document for Widget {
    const COLLECTION: &'static str = "widgets";
    fn id(&self) -> &str { &self.widget_id }
}

fn widget(id: &str, color: &str, size: i64) -> Widget {
    Widget { widget_id: id.into(), color: color.into(), size }
}

#[test]
fn insert_then_get_returns_same_fields() {
    let mut store = Store::in_memory();
    store.insert(&widget("w1", "red", 3)).unwrap();
    let got: Widget = store.get("w1").unwrap().unwrap();
    assert_eq!(got, widget("w1", "red", 3));
    assert!(store.get::<Widget>("nope").unwrap().is_none());
}

#[test]
fn duplicate_insert_is_a_conflict() {
    let mut store = Store::in_memory();
    store.insert(&widget("w1", "red", 3)).unwrap();
    let err = store.insert(&widget("w1", "blue", 1)).unwrap_err();
    let app: AppError = err.into();
    assert_eq!(app.http_status(), 409);
    // original document untouched
    assert_eq!(store.get::<Widget>("w1").unwrap().unwrap().color, "red");
}

#[test]
fn find_count_and_delete_where() {
    let mut store = Store::in_memory();
    store.insert(&widget("a", "red", 1)).unwrap();
    store.insert(&widget("b", "blue", 2)).unwrap();
    store.insert(&widget("c", "red", 3)).unwrap();

    let reds = store.find::<Widget>(|w| w.color == "red").unwrap();
    assert_eq!(reds.iter().map(|w| w.widget_id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(store.count::<Widget>(|w| w.size > 1).unwrap(), 2);

    let removed = store.delete_where::<Widget>(|w| w.color == "red").unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.count::<Widget>(|_| true).unwrap(), 1);
}

#[test]
fn update_changes_only_named_fields() {
    let mut store = Store::in_memory();
    store.insert(&widget("w1", "red", 3)).unwrap();
    let updated = store.update::<Widget>("w1", |w| w.size = 10).unwrap().unwrap();
    assert_eq!(updated, widget("w1", "red", 10));
    assert!(store.update::<Widget>("missing", |w| w.size = 1).unwrap().is_none());
}

#[test]
fn update_cannot_rekey_a_document() {
    let mut store = Store::in_memory();
    store.insert(&widget("w1", "red", 3)).unwrap();
    store.update::<Widget>("w1", |w| w.widget_id = "w2".into()).unwrap();
    assert!(store.contains::<Widget>("w1"));
    assert!(!store.contains::<Widget>("w2"));
}

#[test]
fn delete_reports_presence() {
    let mut store = Store::in_memory();
    store.insert(&widget("w1", "red", 3)).unwrap();
    assert!(store.delete::<Widget>("w1").unwrap());
    assert!(!store.delete::<Widget>("w1").unwrap());
}

#[test]
fn persisted_collections_survive_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = Store::open(tmp.path()).unwrap();
        store.insert(&widget("w1", "red", 3)).unwrap();
        store.insert(&widget("w2", "blue", 4)).unwrap();
        store.delete::<Widget>("w2").unwrap();
    }
    assert!(io::collection_path(tmp.path(), "widgets").exists());
    let reopened = Store::open(tmp.path()).unwrap();
    assert_eq!(reopened.get::<Widget>("w1").unwrap().unwrap().size, 3);
    assert!(reopened.get::<Widget>("w2").unwrap().is_none());
}

#[test]
fn unreadable_documents_are_skipped_by_scans() {
    let mut store = Store::in_memory();
    store.insert(&widget("ok", "red", 1)).unwrap();
    store.collections.get_mut("widgets").unwrap().insert("bad".into(), serde_json::json!({"widget_id": "bad"}));
    assert_eq!(store.find::<Widget>(|_| true).unwrap().len(), 1);
    assert!(store.get::<Widget>("bad").is_err());
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("data");
    let mut store = Store::open(&root).unwrap();
    store.insert(&widget("w1", "red", 3)).unwrap();
    std::fs::remove_dir_all(&root).unwrap();

    assert!(store.insert(&widget("w2", "blue", 1)).is_err());
    assert!(store.get::<Widget>("w2").unwrap().is_none());

    assert!(store.update::<Widget>("w1", |w| w.size = 99).is_err());
    assert_eq!(store.get::<Widget>("w1").unwrap().unwrap().size, 3);

    assert!(store.delete::<Widget>("w1").is_err());
    assert!(store.contains::<Widget>("w1"));
    assert!(store.delete_where::<Widget>(|_| true).is_err());
    assert_eq!(store.count::<Widget>(|_| true).unwrap(), 1);

    // once the folder is back the next write carries only committed documents
    std::fs::create_dir_all(&root).unwrap();
    store.upsert(&widget("w3", "green", 2)).unwrap();
    let reopened = Store::open(&root).unwrap();
    assert!(reopened.get::<Widget>("w2").unwrap().is_none());
    assert_eq!(reopened.get::<Widget>("w1").unwrap().unwrap().size, 3);
    assert_eq!(reopened.count::<Widget>(|_| true).unwrap(), 2);
}
