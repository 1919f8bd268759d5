use hindex_cache::{SlotDb, SlotStore};
use hindex_core::prompt::Answered;
use hindex_core::{Article, Outcome, StateStore, DEFAULT_COLLECTION, LEGACY_STORAGE_KEY, STORAGE_KEY};
use tempfile::TempDir;

fn open(dir: &TempDir) -> StateStore {
    let db = SlotDb::new(dir.path().join("hindex.db")).unwrap();
    StateStore::open(Box::new(db)).unwrap()
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let yes = Answered::yes();

    {
        let mut store = open(&dir);
        store.add_collection(Some("Thesis"), &yes).unwrap();
        store.add_article(Some("Chapter 1"), Some(14)).unwrap();
        store.add_article(Some("Chapter 2"), Some(3)).unwrap();
    }

    let store = open(&dir);
    assert_eq!(store.current(), "Thesis");
    assert_eq!(
        store.articles(),
        vec![Article::new("Chapter 1", 14), Article::new("Chapter 2", 3)]
    );

    let names: Vec<String> = store.collections().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec![DEFAULT_COLLECTION.to_string(), "Thesis".to_string()]);
    assert_eq!(store.compute().h, 2);
}

#[test]
fn test_legacy_database_is_migrated_on_open() {
    let dir = TempDir::new().unwrap();
    {
        let mut db = SlotDb::new(dir.path().join("hindex.db")).unwrap();
        db.set(
            LEGACY_STORAGE_KEY,
            r#"[{"title":"X","citations":"7"},{"title":"Y","citations":2}]"#,
        )
        .unwrap();
    }

    let store = open(&dir);
    assert_eq!(store.current(), DEFAULT_COLLECTION);
    assert_eq!(
        store.articles(),
        vec![Article::new("X", 7), Article::new("Y", 2)]
    );

    // Migration itself doesn't write; the first mutation does
    assert!(store.slots().get(STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_clearing_then_restarting_reseeds() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        assert_eq!(store.clear_active_collection(&Answered::yes()).unwrap(), Outcome::Applied);
        assert!(store.articles().is_empty());
    }

    // An empty active collection at startup gets the examples again
    let store = open(&dir);
    assert_eq!(store.articles().len(), 3);
}
