use super::*;
use tern_core::CoreError;
use tern_db::Db;

fn noop(_: &Connection) -> MigrateResult<()> {
    Ok(())
}

#[test]
fn test_register_and_lookup() {
    let mut registry = MigrationRegistry::new();
    registry.register("001_init", noop).unwrap();
    registry.register("002_add_col", noop).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("001_init"));
    assert!(!registry.contains("003_backfill"));
    assert_eq!(registry.get("002_add_col").unwrap().id(), "002_add_col");
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = MigrationRegistry::new();
    registry
        .register_sql("001_init", "CREATE TABLE first (id INTEGER)")
        .unwrap();

    let err = registry
        .register_sql("001_init", "CREATE TABLE second (id INTEGER)")
        .unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateMigration { ref id } if id == "001_init"));
    assert_eq!(registry.len(), 1);

    // The first registration stays in place
    let db = Db::open_memory().unwrap();
    registry.get("001_init").unwrap().apply(db.conn()).unwrap();
    assert!(db.relation_exists("first").unwrap());
    assert!(!db.relation_exists("second").unwrap());
}

#[test]
fn test_empty_id_rejected() {
    let mut registry = MigrationRegistry::new();
    let err = registry.register("", noop).unwrap_err();
    assert!(matches!(err, MigrateError::Core(CoreError::EmptyMigrationId)));
    assert!(registry.is_empty());
}

#[test]
fn test_register_sql_executes_batch() {
    let mut registry = MigrationRegistry::new();
    registry
        .register_sql(
            "001_init",
            "CREATE TABLE users (id INTEGER); INSERT INTO users VALUES (1), (2);",
        )
        .unwrap();

    let db = Db::open_memory().unwrap();
    registry.get("001_init").unwrap().apply(db.conn()).unwrap();
    assert_eq!(db.count_rows("users").unwrap(), 2);
}

#[test]
fn test_closure_body_can_fail() {
    let mut registry = MigrationRegistry::new();
    registry
        .register("001_broken", |_conn| Err(MigrateError::body("backfill source missing")))
        .unwrap();

    let db = Db::open_memory().unwrap();
    let err = registry.get("001_broken").unwrap().apply(db.conn()).unwrap_err();
    assert_eq!(err.to_string(), "[M004] backfill source missing");
}

#[test]
fn test_ids_cover_all_entries() {
    let mut registry = MigrationRegistry::new();
    for id in ["003_backfill", "001_init", "002_add_col"] {
        registry.register(id, noop).unwrap();
    }
    let mut ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["001_init", "002_add_col", "003_backfill"]);
    assert_eq!(registry.all().len(), 3);
}
