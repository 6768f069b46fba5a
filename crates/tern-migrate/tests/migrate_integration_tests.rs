//! Integration tests for the startup sequence against file-backed databases.
//!
//! Each test reopens the database between "process starts" to check that
//! history, schema changes, and the seeded row survive a restart.

use std::fs;
use std::path::Path;
use tern_db::Db;
use tern_migrate::{
    bootstrap, discover_sql_migrations, register_discovered, HistoryStore, MigrateError,
    MigrationRegistry, MigrationRunner, SeedLoader, SeedOutcome,
};

// ── Helpers ────────────────────────────────────────────────────────────

fn app_registry() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry
        .register_sql(
            "003_backfill",
            "UPDATE users SET email = name || '@example.com' WHERE email IS NULL;",
        )
        .unwrap();
    registry
        .register_sql(
            "001_init",
            "CREATE TABLE users (id INTEGER NOT NULL, name VARCHAR NOT NULL);
             INSERT INTO users VALUES (1, 'ada'), (2, 'grace');",
        )
        .unwrap();
    registry
        .register_sql("002_add_col", "ALTER TABLE users ADD COLUMN email VARCHAR;")
        .unwrap();
    registry
}

fn history(db: &Db) -> Vec<String> {
    HistoryStore::new(db.conn())
        .applied()
        .unwrap()
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn first_start_applies_everything_and_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    let db = Db::open(&dir.path().join("app.duckdb")).unwrap();
    let loader = SeedLoader::new(&assets, "");

    let report = bootstrap(&db, &app_registry(), Some(&loader)).unwrap();

    let applied: Vec<&str> = report.run.applied.iter().map(|id| id.as_str()).collect();
    assert_eq!(applied, vec!["001_init", "002_add_col", "003_backfill"]);
    assert_eq!(history(&db), vec!["001_init", "002_add_col", "003_backfill"]);

    let email: String = db
        .conn()
        .query_row("SELECT email FROM users WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(email, "ada@example.com");

    assert!(matches!(report.seed, Some(SeedOutcome::Seeded { .. })));
    assert_eq!(db.count_rows("settings").unwrap(), 1);
    assert_eq!(file_count(&assets), 1);
}

#[test]
fn restart_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    let loader = SeedLoader::new(&assets, "");
    {
        let db = Db::open(&path).unwrap();
        bootstrap(&db, &app_registry(), Some(&loader)).unwrap();
    }
    assert_eq!(file_count(&assets), 1);

    let db = Db::open(&path).unwrap();
    let report = bootstrap(&db, &app_registry(), Some(&loader)).unwrap();

    assert!(report.run.applied.is_empty());
    assert_eq!(report.run.skipped, 3);
    assert_eq!(report.seed, Some(SeedOutcome::AlreadySeeded { rows: 1 }));
    assert_eq!(file_count(&assets), 1);
}

#[test]
fn partial_history_resumes_after_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let mut only_init = MigrationRegistry::new();
        only_init
            .register_sql(
                "001_init",
                "CREATE TABLE users (id INTEGER NOT NULL, name VARCHAR NOT NULL);
                 INSERT INTO users VALUES (1, 'ada'), (2, 'grace');",
            )
            .unwrap();
        let db = Db::open(&path).unwrap();
        MigrationRunner::new(&only_init).run(&db).unwrap();
        assert_eq!(history(&db), vec!["001_init"]);
    }

    let db = Db::open(&path).unwrap();
    let report = MigrationRunner::new(&app_registry()).run(&db).unwrap();

    let applied: Vec<&str> = report.applied.iter().map(|id| id.as_str()).collect();
    assert_eq!(applied, vec!["002_add_col", "003_backfill"]);
    // 001_init re-running would fail on CREATE TABLE users
    assert_eq!(db.count_rows("users").unwrap(), 2);
}

#[test]
fn migration_failure_skips_seeding() {
    let dir = tempfile::tempdir().unwrap();
    let db = Db::open(&dir.path().join("app.duckdb")).unwrap();
    let loader = SeedLoader::new(dir.path(), "");

    let mut registry = app_registry();
    registry
        .register_sql("004_broken", "INSERT INTO audit_log VALUES (1);")
        .unwrap();

    let err = bootstrap(&db, &registry, Some(&loader)).unwrap_err();

    assert!(matches!(err, MigrateError::MigrationFailed { ref id, .. } if id == "004_broken"));
    assert_eq!(history(&db), vec!["001_init", "002_add_col", "003_backfill"]);
    assert!(!db.relation_exists("settings").unwrap());
}

#[test]
fn seeding_is_independent_of_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let loader = SeedLoader::new(dir.path(), "");
    {
        let db = Db::open(&path).unwrap();
        bootstrap(&db, &app_registry(), Some(&loader)).unwrap();
        db.execute_batch("DELETE FROM settings").unwrap();
    }

    // History is complete, but the empty table is seeded again
    let db = Db::open(&path).unwrap();
    let report = bootstrap(&db, &app_registry(), Some(&loader)).unwrap();

    assert!(report.run.applied.is_empty());
    assert!(matches!(report.seed, Some(SeedOutcome::Seeded { .. })));
    assert_eq!(db.count_rows("settings").unwrap(), 1);
}

#[test]
fn seeding_can_be_disabled() {
    let db = Db::open_memory().unwrap();
    let report = bootstrap(&db, &app_registry(), None).unwrap();
    assert_eq!(report.run.applied.len(), 3);
    assert_eq!(report.seed, None);
    assert!(!db.relation_exists("settings").unwrap());
}

#[test]
fn sql_directory_drives_runner() {
    let dir = tempfile::tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("001_init.sql"),
        "CREATE TABLE orders (id INTEGER NOT NULL, total DOUBLE);",
    )
    .unwrap();
    fs::write(
        migrations.join("002_status.sql"),
        "ALTER TABLE orders ADD COLUMN status VARCHAR DEFAULT 'open';",
    )
    .unwrap();

    let mut registry = MigrationRegistry::new();
    let found = discover_sql_migrations(&[migrations.clone()]).unwrap();
    register_discovered(&mut registry, found).unwrap();
    let db = Db::open_memory().unwrap();

    let report = MigrationRunner::new(&registry).run(&db).unwrap();

    assert_eq!(report.applied.len(), 2);
    db.execute_batch("INSERT INTO orders (id, total) VALUES (1, 9.5)")
        .unwrap();
    let status: String = db
        .conn()
        .query_row("SELECT status FROM orders", [], |row| row.get(0))
        .unwrap();
    assert_eq!(status, "open");
}
