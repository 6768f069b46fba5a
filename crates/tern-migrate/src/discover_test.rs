use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn discovers_sql_files_sorted_by_id() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("002_add_col.sql"), "ALTER TABLE t ADD COLUMN c INT;").unwrap();
    fs::write(dir.path().join("001_init.sql"), "CREATE TABLE t (id INT);").unwrap();
    fs::write(dir.path().join("README.md"), "not a migration").unwrap();

    let found = discover_sql_migrations(&[dir.path().to_path_buf()]).unwrap();

    let ids: Vec<&str> = found.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["001_init", "002_add_col"]);
    assert_eq!(found[0].sql, "CREATE TABLE t (id INT);");
}

#[test]
fn discovers_nested_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("2025/q1")).unwrap();
    fs::write(dir.path().join("2025/q1/20250102_users.sql"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("20241201_init.sql"), "SELECT 1;").unwrap();

    let found = discover_sql_migrations(&[dir.path().to_path_buf()]).unwrap();

    let ids: Vec<&str> = found.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["20241201_init", "20250102_users"]);
}

#[test]
fn missing_directory_is_skipped() {
    let dir = tempdir().unwrap();
    let found = discover_sql_migrations(&[dir.path().join("nope")]).unwrap();
    assert!(found.is_empty());
}

#[test]
fn duplicate_stem_across_directories_is_error() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("001_init.sql"), "SELECT 1;").unwrap();
    fs::write(b.path().join("001_init.sql"), "SELECT 2;").unwrap();

    let err =
        discover_sql_migrations(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateFile { ref id, .. } if id == "001_init"));
}

#[test]
fn register_discovered_adds_sql_bodies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("001_init.sql"), "CREATE TABLE users (id INTEGER);").unwrap();

    let found = discover_sql_migrations(&[dir.path().to_path_buf()]).unwrap();
    let mut registry = MigrationRegistry::new();
    assert_eq!(register_discovered(&mut registry, found).unwrap(), 1);

    let db = tern_db::Db::open_memory().unwrap();
    registry.get("001_init").unwrap().apply(db.conn()).unwrap();
    assert!(db.relation_exists("users").unwrap());
}

#[test]
fn register_discovered_rejects_clash_with_code_migration() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("001_init.sql"), "SELECT 1;").unwrap();
    let found = discover_sql_migrations(&[dir.path().to_path_buf()]).unwrap();

    let mut registry = MigrationRegistry::new();
    registry.register("001_init", |_| Ok(())).unwrap();

    let err = register_discovered(&mut registry, found).unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateMigration { .. }));
}
