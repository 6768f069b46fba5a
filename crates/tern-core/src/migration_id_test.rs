use super::*;

fn id(s: &str) -> MigrationId {
    MigrationId::try_from(s).unwrap()
}

#[test]
fn test_migration_id_creation() {
    let id = id("001_init");
    assert_eq!(id.as_str(), "001_init");
    assert_eq!(format!("{}", id), "001_init");
}

#[test]
fn test_migration_id_equality() {
    let id = id("001_init");
    assert_eq!(id, "001_init");
    assert_eq!(id, *"001_init");
}

#[test]
fn test_migration_id_rejects_empty() {
    assert!(MigrationId::try_new("").is_none());
    let result: Result<MigrationId, _> = "".try_into();
    assert!(matches!(result, Err(CoreError::EmptyMigrationId)));
}

#[test]
fn test_migration_id_try_from_string() {
    let owned = MigrationId::try_from("002_add_col".to_string()).unwrap();
    assert_eq!(owned, id("002_add_col"));
    assert!(MigrationId::try_from(String::new()).is_err());
}

#[test]
fn test_migration_id_orders_lexicographically() {
    let mut ids = vec![
        id("010_late"),
        id("002_add_col"),
        id("001_init"),
        id("002_add_col_b"),
    ];
    ids.sort();
    let ordered: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ordered, vec!["001_init", "002_add_col", "002_add_col_b", "010_late"]);
}

#[test]
fn test_unpadded_ids_sort_as_strings() {
    // "10" < "9" byte-wise: identifiers must be zero-padded to sort numerically
    assert!(id("10_x") < id("9_x"));
}

#[test]
fn test_migration_id_deserialize_rejects_empty() {
    let result: Result<MigrationId, _> = serde_yaml::from_str("\"\"");
    assert!(result.is_err());

    let id: MigrationId = serde_yaml::from_str("003_backfill").unwrap();
    assert_eq!(id, "003_backfill");
}
