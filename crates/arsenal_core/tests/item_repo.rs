use arsenal_core::db::open_db_in_memory;
use arsenal_core::{FlagState, ItemKey, ItemRepository, RepoError, SqliteItemRepository};
use std::collections::BTreeSet;

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn ensure_exists_inserts_once_with_unset_flags() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    let key = ItemKey::new("swords", "Skana");

    assert!(repo.ensure_exists(&key).unwrap());
    assert!(!repo.ensure_exists(&key).unwrap());

    let items = repo.get_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].flags(), FlagState::UNSET);
}

#[test]
fn ensure_exists_does_not_reset_flags() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    let key = ItemKey::new("swords", "Skana");

    repo.ensure_exists(&key).unwrap();
    repo.set_flags(&key, FlagState::COMPLETE).unwrap();
    repo.ensure_exists(&key).unwrap();

    assert_eq!(repo.get_all().unwrap()[0].flags(), FlagState::COMPLETE);
}

#[test]
fn ensure_exists_rejects_blank_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let err = repo.ensure_exists(&ItemKey::new("swords", "  ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn get_all_orders_by_category_then_name_case_sensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    for (category, name) in [
        ("swords", "skana"),
        ("swords", "Orthos"),
        ("pistols", "Lex"),
        ("Archguns", "Imperator"),
    ] {
        repo.ensure_exists(&ItemKey::new(category, name)).unwrap();
    }

    let first: Vec<ItemKey> = repo.get_all().unwrap().iter().map(|item| item.key()).collect();
    let second: Vec<ItemKey> = repo.get_all().unwrap().iter().map(|item| item.key()).collect();
    assert_eq!(
        first,
        vec![
            ItemKey::new("Archguns", "Imperator"),
            ItemKey::new("pistols", "Lex"),
            ItemKey::new("swords", "Orthos"),
            ItemKey::new("swords", "skana"),
        ]
    );
    assert_eq!(first, second);
}

#[test]
fn set_flags_on_missing_key_affects_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let changed = repo
        .set_flags(&ItemKey::new("swords", "Ghost"), FlagState::COMPLETE)
        .unwrap();
    assert!(!changed);
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn set_flags_rejects_mastered_without_blueprint() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    let key = ItemKey::new("swords", "Skana");
    repo.ensure_exists(&key).unwrap();

    let err = repo
        .set_flags(
            &key,
            FlagState {
                blueprint: false,
                mastered: true,
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_all().unwrap()[0].flags(), FlagState::UNSET);
}

#[test]
fn bulk_set_by_name_matches_across_categories() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    repo.ensure_exists(&ItemKey::new("primaries", "Twin")).unwrap();
    repo.ensure_exists(&ItemKey::new("secondaries", "Twin")).unwrap();
    repo.ensure_exists(&ItemKey::new("swords", "Skana")).unwrap();

    let rows = repo.bulk_set_by_name(&names(&["Twin", "Missing"])).unwrap();
    assert_eq!(rows, 2);

    for item in repo.get_all().unwrap() {
        let expected = if item.name == "Twin" {
            FlagState::COMPLETE
        } else {
            FlagState::UNSET
        };
        assert_eq!(item.flags(), expected, "{}", item.key());
    }
}

#[test]
fn bulk_set_by_name_with_empty_set_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    repo.ensure_exists(&ItemKey::new("swords", "Skana")).unwrap();

    assert_eq!(repo.bulk_set_by_name(&BTreeSet::new()).unwrap(), 0);
    assert_eq!(repo.get_all().unwrap()[0].flags(), FlagState::UNSET);
}

#[test]
fn bulk_set_by_name_handles_sets_larger_than_one_statement() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    let mut many = BTreeSet::new();
    for index in 0..1_200 {
        let name = format!("item-{index:04}");
        repo.ensure_exists(&ItemKey::new("bulk", name.as_str())).unwrap();
        many.insert(name);
    }

    assert_eq!(repo.bulk_set_by_name(&many).unwrap(), 1_200);
    assert!(repo
        .get_all()
        .unwrap()
        .iter()
        .all(|item| item.flags() == FlagState::COMPLETE));
}

#[test]
fn get_all_rejects_corrupted_flag_values() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO items (category, name, blueprint, mastered) VALUES ('swords', 'Skana', 2, 0);",
    )
    .unwrap();

    let err = SqliteItemRepository::new(&conn).get_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("blueprint")));
}

#[test]
fn list_names_is_distinct() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);
    repo.ensure_exists(&ItemKey::new("primaries", "Twin")).unwrap();
    repo.ensure_exists(&ItemKey::new("secondaries", "Twin")).unwrap();
    repo.ensure_exists(&ItemKey::new("swords", "Skana")).unwrap();

    assert_eq!(repo.list_names().unwrap(), names(&["Skana", "Twin"]));
}
