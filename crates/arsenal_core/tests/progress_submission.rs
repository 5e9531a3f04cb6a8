use arsenal_core::db::open_db_in_memory;
use arsenal_core::{
    apply_submission, load_inventory, marker_key, parse_catalog_list, seed_catalog,
    BulkImportOutcome, FlagKind, FlagMarks, FlagState, Item, ItemKey, ItemRepository,
    SqliteItemRepository, Submission, SubmissionOutcome,
};
use rusqlite::Connection;

fn seeded() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    let lists = vec![
        parse_catalog_list("swords", "Skana\n"),
        parse_catalog_list("pistols", "Lex\n"),
    ];
    seed_catalog(&mut conn, &lists).unwrap();
    conn
}

fn flags_of(conn: &Connection, category: &str, name: &str) -> FlagState {
    SqliteItemRepository::new(conn)
        .get_all()
        .unwrap()
        .into_iter()
        .find(|item| item.category == category && item.name == name)
        .map(|item| item.flags())
        .expect("item should exist")
}

fn all_items(conn: &Connection) -> Vec<Item> {
    SqliteItemRepository::new(conn).get_all().unwrap()
}

fn reconcile(conn: &mut Connection, markers: &[&str]) -> SubmissionOutcome {
    let submission = Submission::Reconcile(FlagMarks::from_field_names(markers.iter().copied()));
    apply_submission(conn, &submission).unwrap()
}

fn bulk_import(conn: &mut Connection, payload: &[u8]) -> SubmissionOutcome {
    let submission = Submission::BulkImport(Some(payload.to_vec()));
    apply_submission(conn, &submission).unwrap()
}

fn assert_invariant(conn: &Connection) {
    for item in all_items(conn) {
        assert!(
            !item.mastered || item.blueprint,
            "{} is mastered without blueprint",
            item.key()
        );
    }
}

#[test]
fn mastered_marker_implies_blueprint_and_resets_others() {
    let mut conn = seeded();

    reconcile(&mut conn, &["ma|swords|Skana"]);

    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "pistols", "Lex"), FlagState::UNSET);
    assert_invariant(&conn);
}

#[test]
fn blueprint_marker_alone_sets_only_blueprint() {
    let mut conn = seeded();

    reconcile(&mut conn, &["bp|pistols|Lex"]);

    assert_eq!(
        flags_of(&conn, "pistols", "Lex"),
        FlagState {
            blueprint: true,
            mastered: false
        }
    );
    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::UNSET);
}

#[test]
fn empty_reconciliation_resets_every_item() {
    let mut conn = seeded();
    bulk_import(&mut conn, b"Skana\nLex\n");

    let outcome = reconcile(&mut conn, &[]);

    for item in all_items(&conn) {
        assert_eq!(item.flags(), FlagState::UNSET, "{}", item.key());
    }
    match outcome {
        SubmissionOutcome::Reconciled(report) => {
            assert_eq!(report.items, 2);
            assert_eq!(report.changed, 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn unknown_markers_are_ignored_without_insert() {
    let mut conn = seeded();

    let outcome = reconcile(&mut conn, &["ma|swords|Ghost", "bp|daggers|Skana"]);

    assert_eq!(all_items(&conn).len(), 2);
    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::UNSET);
    match outcome {
        SubmissionOutcome::Reconciled(report) => assert_eq!(report.unknown_marks, 2),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn category_containing_separator_keeps_its_marks() {
    let mut conn = open_db_in_memory().unwrap();
    seed_catalog(
        &mut conn,
        &[
            parse_catalog_list("melee|heavy", "Galatine\n"),
            parse_catalog_list("melee", "Skana\n"),
        ],
    )
    .unwrap();
    let marker = marker_key(FlagKind::Mastered, &ItemKey::new("melee|heavy", "Galatine"));

    let outcome = reconcile(&mut conn, &[marker.as_str()]);

    assert_eq!(flags_of(&conn, "melee|heavy", "Galatine"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "melee", "Skana"), FlagState::UNSET);
    match outcome {
        SubmissionOutcome::Reconciled(report) => assert_eq!(report.unknown_marks, 0),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn bulk_import_accepts_carriage_return_line_endings() {
    let mut conn = seeded();

    let outcome = bulk_import(&mut conn, b"Skana\rLex\r");

    assert_eq!(
        outcome,
        SubmissionOutcome::BulkImported(BulkImportOutcome::Applied { names: 2, rows: 2 })
    );
    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "pistols", "Lex"), FlagState::COMPLETE);
}

#[test]
fn bulk_import_sets_both_flags_regardless_of_category() {
    let mut conn = seeded();

    let outcome = bulk_import(&mut conn, b"Skana\nLex\n");

    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "pistols", "Lex"), FlagState::COMPLETE);
    assert_eq!(
        outcome,
        SubmissionOutcome::BulkImported(BulkImportOutcome::Applied { names: 2, rows: 2 })
    );
}

#[test]
fn bulk_import_targets_every_category_sharing_a_name() {
    let mut conn = open_db_in_memory().unwrap();
    seed_catalog(
        &mut conn,
        &[
            parse_catalog_list("primaries", "Twin\nBraton\n"),
            parse_catalog_list("secondaries", "Twin\n"),
        ],
    )
    .unwrap();

    bulk_import(&mut conn, b"Twin\n");

    assert_eq!(flags_of(&conn, "primaries", "Twin"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "secondaries", "Twin"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "primaries", "Braton"), FlagState::UNSET);
}

#[test]
fn whitespace_only_bulk_import_is_a_no_op() {
    let mut conn = seeded();
    reconcile(&mut conn, &["bp|pistols|Lex"]);
    let before = all_items(&conn);

    let outcome = bulk_import(&mut conn, b"  \n\t\n\n");

    assert_eq!(outcome, SubmissionOutcome::BulkImported(BulkImportOutcome::Empty));
    assert_eq!(all_items(&conn), before);
}

#[test]
fn undecodable_bulk_import_is_discarded() {
    let mut conn = seeded();
    let before = all_items(&conn);

    let outcome = bulk_import(&mut conn, &[b'S', 0xff, 0xfe, b'\n']);

    assert_eq!(
        outcome,
        SubmissionOutcome::BulkImported(BulkImportOutcome::Undecodable)
    );
    assert_eq!(all_items(&conn), before);
}

#[test]
fn bulk_import_without_file_is_a_no_op() {
    let mut conn = seeded();

    let outcome = apply_submission(&mut conn, &Submission::BulkImport(None)).unwrap();

    assert_eq!(outcome, SubmissionOutcome::BulkImported(BulkImportOutcome::NoFile));
    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::UNSET);
}

#[test]
fn failed_reconciliation_rolls_back_every_write() {
    let mut conn = seeded();
    bulk_import(&mut conn, b"Skana\nLex\n");
    conn.execute_batch(
        "CREATE TRIGGER reject_skana BEFORE UPDATE ON items
         WHEN NEW.name = 'Skana'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();

    let submission = Submission::Reconcile(FlagMarks::new());
    assert!(apply_submission(&mut conn, &submission).is_err());

    // Lex is written before the Skana update fails; the rollback undoes it.
    assert_eq!(flags_of(&conn, "swords", "Skana"), FlagState::COMPLETE);
    assert_eq!(flags_of(&conn, "pistols", "Lex"), FlagState::COMPLETE);
}

#[test]
fn inventory_groups_by_category_in_store_order() {
    let mut conn = seeded();
    reconcile(&mut conn, &["ma|swords|Skana"]);

    let view = load_inventory(&conn).unwrap();
    let categories: Vec<&str> = view
        .categories
        .iter()
        .map(|group| group.category.as_str())
        .collect();
    assert_eq!(categories, vec!["pistols", "swords"]);

    let swords = view.category("swords").unwrap();
    assert_eq!(swords.items[0].name, "Skana");
    assert!(swords.items[0].blueprint);
    assert!(swords.items[0].mastered);
    assert_eq!(view.total, 2);
    assert_eq!(view.mastered, 1);
}

#[test]
fn invariant_holds_after_mixed_submissions() {
    let mut conn = seeded();
    let key = ItemKey::new("swords", "Skana");

    reconcile(&mut conn, &["ma|swords|Skana", "ma|pistols|Lex", "bp|pistols|Lex"]);
    assert_invariant(&conn);
    bulk_import(&mut conn, key.name.as_bytes());
    assert_invariant(&conn);
    reconcile(&mut conn, &["bp|swords|Skana"]);
    assert_invariant(&conn);
    assert_eq!(
        flags_of(&conn, "swords", "Skana"),
        FlagState {
            blueprint: true,
            mastered: false
        }
    );
}
