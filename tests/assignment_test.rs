mod common;

use common::*;
use eftekad::assignment;
use eftekad::models::{group, setting};

#[test]
fn test_recompute_assigns_families_to_matching_groups() {
    let (_dir, conn) = setup_test_db();
    let veterans = insert_group(&conn, "Veterans", "1990-01-01", "1999-12-31");
    let newlyweds = insert_group(&conn, "Newlyweds", "2015-01-01", "2025-12-31");

    let old_family = insert_family(&conn, "Mina", "Mariam", "1995-06-20");
    let young_family = insert_family(&conn, "Peter", "Irene", "2020-03-10");
    let dateless = insert_family(&conn, "Hany", "Nadia", "");

    let summary = assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.updated, 2);
    assert!(summary.failures.is_empty());

    assert_eq!(family_group_id(&conn, old_family), Some(veterans));
    assert_eq!(family_group_id(&conn, young_family), Some(newlyweds));
    assert_eq!(family_group_id(&conn, dateless), None);
}

#[test]
fn test_recompute_is_idempotent() {
    let (_dir, conn) = setup_test_db();
    insert_group(&conn, "G", "2000-01-01", "2020-12-31");
    insert_family(&conn, "A", "B", "2010-05-05");
    insert_family(&conn, "C", "D", "2011-06-06");

    let first = assignment::recompute_all(&conn, false).expect("first pass failed");
    assert_eq!(first.updated, 2);

    // Unchanged inputs: the second pass performs zero writes.
    let second = assignment::recompute_all(&conn, false).expect("second pass failed");
    assert_eq!(second.processed, 2);
    assert_eq!(second.updated, 0);
}

#[test]
fn test_overlapping_ranges_use_first_match_in_collection_order() {
    let (_dir, conn) = setup_test_db();
    let first = insert_group(&conn, "First", "2000-01-01", "2010-12-31");
    let _second = insert_group(&conn, "Second", "2005-01-01", "2015-12-31");

    // 2007 falls in both ranges; the earlier group wins.
    let family = insert_family(&conn, "A", "B", "2007-07-07");
    assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(family_group_id(&conn, family), Some(first));
}

#[test]
fn test_range_edit_moves_families() {
    let (_dir, conn) = setup_test_db();
    let group_id = insert_group(&conn, "G", "2000-01-01", "2005-12-31");
    let family = insert_family(&conn, "A", "B", "2004-04-04");
    assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(family_group_id(&conn, family), Some(group_id));

    // Shrink the range so the family no longer fits, then recompute.
    group::update(
        &conn,
        group_id,
        &group::GroupPayload {
            name: "G".to_string(),
            description: String::new(),
            range_start: "2000-01-01".to_string(),
            range_end: "2002-12-31".to_string(),
        },
    )
    .expect("group update failed");

    let summary = assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(summary.updated, 1);
    assert_eq!(family_group_id(&conn, family), None);
}

#[test]
fn test_group_delete_triggers_reassignment() {
    let (_dir, conn) = setup_test_db();
    let primary = insert_group(&conn, "Primary", "2000-01-01", "2010-12-31");
    let fallback = insert_group(&conn, "Fallback", "2000-01-01", "2015-12-31");

    let family = insert_family(&conn, "A", "B", "2007-07-07");
    assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(family_group_id(&conn, family), Some(primary));

    // Deleting the group nulls the reference; the next pass reassigns.
    group::delete(&conn, primary).expect("group delete failed");
    assert_eq!(family_group_id(&conn, family), None);

    assignment::recompute_all(&conn, false).expect("recompute failed");
    assert_eq!(family_group_id(&conn, family), Some(fallback));
}

#[test]
fn test_resume_skips_families_before_checkpoint() {
    let (_dir, conn) = setup_test_db();
    insert_group(&conn, "G", "2000-01-01", "2020-12-31");
    let early = insert_family(&conn, "A", "B", "2010-01-01");
    let late = insert_family(&conn, "C", "D", "2010-02-02");

    // Pretend an earlier pass stopped right after the first family.
    setting::set_value(&conn, assignment::CHECKPOINT_KEY, &early.to_string())
        .expect("checkpoint write failed");

    let summary = assignment::recompute_all(&conn, true).expect("resume failed");
    assert_eq!(summary.processed, 1);
    assert_eq!(family_group_id(&conn, early), None);
    assert!(family_group_id(&conn, late).is_some());

    // The finished pass cleared the checkpoint; a fresh pass covers everyone.
    assert_eq!(setting::get_value(&conn, assignment::CHECKPOINT_KEY, "none"), "none");
    let full = assignment::recompute_all(&conn, false).expect("full pass failed");
    assert_eq!(full.processed, 2);
    assert!(family_group_id(&conn, early).is_some());
}
