mod common;

use common::*;
use eftekad::models::group::{self, GroupPayload};

fn payload(name: &str, start: &str, end: &str) -> GroupPayload {
    GroupPayload {
        name: name.to_string(),
        description: "families married in this window".to_string(),
        range_start: start.to_string(),
        range_end: end.to_string(),
    }
}

#[test]
fn test_create_and_read_group() {
    let (_dir, conn) = setup_test_db();
    let id = group::create(&conn, &payload("Newlyweds", "2015-01-01", "2025-12-31"))
        .expect("create failed");

    let found = group::find_by_id(&conn, id).expect("find failed").expect("missing group");
    assert_eq!(found.name, "Newlyweds");
    assert_eq!(found.range_start, "2015-01-01");
    assert_eq!(found.family_count, 0);
}

#[test]
fn test_list_keeps_insertion_order() {
    let (_dir, conn) = setup_test_db();
    group::create(&conn, &payload("Zeta", "2000-01-01", "2005-12-31")).unwrap();
    group::create(&conn, &payload("Alpha", "2006-01-01", "2010-12-31")).unwrap();

    // Collection order is assignment precedence — never sorted by name.
    let all = group::find_all(&conn, None).expect("list failed");
    let names: Vec<&str> = all.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Alpha"]);
}

#[test]
fn test_filter_matches_name_or_description() {
    let (_dir, conn) = setup_test_db();
    group::create(&conn, &payload("Newlyweds", "2015-01-01", "2025-12-31")).unwrap();
    group::create(&conn, &payload("Veterans", "1990-01-01", "1999-12-31")).unwrap();

    assert_eq!(group::find_all(&conn, Some("newly")).unwrap().len(), 1);
    assert_eq!(group::find_all(&conn, Some("WINDOW")).unwrap().len(), 2);
    assert_eq!(group::find_all(&conn, Some("nope")).unwrap().len(), 0);
}

#[test]
fn test_family_count_reflects_membership() {
    let (_dir, conn) = setup_test_db();
    let id = group::create(&conn, &payload("G", "2000-01-01", "2020-12-31")).unwrap();
    let f1 = insert_family(&conn, "A", "B", "2010-01-01");
    insert_family(&conn, "C", "D", "2010-02-02");
    conn.execute("UPDATE families SET group_id = ?1 WHERE id = ?2", [id, f1])
        .unwrap();

    let found = group::find_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(found.family_count, 1);
}

#[test]
fn test_update_and_delete_report_missing_rows() {
    let (_dir, conn) = setup_test_db();
    assert_eq!(
        group::update(&conn, 42, &payload("G", "2000-01-01", "2001-01-01")).unwrap(),
        0
    );
    assert_eq!(group::delete(&conn, 42).unwrap(), 0);

    let id = group::create(&conn, &payload("G", "2000-01-01", "2001-01-01")).unwrap();
    assert_eq!(
        group::update(&conn, id, &payload("G2", "2000-01-01", "2002-01-01")).unwrap(),
        1
    );
    assert_eq!(group::delete(&conn, id).unwrap(), 1);
}
