mod common;

use common::*;
use eftekad::errors::AppError;
use eftekad::models::follow_up::{self, FollowUpMethod, NewFollowUp};
use eftekad::models::servant::{self, GroupScope, ServantPayload, ServantRole};

fn payload(name: &str, role: ServantRole, scope: GroupScope) -> ServantPayload {
    ServantPayload {
        name: name.to_string(),
        role,
        contact: String::new(),
        notes: String::new(),
        scope,
    }
}

#[test]
fn test_unrestricted_scope_round_trips() {
    let (_dir, conn) = setup_test_db();
    let id = servant::create(
        &conn,
        &payload("Abouna Youhanna", ServantRole::Priest, GroupScope::Unrestricted),
    )
    .expect("create failed");

    let found = servant::find_by_id(&conn, id).expect("find failed").expect("missing servant");
    assert_eq!(found.role, ServantRole::Priest);
    assert_eq!(found.scope, GroupScope::Unrestricted);
    assert!(found.scope.covers(1));
    assert!(found.scope.covers(999));
}

#[test]
fn test_specific_scope_round_trips() {
    let (_dir, conn) = setup_test_db();
    let g1 = insert_group(&conn, "G1", "2000-01-01", "2009-12-31");
    let g2 = insert_group(&conn, "G2", "2010-01-01", "2019-12-31");

    let id = servant::create(
        &conn,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Specific(vec![g1, g2])),
    )
    .expect("create failed");

    let found = servant::find_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(found.scope, GroupScope::Specific(vec![g1, g2]));
    assert!(found.scope.covers(g1));
    assert!(!found.scope.covers(g2 + 1));
}

#[test]
fn test_specific_scope_rejects_unknown_group() {
    let (_dir, conn) = setup_test_db();
    let err = servant::create(
        &conn,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Specific(vec![77])),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Reference("group", 77)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM servants", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_update_can_narrow_and_widen_scope() {
    let (_dir, conn) = setup_test_db();
    let g1 = insert_group(&conn, "G1", "2000-01-01", "2009-12-31");

    let id = servant::create(
        &conn,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Unrestricted),
    )
    .expect("create failed");

    servant::update(
        &conn,
        id,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Specific(vec![g1])),
    )
    .expect("narrow failed");
    assert_eq!(
        servant::find_by_id(&conn, id).unwrap().unwrap().scope,
        GroupScope::Specific(vec![g1])
    );

    servant::update(
        &conn,
        id,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Unrestricted),
    )
    .expect("widen failed");
    assert_eq!(
        servant::find_by_id(&conn, id).unwrap().unwrap().scope,
        GroupScope::Unrestricted
    );
    // No stale join rows survive the widening.
    let joins: i64 = conn
        .query_row("SELECT COUNT(*) FROM servant_groups", [], |row| row.get(0))
        .unwrap();
    assert_eq!(joins, 0);
}

#[test]
fn test_find_for_group_honors_scope() {
    let (_dir, conn) = setup_test_db();
    let g1 = insert_group(&conn, "G1", "2000-01-01", "2009-12-31");
    let g2 = insert_group(&conn, "G2", "2010-01-01", "2019-12-31");

    let general = servant::create(
        &conn,
        &payload("Abouna", ServantRole::Priest, GroupScope::Unrestricted),
    )
    .unwrap();
    let scoped = servant::create(
        &conn,
        &payload("Michael", ServantRole::MaleLeader, GroupScope::Specific(vec![g1])),
    )
    .unwrap();

    let for_g1: Vec<i64> = servant::find_for_group(&conn, g1)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(for_g1, vec![general, scoped]);

    let for_g2: Vec<i64> = servant::find_for_group(&conn, g2)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(for_g2, vec![general]);
}

#[test]
fn test_name_filter_and_insertion_order() {
    let (_dir, conn) = setup_test_db();
    insert_servant(&conn, "Zaki", "assistant");
    insert_servant(&conn, "Adel", "assistant");

    let all = servant::find_all(&conn, None).unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Zaki", "Adel"]);

    assert_eq!(servant::find_all(&conn, Some("zak")).unwrap().len(), 1);
}

#[test]
fn test_delete_blocked_while_credited_on_follow_ups() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let id = insert_servant(&conn, "Michael", "male_leader");

    follow_up::record(
        &conn,
        &NewFollowUp {
            family_id: family,
            method: FollowUpMethod::Call,
            responsible_servant_ids: vec![id],
            notes: "call".to_string(),
            outcome: "ok".to_string(),
            follow_up_date: "2026-01-10".to_string(),
        },
        "admin",
    )
    .expect("record failed");

    let err = servant::delete(&conn, id).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(servant::exists(&conn, id).unwrap());

    // Uncredited servants delete cleanly.
    let free = insert_servant(&conn, "Adel", "assistant");
    servant::delete(&conn, free).expect("delete failed");
    assert!(!servant::exists(&conn, free).unwrap());
}
