mod common;

use common::*;
use eftekad::errors::AppError;
use eftekad::models::attendance::{self, AttendanceStatus};

#[test]
fn test_mark_creates_a_record_and_refreshes_totals() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "Mina", "Mariam", "2010-01-01");
    insert_family(&conn, "Peter", "Irene", "2012-02-02");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");

    let record = attendance::mark(
        &conn,
        family,
        meeting,
        AttendanceStatus::Present,
        None,
        "admin",
    )
    .expect("mark failed");

    assert_eq!(record.family_id, family);
    assert_eq!(record.meeting_id, meeting);
    assert_eq!(record.status, AttendanceStatus::Present);
    assert_eq!(record.reason, "");
    assert_eq!(record.recorded_by, "admin");

    // The denormalized totals follow the ledger and the live family count.
    assert_eq!(stored_totals(&conn, meeting), (1, 2));
}

#[test]
fn test_mark_is_an_upsert_not_an_append() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");

    attendance::mark(&conn, family, meeting, AttendanceStatus::Present, None, "admin")
        .expect("first mark failed");
    attendance::mark(
        &conn,
        family,
        meeting,
        AttendanceStatus::Absent,
        Some("travelling"),
        "admin",
    )
    .expect("second mark failed");
    let last = attendance::mark(&conn, family, meeting, AttendanceStatus::Absent, Some("sick"), "admin")
        .expect("third mark failed");

    let row_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM attendance WHERE family_id = ?1 AND meeting_id = ?2",
            [family, meeting],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(row_count, 1);
    assert_eq!(last.status, AttendanceStatus::Absent);
    assert_eq!(last.reason, "sick");

    assert_eq!(stored_totals(&conn, meeting), (0, 1));
}

#[test]
fn test_reason_is_cleared_when_marked_present() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");

    attendance::mark(&conn, family, meeting, AttendanceStatus::Absent, Some("sick"), "admin")
        .expect("absent mark failed");
    let present = attendance::mark(
        &conn,
        family,
        meeting,
        AttendanceStatus::Present,
        Some("should be ignored"),
        "admin",
    )
    .expect("present mark failed");

    assert_eq!(present.status, AttendanceStatus::Present);
    assert_eq!(present.reason, "");
}

#[test]
fn test_mark_unknown_family_or_meeting_leaves_no_trace() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");

    let err = attendance::mark(&conn, 999, meeting, AttendanceStatus::Present, None, "admin")
        .unwrap_err();
    assert!(matches!(err, AppError::Reference("family", 999)));

    let err = attendance::mark(&conn, family, 999, AttendanceStatus::Present, None, "admin")
        .unwrap_err();
    assert!(matches!(err, AppError::Reference("meeting", 999)));

    let row_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))
        .unwrap();
    assert_eq!(row_count, 0);
}

#[test]
fn test_totals_for_uses_live_family_count() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");
    attendance::mark(&conn, family, meeting, AttendanceStatus::Present, None, "admin")
        .expect("mark failed");

    let before = attendance::totals_for(&conn, meeting).expect("totals failed");
    assert_eq!(before.total_attendance, 1);
    assert_eq!(before.total_families, 1);

    // A family added after the meeting still counts: the denominator is
    // live, not a snapshot.
    insert_family(&conn, "C", "D", "2012-02-02");
    let after = attendance::totals_for(&conn, meeting).expect("totals failed");
    assert_eq!(after.total_attendance, 1);
    assert_eq!(after.total_families, 2);
}

#[test]
fn test_totals_for_unknown_meeting_is_a_reference_error() {
    let (_dir, conn) = setup_test_db();
    let err = attendance::totals_for(&conn, 42).unwrap_err();
    assert!(matches!(err, AppError::Reference("meeting", 42)));
}

#[test]
fn test_verify_totals_repairs_drift() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");
    attendance::mark(&conn, family, meeting, AttendanceStatus::Present, None, "admin")
        .expect("mark failed");

    assert!(!attendance::verify_totals(&conn, meeting).expect("verify failed"));

    // Force the cached column out of sync with the ledger.
    conn.execute(
        "UPDATE meetings SET total_attendance = 99 WHERE id = ?1",
        [meeting],
    )
    .unwrap();

    assert!(attendance::verify_totals(&conn, meeting).expect("verify failed"));
    assert_eq!(stored_totals(&conn, meeting), (1, 1));
}

#[test]
fn test_find_by_family_spans_meetings() {
    let (_dir, conn) = setup_test_db();
    let family = insert_family(&conn, "A", "B", "2010-01-01");
    let week1 = insert_meeting(&conn, "Week 1", "2026-01-02");
    let week2 = insert_meeting(&conn, "Week 2", "2026-01-09");

    attendance::mark(&conn, family, week1, AttendanceStatus::Absent, Some("sick"), "admin")
        .expect("mark failed");
    attendance::mark(&conn, family, week2, AttendanceStatus::Present, None, "admin")
        .expect("mark failed");

    let history = attendance::find_by_family(&conn, family).expect("history failed");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].meeting_id, week1);
    assert_eq!(history[0].status, AttendanceStatus::Absent);
    assert_eq!(history[1].status, AttendanceStatus::Present);
}

#[test]
fn test_absent_family_contacts() {
    let (_dir, conn) = setup_test_db();
    let present = insert_family(&conn, "A", "B", "2010-01-01");
    let absent = insert_family(&conn, "C", "D", "2011-01-01");
    let meeting = insert_meeting(&conn, "Week 1", "2026-01-02");

    attendance::mark(&conn, present, meeting, AttendanceStatus::Present, None, "admin")
        .expect("mark failed");
    attendance::mark(&conn, absent, meeting, AttendanceStatus::Absent, Some("sick"), "admin")
        .expect("mark failed");

    let contacts = attendance::absent_family_contacts(&conn, meeting).expect("contacts failed");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id, absent);
}
