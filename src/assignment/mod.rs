//! Cohort-group assignment.
//!
//! A family belongs to the first group (in collection order) whose
//! marriage-date range contains its marriage date. Ranges may overlap, so
//! first-match keeps the outcome stable and reproducible. The resolver is
//! pure; persisting its output is the caller's job.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::group::{self, GroupRange};
use crate::models::{family, setting};

/// Settings key holding the last family id the batch pass wrote, so an
/// interrupted pass resumes instead of restarting.
pub const CHECKPOINT_KEY: &str = "assignment_checkpoint";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    NoDate,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Assigned(i64),
    Unassigned(UnassignedReason),
}

impl Resolution {
    pub fn group_id(&self) -> Option<i64> {
        match self {
            Resolution::Assigned(id) => Some(*id),
            Resolution::Unassigned(_) => None,
        }
    }
}

/// First group whose inclusive [start, end] range contains the date, at
/// whole-day granularity. A group with an unparseable range never matches.
pub fn resolve(marriage_date: &str, groups: &[GroupRange]) -> Resolution {
    let date = match NaiveDate::parse_from_str(marriage_date.trim(), "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return Resolution::Unassigned(UnassignedReason::NoDate),
    };

    for g in groups {
        let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(g.start.trim(), "%Y-%m-%d"),
            NaiveDate::parse_from_str(g.end.trim(), "%Y-%m-%d"),
        ) else {
            continue;
        };
        if date >= start && date <= end {
            return Resolution::Assigned(g.id);
        }
    }
    Resolution::Unassigned(UnassignedReason::NoMatch)
}

#[derive(Debug, Clone, Serialize)]
pub struct RecomputeFailure {
    pub family_id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecomputeSummary {
    pub processed: usize,
    pub updated: usize,
    pub failures: Vec<RecomputeFailure>,
}

/// Recompute the stored group assignment of every family.
///
/// Runs whenever any group's date range is created, edited, or deleted,
/// since the stored group_id values are denormalized. Families are
/// processed independently — one failure is recorded and does not stop the
/// pass — and a family row is written only when its assignment actually
/// changed, so a pass over unchanged data performs zero writes.
///
/// With `resume` set, families at or below the stored checkpoint are
/// skipped; a fresh pass clears the checkpoint first. The checkpoint is
/// advanced after each write and removed when the pass completes.
pub fn recompute_all(conn: &Connection, resume: bool) -> Result<RecomputeSummary, AppError> {
    let groups = group::find_ranges(conn)?;

    let after: i64 = if resume {
        setting::get_value(conn, CHECKPOINT_KEY, "")
            .parse()
            .unwrap_or(0)
    } else {
        setting::clear(conn, CHECKPOINT_KEY)?;
        0
    };

    let mut stmt = conn.prepare(
        "SELECT id, marriage_date, group_id FROM families WHERE id > ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([after], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = RecomputeSummary::default();
    for (family_id, marriage_date, stored) in rows {
        summary.processed += 1;
        let desired = resolve(&marriage_date, &groups).group_id();
        if desired == stored {
            continue;
        }
        match family::set_group(conn, family_id, desired) {
            Ok(_) => {
                summary.updated += 1;
                setting::set_value(conn, CHECKPOINT_KEY, &family_id.to_string())?;
            }
            Err(e) => {
                log::warn!("group recompute failed for family {family_id}: {e}");
                summary.failures.push(RecomputeFailure {
                    family_id,
                    error: e.to_string(),
                });
            }
        }
    }

    setting::clear(conn, CHECKPOINT_KEY)?;
    log::info!(
        "group recompute: {} processed, {} updated, {} failed",
        summary.processed,
        summary.updated,
        summary.failures.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(id: i64, start: &str, end: &str) -> GroupRange {
        GroupRange {
            id,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let groups = vec![
            range(1, "2000-01-01", "2010-12-31"),
            range(2, "2005-01-01", "2015-12-31"),
        ];
        assert_eq!(resolve("2007-06-15", &groups), Resolution::Assigned(1));

        let reversed: Vec<_> = groups.into_iter().rev().collect();
        assert_eq!(resolve("2007-06-15", &reversed), Resolution::Assigned(2));
    }

    #[test]
    fn bounds_are_inclusive() {
        let groups = vec![range(7, "2010-03-01", "2010-03-31")];
        assert_eq!(resolve("2010-03-01", &groups), Resolution::Assigned(7));
        assert_eq!(resolve("2010-03-31", &groups), Resolution::Assigned(7));
        assert_eq!(
            resolve("2010-04-01", &groups),
            Resolution::Unassigned(UnassignedReason::NoMatch)
        );
    }

    #[test]
    fn missing_or_bad_date_is_no_date() {
        let groups = vec![range(1, "2000-01-01", "2020-12-31")];
        assert_eq!(
            resolve("", &groups),
            Resolution::Unassigned(UnassignedReason::NoDate)
        );
        assert_eq!(
            resolve("not-a-date", &groups),
            Resolution::Unassigned(UnassignedReason::NoDate)
        );
    }

    #[test]
    fn unparseable_range_is_skipped() {
        let groups = vec![
            range(1, "bad", "2020-12-31"),
            range(2, "2000-01-01", "2020-12-31"),
        ];
        assert_eq!(resolve("2010-06-01", &groups), Resolution::Assigned(2));
    }

    #[test]
    fn no_groups_means_no_match() {
        assert_eq!(
            resolve("2010-06-01", &[]),
            Resolution::Unassigned(UnassignedReason::NoMatch)
        );
    }
}
