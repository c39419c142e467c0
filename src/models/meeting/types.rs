use serde::{Deserialize, Serialize};

pub const SEGMENT_TYPES: &[&str] = &["opening", "hymns", "sermon", "seminar", "qa"];

/// One timed agenda item. The id is a caller-generated opaque string; the
/// responsible servant is a free-text label, not a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub responsible_servant: String,
    pub segment_type: String,
    #[serde(default)]
    pub position: i64,
}

/// Full meeting detail. total_attendance / total_families are projections
/// maintained by the attendance ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub total_attendance: i64,
    pub total_families: i64,
    pub agenda: Vec<Segment>,
    pub created_by: String,
    pub created_at: String,
}

/// For the meeting list page.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingListItem {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub total_attendance: i64,
    pub total_families: i64,
    pub segment_count: i64,
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct MeetingPayload {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub agenda: Vec<Segment>,
}
