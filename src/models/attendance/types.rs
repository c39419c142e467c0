use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }

    pub fn parse(s: &str) -> Option<AttendanceStatus> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

impl rusqlite::types::FromSql for AttendanceStatus {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        AttendanceStatus::parse(s).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("unknown attendance status '{s}'").into())
        })
    }
}

/// One ledger row: the single source of truth for a family's presence at a
/// meeting. The reason is meaningful only when absent.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub family_id: i64,
    pub meeting_id: i64,
    pub status: AttendanceStatus,
    pub reason: String,
    pub recorded_by: String,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingTotals {
    pub total_attendance: i64,
    pub total_families: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkPayload {
    pub family_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub reason: Option<String>,
}
