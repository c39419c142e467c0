use serde::{Deserialize, Serialize};

/// A cohort group: a named bucket of families sharing a marriage-date
/// window. Ranges may overlap; collection order (insertion order) decides
/// which group wins during assignment.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub range_start: String,
    pub range_end: String,
    pub family_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// The slice of group data the assignment resolver scans.
#[derive(Debug, Clone)]
pub struct GroupRange {
    pub id: i64,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub range_start: String,
    pub range_end: String,
}
