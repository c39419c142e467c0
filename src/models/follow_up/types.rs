use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpMethod {
    Call,
    HomeVisit,
}

impl FollowUpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpMethod::Call => "call",
            FollowUpMethod::HomeVisit => "home_visit",
        }
    }

    pub fn parse(s: &str) -> Option<FollowUpMethod> {
        match s {
            "call" => Some(FollowUpMethod::Call),
            "home_visit" => Some(FollowUpMethod::HomeVisit),
            _ => None,
        }
    }
}

impl rusqlite::types::FromSql for FollowUpMethod {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        FollowUpMethod::parse(s).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("unknown follow-up method '{s}'").into())
        })
    }
}

/// A logged contact attempt with an absentee family, jointly credited to
/// one or more servants.
#[derive(Debug, Clone, Serialize)]
pub struct FollowUp {
    pub id: i64,
    pub family_id: i64,
    pub method: FollowUpMethod,
    pub responsible_servant_ids: Vec<i64>,
    pub notes: String,
    pub outcome: String,
    pub follow_up_date: String,
    pub created_by: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewFollowUp {
    pub family_id: i64,
    pub method: FollowUpMethod,
    pub responsible_servant_ids: Vec<i64>,
    pub notes: String,
    pub outcome: String,
    pub follow_up_date: String,
}

/// One unit of credit per servant listed on a follow-up — joint
/// responsibility, never split.
#[derive(Debug, Clone, Serialize)]
pub struct ServantActivity {
    pub servant_id: i64,
    pub name: String,
    pub count: i64,
}
