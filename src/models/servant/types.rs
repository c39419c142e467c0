use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServantRole {
    Priest,
    MaleLeader,
    FemaleLeader,
    Assistant,
}

impl ServantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServantRole::Priest => "priest",
            ServantRole::MaleLeader => "male_leader",
            ServantRole::FemaleLeader => "female_leader",
            ServantRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<ServantRole> {
        match s {
            "priest" => Some(ServantRole::Priest),
            "male_leader" => Some(ServantRole::MaleLeader),
            "female_leader" => Some(ServantRole::FemaleLeader),
            "assistant" => Some(ServantRole::Assistant),
            _ => None,
        }
    }
}

impl rusqlite::types::FromSql for ServantRole {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        ServantRole::parse(s).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("unknown servant role '{s}'").into())
        })
    }
}

/// Which cohort groups a servant is responsible for. Replaces the old
/// `"all" | [ids]` sentinel with an explicit variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "group_ids")]
pub enum GroupScope {
    Unrestricted,
    Specific(Vec<i64>),
}

impl GroupScope {
    pub fn covers(&self, group_id: i64) -> bool {
        match self {
            GroupScope::Unrestricted => true,
            GroupScope::Specific(ids) => ids.contains(&group_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Servant {
    pub id: i64,
    pub name: String,
    pub role: ServantRole,
    pub contact: String,
    pub notes: String,
    pub scope: GroupScope,
}

#[derive(Debug, Deserialize)]
pub struct ServantPayload {
    pub name: String,
    pub role: ServantRole,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
    pub scope: GroupScope,
}
