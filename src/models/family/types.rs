use serde::{Deserialize, Serialize};

/// An embedded child row. The id is a caller-generated opaque string,
/// stable across edits of the family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub school_grade: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Family {
    pub id: i64,
    pub husband_name: String,
    pub wife_name: String,
    pub husband_phone: String,
    pub wife_phone: String,
    pub home_phone: String,
    pub church: String,
    pub husband_spiritual_father: String,
    pub wife_spiritual_father: String,
    pub address: String,
    pub husband_occupation: String,
    pub wife_occupation: String,
    pub marriage_date: String,
    pub group_id: Option<i64>,
    pub children: Vec<Child>,
    pub created_at: String,
    pub updated_at: String,
}

/// Compact row for the family list page.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyListItem {
    pub id: i64,
    pub husband_name: String,
    pub wife_name: String,
    pub church: String,
    pub marriage_date: String,
    pub group_id: Option<i64>,
    pub children_count: i64,
}

/// Names and phones for the contact-link surfaces.
#[derive(Debug, Clone)]
pub struct FamilyContact {
    pub id: i64,
    pub husband_name: String,
    pub wife_name: String,
    pub husband_phone: String,
    pub wife_phone: String,
}

#[derive(Debug, Deserialize)]
pub struct FamilyPayload {
    pub husband_name: String,
    pub wife_name: String,
    #[serde(default)]
    pub husband_phone: String,
    #[serde(default)]
    pub wife_phone: String,
    #[serde(default)]
    pub home_phone: String,
    pub church: String,
    #[serde(default)]
    pub husband_spiritual_father: String,
    #[serde(default)]
    pub wife_spiritual_father: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub husband_occupation: String,
    #[serde(default)]
    pub wife_occupation: String,
    pub marriage_date: String,
    #[serde(default)]
    pub children: Vec<Child>,
}
