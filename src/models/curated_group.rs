//! Curated group model: a saved, named list of students.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A curated group as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CuratedGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_student_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CuratedGroup {
    pub fn new(id: i64, name: impl Into<String>, sids: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sids,
            owner_id: None,
            total_student_count: None,
            students: None,
            extra: Map::new(),
        }
    }

    /// Append `sids` to this group's sids, keeping first occurrences only.
    pub fn merge_sids(&mut self, sids: &[String]) {
        let mut merged: Vec<String> = Vec::with_capacity(self.sids.len() + sids.len());
        for sid in self.sids.iter().chain(sids.iter()) {
            if !merged.contains(sid) {
                merged.push(sid.clone());
            }
        }
        self.sids = merged;
    }

    /// Drop every occurrence of `sid`.
    pub fn remove_sid(&mut self, sid: &str) {
        self.sids.retain(|s| s != sid);
    }

    /// Copy the fields carried by `update` onto this group.
    ///
    /// An empty `sids` list and absent optional fields leave the current
    /// values alone, since rename responses do not always carry them.
    pub fn merge_from(&mut self, update: CuratedGroup) {
        self.name = update.name;
        if !update.sids.is_empty() {
            self.sids = update.sids;
        }
        if update.owner_id.is_some() {
            self.owner_id = update.owner_id;
        }
        if update.total_student_count.is_some() {
            self.total_student_count = update.total_student_count;
        }
        if update.students.is_some() {
            self.students = update.students;
        }
        self.extra.extend(update.extra);
    }
}

/// Request body for `POST /api/curated_group/students/add`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentsRequest<'a> {
    pub curated_group_id: i64,
    pub sids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_student_profiles: Option<bool>,
}

/// Request body for `POST /api/curated_group/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCuratedGroupRequest<'a> {
    pub name: &'a str,
    pub sids: &'a [String],
}

/// Request body for `POST /api/curated_group/rename`.
#[derive(Debug, Clone, Serialize)]
pub struct RenameCuratedGroupRequest<'a> {
    pub id: i64,
    pub name: &'a str,
}

/// Request body for `POST /api/curated_group/{id}/download_csv`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadCsvRequest<'a> {
    pub csv_columns_selected: &'a [String],
}

/// Sort and paging arguments for `GET /api/curated_group/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPage {
    pub order_by: String,
    pub term_id: String,
    pub offset: u32,
    pub limit: u32,
}

impl Default for GroupPage {
    fn default() -> Self {
        Self {
            order_by: "last_name".to_string(),
            term_id: String::new(),
            offset: 0,
            limit: 50,
        }
    }
}

/// An owner and the curated groups they have shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithGroups {
    pub uid: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub groups: Vec<CuratedGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A group member with at least one active alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithAlerts {
    pub sid: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub alert_count: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
