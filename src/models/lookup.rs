//! Lookup models: team groups, user profiles and the signed-in user.

use serde::{Deserialize, Serialize};

use super::CuratedGroup;

/// An athletic team group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamGroup {
    pub group_code: String,
    pub name: String,
}

/// A user profile as returned by the department lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Department membership of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub uid: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub my_curated_groups: Vec<CuratedGroup>,
}
