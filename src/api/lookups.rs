//! Lookup endpoints backing the filter menus and the session.

use async_trait::async_trait;

use super::ApiClient;
use crate::errors::Result;
use crate::filters::OptionSource;
use crate::models::{CurrentUser, TeamGroup, UserProfile};

impl ApiClient {
    /// GET /api/profile/my
    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.get_json(&["api", "profile", "my"]).await
    }
}

#[async_trait]
impl OptionSource for ApiClient {
    /// GET /api/majors/relevant
    async fn relevant_majors(&self) -> Result<Vec<String>> {
        self.get_json(&["api", "majors", "relevant"]).await
    }

    /// GET /api/team_groups/all
    async fn all_team_groups(&self) -> Result<Vec<TeamGroup>> {
        self.get_json(&["api", "team_groups", "all"]).await
    }

    /// GET /api/users/dept/{code}
    async fn profiles_per_dept_code(&self, dept_code: &str) -> Result<Vec<UserProfile>> {
        self.get_json(&["api", "users", "dept", dept_code]).await
    }
}
