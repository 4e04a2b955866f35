//! Curated group endpoints.
//!
//! Operations that change the signed-in user's own groups take the
//! [`Session`] and update its cache once the backend has confirmed the change.

use std::path::PathBuf;

use super::ApiClient;
use crate::errors::{not_found_as_none, Result};
use crate::models::{
    AddStudentsRequest, CreateCuratedGroupRequest, CuratedGroup, DownloadCsvRequest, GroupPage,
    RenameCuratedGroupRequest, StudentWithAlerts, UserWithGroups,
};
use crate::session::Session;

impl ApiClient {
    /// POST /api/curated_group/students/add
    ///
    /// The returned group's sids are merged with `sids`, without duplicates.
    pub async fn add_students(
        &self,
        group_id: i64,
        sids: &[String],
        return_student_profiles: Option<bool>,
    ) -> Result<CuratedGroup> {
        let request = AddStudentsRequest {
            curated_group_id: group_id,
            sids,
            return_student_profiles,
        };
        let mut group: CuratedGroup = self
            .post_json(&["api", "curated_group", "students", "add"], &request)
            .await?;
        group.merge_sids(sids);
        Ok(group)
    }

    /// POST /api/curated_group/create
    pub async fn create_curated_group(
        &self,
        session: &mut Session,
        name: &str,
        sids: &[String],
    ) -> Result<CuratedGroup> {
        let request = CreateCuratedGroupRequest { name, sids };
        let group: CuratedGroup = self
            .post_json(&["api", "curated_group", "create"], &request)
            .await?;
        tracing::info!("Created curated group {} ({})", group.id, group.name);
        session.on_create(group.clone());
        Ok(group)
    }

    /// DELETE /api/curated_group/delete/{id}
    pub async fn delete_curated_group(&self, session: &mut Session, group_id: i64) -> Result<()> {
        let id = group_id.to_string();
        if let Err(e) = self.delete(&["api", "curated_group", "delete", &id]).await {
            tracing::warn!("Failed to delete curated group {}: {}", group_id, e);
            return Err(e);
        }
        tracing::info!("Deleted curated group {}", group_id);
        session.on_delete(group_id);
        Ok(())
    }

    /// POST /api/curated_group/rename
    pub async fn rename_curated_group(
        &self,
        session: &mut Session,
        group_id: i64,
        name: &str,
    ) -> Result<CuratedGroup> {
        let request = RenameCuratedGroupRequest { id: group_id, name };
        let group: CuratedGroup = match self
            .post_json(&["api", "curated_group", "rename"], &request)
            .await
        {
            Ok(group) => group,
            Err(e) => {
                tracing::warn!("Failed to rename curated group {}: {}", group_id, e);
                return Err(e);
            }
        };
        session.on_update(group.clone());
        Ok(group)
    }

    /// DELETE /api/curated_group/{group_id}/remove_student/{sid}
    pub async fn remove_from_curated_group(
        &self,
        group_id: i64,
        sid: &str,
    ) -> Result<CuratedGroup> {
        let id = group_id.to_string();
        let mut group: CuratedGroup = self
            .delete_json(&["api", "curated_group", &id, "remove_student", sid])
            .await?;
        group.remove_sid(sid);
        Ok(group)
    }

    /// GET /api/curated_group/{id}; `None` when the group does not exist.
    pub async fn get_curated_group(
        &self,
        group_id: i64,
        page: &GroupPage,
    ) -> Result<Option<CuratedGroup>> {
        let id = group_id.to_string();
        let url = self.url(&["api", "curated_group", &id]);
        tracing::debug!("GET {}", url.path());
        let request = self.http.get(url).query(&[
            ("orderBy", page.order_by.clone()),
            ("termId", page.term_id.clone()),
            ("offset", page.offset.to_string()),
            ("limit", page.limit.to_string()),
        ]);
        not_found_as_none(self.json(request).await)
    }

    /// GET /api/curated_groups/all
    pub async fn get_users_with_groups(&self) -> Result<Option<Vec<UserWithGroups>>> {
        not_found_as_none(self.get_json(&["api", "curated_groups", "all"]).await)
    }

    /// GET /api/curated_group/{group_id}/students_with_alerts
    pub async fn get_students_with_alerts(
        &self,
        group_id: i64,
    ) -> Result<Option<Vec<StudentWithAlerts>>> {
        let id = group_id.to_string();
        not_found_as_none(
            self.get_json(&["api", "curated_group", &id, "students_with_alerts"]).await,
        )
    }

    /// POST /api/curated_group/{id}/download_csv
    ///
    /// Writes the CSV to `<download_dir>/{name}-students-{timestamp}.csv` and
    /// returns the path. Characters of `name` that cannot appear in a file
    /// name are replaced with `_`, so the file always lands in `download_dir`.
    pub async fn download_curated_group_csv(
        &self,
        group_id: i64,
        name: &str,
        columns: &[String],
    ) -> Result<PathBuf> {
        let id = group_id.to_string();
        let url = self.url(&["api", "curated_group", &id, "download_csv"]);
        tracing::debug!("POST {}", url.path());
        let request = DownloadCsvRequest {
            csv_columns_selected: columns,
        };
        let response = self.send(self.http.post(url).json(&request)).await?;
        let bytes = response.bytes().await?;

        let target = self.download_dir.join(csv_file_name(name, chrono::Local::now()));
        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::write(&target, &bytes).await?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

fn csv_file_name<Tz>(name: &str, now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}-students-{}.csv",
        file_safe(name),
        now.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Replace separators, reserved characters and leading dots with `_`.
fn file_safe(name: &str) -> String {
    let mut leading = true;
    name.chars()
        .map(|c| {
            leading = leading && c == '.';
            let reserved = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
            if leading || reserved || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
