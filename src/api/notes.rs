//! Advising note endpoints.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::ApiClient;
use crate::errors::{not_found_as_none, ClientError, Result};
use crate::models::{CreatedNotes, NewAttachment, Note, NoteDraft, NoteId, NoteUpdate};

impl ApiClient {
    /// GET /api/note/{id}; `None` when the note does not exist.
    pub async fn get_note(&self, note_id: &NoteId) -> Result<Option<Note>> {
        let id = note_id.to_string();
        not_found_as_none(self.get_json(&["api", "note", &id]).await)
    }

    /// POST /api/notes/{id}/mark_read
    pub async fn mark_note_read(&self, note_id: &NoteId) -> Result<Option<Value>> {
        let id = note_id.to_string();
        not_found_as_none(self.post_empty(&["api", "notes", &id, "mark_read"]).await)
    }

    /// POST /api/notes/create
    ///
    /// A batch draft (see [`NoteDraft::is_batch`]) makes the backend write one
    /// note per student; that response is returned as-is.
    pub async fn create_notes(&self, draft: NoteDraft) -> Result<CreatedNotes> {
        if draft.sids.is_empty() && !draft.is_batch() {
            return Err(ClientError::Validation(
                "A note needs at least one SID, cohort or curated group".to_string(),
            ));
        }
        let batch = draft.is_batch();
        let form = draft_form(draft)?;
        let path = ["api", "notes", "create"];

        if batch {
            let response: Value = self.post_multipart(&path, form).await?;
            tracing::info!("Created batch of notes");
            Ok(CreatedNotes::Batch(response))
        } else {
            let note: Note = self.post_multipart(&path, form).await?;
            tracing::info!("Created note {}", note.id);
            Ok(CreatedNotes::Single(note))
        }
    }

    /// POST /api/notes/update
    pub async fn update_note(&self, update: NoteUpdate) -> Result<Note> {
        let note_id = update.id.clone();
        let form = update_form(update)?;
        let note: Note = self.post_multipart(&["api", "notes", "update"], form).await?;
        tracing::info!("Updated note {}", note_id);
        Ok(note)
    }

    /// DELETE /api/notes/delete/{id}
    pub async fn delete_note(&self, note_id: &NoteId) -> Result<Value> {
        let id = note_id.to_string();
        let response = self.delete_json(&["api", "notes", "delete", &id]).await?;
        tracing::info!("Deleted note {}", note_id);
        Ok(response)
    }

    /// POST /api/notes/{id}/attachments
    pub async fn add_attachments(
        &self,
        note_id: &NoteId,
        attachments: Vec<NewAttachment>,
    ) -> Result<Note> {
        let id = note_id.to_string();
        let form = attach(Form::new(), attachments)?;
        self.post_multipart(&["api", "notes", &id, "attachments"], form).await
    }

    /// DELETE /api/notes/{id}/attachment/{attachment_id}
    pub async fn remove_attachment(&self, note_id: &NoteId, attachment_id: i64) -> Result<Note> {
        let id = note_id.to_string();
        let attachment_id = attachment_id.to_string();
        self.delete_json(&["api", "notes", &id, "attachment", &attachment_id]).await
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn optional_text(form: Form, name: &'static str, value: Option<String>) -> Form {
    match value {
        Some(value) => form.text(name, value),
        None => form,
    }
}

/// Add each attachment as an `attachment[{index}]` file part.
fn attach(mut form: Form, attachments: Vec<NewAttachment>) -> Result<Form> {
    for (index, attachment) in attachments.into_iter().enumerate() {
        let mut part = Part::bytes(attachment.bytes).file_name(attachment.file_name);
        if let Some(content_type) = attachment.content_type {
            part = part.mime_str(&content_type).map_err(|e| {
                ClientError::Validation(format!("Invalid content type '{}': {}", content_type, e))
            })?;
        }
        form = form.part(format!("attachment[{}]", index), part);
    }
    Ok(form)
}

fn draft_form(draft: NoteDraft) -> Result<Form> {
    let form = Form::new()
        .text("body", draft.body)
        .text("cohortIds", join(&draft.cohort_ids))
        .text("curatedGroupIds", join(&draft.curated_group_ids))
        .text("isPrivate", draft.is_private.to_string())
        .text("sids", join(&draft.sids))
        .text("subject", draft.subject)
        .text("templateAttachmentIds", join(&draft.template_attachment_ids))
        .text("topics", join(&draft.topics));
    let form = optional_text(form, "contactType", draft.contact_type);
    let form = optional_text(form, "setDate", draft.set_date);
    attach(form, draft.attachments)
}

fn update_form(update: NoteUpdate) -> Result<Form> {
    let form = Form::new()
        .text("id", update.id.to_string())
        .text("body", update.body)
        .text("isPrivate", update.is_private.to_string())
        .text("subject", update.subject)
        .text("topics", join(&update.topics));
    let form = optional_text(form, "contactType", update.contact_type);
    let form = optional_text(form, "setDate", update.set_date);
    attach(form, update.attachments)
}
