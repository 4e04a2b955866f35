//! Advising note models.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::Result;

/// Note identifier. Notes created in this application have integer ids;
/// imported notes use string ids such as `11667051-00001`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum NoteId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Int(id) => write!(f, "{}", id),
            NoteId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        NoteId::Int(id)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        NoteId::Text(id.to_string())
    }
}

/// An attachment stored with a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteAttachment {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Author of a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteAuthor {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An advising note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub set_date: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub attachments: Vec<NoteAttachment>,
    #[serde(default)]
    pub author: Option<NoteAuthor>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub read: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file to upload with a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl NewAttachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an attachment from disk, named after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Everything needed to create one note, or one note per student in a batch.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub attachments: Vec<NewAttachment>,
    pub body: String,
    pub cohort_ids: Vec<i64>,
    pub contact_type: Option<String>,
    pub curated_group_ids: Vec<i64>,
    pub is_private: bool,
    pub set_date: Option<String>,
    pub sids: Vec<String>,
    pub subject: String,
    pub template_attachment_ids: Vec<i64>,
    pub topics: Vec<String>,
}

impl NoteDraft {
    /// The backend creates one note per distinct student when the draft names
    /// more than one sid or any cohort or curated group.
    pub fn is_batch(&self) -> bool {
        self.sids.len() > 1 || !self.cohort_ids.is_empty() || !self.curated_group_ids.is_empty()
    }
}

/// Changes to an existing note.
#[derive(Debug, Clone)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub body: String,
    pub contact_type: Option<String>,
    pub is_private: bool,
    pub set_date: Option<String>,
    pub subject: String,
    pub topics: Vec<String>,
    pub attachments: Vec<NewAttachment>,
}

/// Result of `create_notes`.
#[derive(Debug, Clone)]
pub enum CreatedNotes {
    Single(Note),
    /// Batch responses are passed through untouched.
    Batch(Value),
}
