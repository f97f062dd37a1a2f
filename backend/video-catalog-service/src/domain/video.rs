use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::ProcessingStatus;

pub const MAX_FILE_NAME_LEN: u64 = 255;
pub const MAX_FILE_PATH_LEN: u64 = 500;
pub const MAX_ERROR_MESSAGE_LEN: u64 = 1000;

/// A row from the `videos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VideoRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the first mutation after insertion
    pub updated_at: Option<DateTime<Utc>>,
    pub file_size: i64,
    pub owner_id: Option<Uuid>,
    pub processing_status: ProcessingStatus,
    /// Only meaningful alongside a failure status; never cleared automatically
    pub error_message: Option<String>,
}

/// Input for inserting a record.
///
/// `id` is honored when present; otherwise the repository generates one.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewVideo {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = MAX_FILE_NAME_LEN, message = "fileName is empty or too long"))]
    pub file_name: String,
    #[validate(length(min = 1, max = MAX_FILE_PATH_LEN, message = "filePath is empty or too long"))]
    pub file_path: String,
    #[validate(range(min = 0, message = "fileSize must not be negative"))]
    pub file_size: i64,
    pub owner_id: Option<Uuid>,
    pub processing_status: ProcessingStatus,
}

impl NewVideo {
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>, file_size: i64) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_size,
            owner_id: None,
            processing_status: ProcessingStatus::Created,
        }
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Materialize the stored row for a freshly assigned id and timestamp.
    pub(crate) fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> VideoRecord {
        VideoRecord {
            id,
            file_name: self.file_name,
            file_path: self.file_path,
            created_at,
            updated_at: None,
            file_size: self.file_size,
            owner_id: self.owner_id,
            processing_status: self.processing_status,
            error_message: None,
        }
    }
}

/// Replacement values for the generic update.
///
/// Status and error message are deliberately absent: they change only through
/// the status-update path.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct VideoChanges {
    pub id: Uuid,
    #[validate(length(min = 1, max = MAX_FILE_NAME_LEN, message = "fileName is empty or too long"))]
    pub file_name: String,
    #[validate(length(min = 1, max = MAX_FILE_PATH_LEN, message = "filePath is empty or too long"))]
    pub file_path: String,
    #[validate(range(min = 0, message = "fileSize must not be negative"))]
    pub file_size: i64,
    pub owner_id: Option<Uuid>,
}

impl VideoChanges {
    pub(crate) fn apply_to(&self, record: &mut VideoRecord, at: DateTime<Utc>) {
        record.file_name = self.file_name.clone();
        record.file_path = self.file_path.clone();
        record.file_size = self.file_size;
        record.owner_id = self.owner_id;
        record.updated_at = Some(at);
    }
}
