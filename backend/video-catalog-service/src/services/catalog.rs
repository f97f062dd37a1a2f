//! Request validation and translation for the video catalog.
//!
//! Every operation here returns a [`ServiceResult`]: malformed input becomes
//! `InvalidRequest` before the store is touched, missing rows become
//! `NotFound`, and any repository failure becomes `Internal`.

use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    NewVideo, ProcessingStatus, VideoChanges, VideoRecord, MAX_ERROR_MESSAGE_LEN,
    MAX_FILE_NAME_LEN,
};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::VideoRepository;

/// How `delete` treats a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the row.
    #[default]
    Hard,
    /// Keep the row and mark it [`ProcessingStatus::Deleted`].
    Soft,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(DeletePolicy::Hard),
            "soft" => Ok(DeletePolicy::Soft),
            other => Err(format!("unknown delete policy: {}", other)),
        }
    }
}

/// Upload request as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct UploadVideo {
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub owner_id: Option<String>,
    /// Raw status ordinal; `None` means `Created`
    pub status: Option<i32>,
    /// Empty or `None` means "generate"
    pub id: Option<String>,
}

/// Replacement of the descriptive fields of an existing record.
#[derive(Debug, Clone, Default)]
pub struct UpdateVideoDetails {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub owner_id: Option<String>,
}

/// Catalog service: validation, field-permission rules and the status machine.
#[derive(Clone)]
pub struct VideoCatalog {
    repo: Arc<dyn VideoRepository>,
    delete_policy: DeletePolicy,
}

fn parse_id(raw: &str, field: &str) -> ServiceResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServiceError::InvalidRequest(format!("{} is missing.", field)));
    }
    Uuid::parse_str(raw)
        .map_err(|_| ServiceError::InvalidRequest(format!("{} is missing or invalid.", field)))
}

/// Treat absent and blank identifiers alike; reject anything else unparseable.
fn parse_optional_id(raw: Option<&str>, field: &str) -> ServiceResult<Option<Uuid>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value, field).map(Some),
    }
}

/// Owner filter or tag: an identifier that does not parse is ignored.
fn lenient_owner(raw: Option<&str>) -> Option<Uuid> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| Uuid::parse_str(v).ok())
}

fn parse_status(raw: i32) -> ServiceResult<ProcessingStatus> {
    ProcessingStatus::try_from(raw).map_err(|e| ServiceError::InvalidRequest(e.to_string()))
}

fn require_text(value: &str, field: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidRequest(format!("{} is missing.", field)));
    }
    Ok(())
}

impl VideoCatalog {
    pub fn new(repo: Arc<dyn VideoRepository>, delete_policy: DeletePolicy) -> Self {
        Self {
            repo,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn repository(&self) -> &Arc<dyn VideoRepository> {
        &self.repo
    }

    /// Validate an upload and persist it as a new record.
    pub async fn upload(&self, request: UploadVideo) -> ServiceResult<VideoRecord> {
        if request.file_name.trim().is_empty() || request.file_path.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "FileName or FilePath is missing.".to_string(),
            ));
        }

        let id = parse_optional_id(request.id.as_deref(), "VideoId")?;
        // An owner id that does not parse leaves the record unowned
        let owner_id = lenient_owner(request.owner_id.as_deref());
        let processing_status = match request.status {
            Some(raw) => parse_status(raw)?,
            None => ProcessingStatus::default(),
        };

        let video = NewVideo {
            id,
            file_name: request.file_name,
            file_path: request.file_path,
            file_size: request.file_size,
            owner_id,
            processing_status,
        };
        video.validate()?;

        let record = self.repo.create(video).await?;
        info!(
            video_id = %record.id,
            status = %record.processing_status,
            "Video uploaded"
        );
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<VideoRecord> {
        let id = parse_id(id, "VideoId")?;
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(ServiceError::video_not_found)
    }

    /// Identifiers of all records, or only those of `owner_id` when it parses.
    pub async fn list(&self, owner_id: Option<&str>) -> ServiceResult<Vec<Uuid>> {
        let records = match lenient_owner(owner_id) {
            Some(owner) => self.repo.get_by_owner(owner).await?,
            None => self.repo.get_all().await?,
        };
        debug!(count = records.len(), "Listed videos");
        Ok(records.into_iter().map(|r| r.id).collect())
    }

    /// Apply a status transition.
    ///
    /// Any status may follow any other. A non-empty `error_message` replaces
    /// the stored one regardless of the target status.
    pub async fn update_status(
        &self,
        id: &str,
        status: i32,
        error_message: Option<&str>,
    ) -> ServiceResult<VideoRecord> {
        let id = parse_id(id, "VideoId")?;
        let status = parse_status(status)?;
        let error_message = error_message.filter(|m| !m.is_empty());
        if let Some(message) = error_message {
            if message.chars().count() as u64 > MAX_ERROR_MESSAGE_LEN {
                return Err(ServiceError::InvalidRequest(format!(
                    "ErrorMessage must be at most {} characters.",
                    MAX_ERROR_MESSAGE_LEN
                )));
            }
        }

        let record = self
            .repo
            .update_status(id, status, error_message.map(str::to_string))
            .await?
            .ok_or_else(ServiceError::video_not_found)?;

        info!(video_id = %id, status = %status, "Video status updated");
        Ok(record)
    }

    /// Delete according to the configured [`DeletePolicy`].
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id, "VideoId")?;
        let found = match self.delete_policy {
            DeletePolicy::Hard => self.repo.delete(id).await?,
            DeletePolicy::Soft => self
                .repo
                .update_status(id, ProcessingStatus::Deleted, None)
                .await?
                .is_some(),
        };

        if !found {
            return Err(ServiceError::video_not_found());
        }
        info!(video_id = %id, policy = ?self.delete_policy, "Video deleted");
        Ok(())
    }

    pub async fn rename(&self, id: &str, file_name: &str) -> ServiceResult<VideoRecord> {
        let id = parse_id(id, "VideoId")?;
        require_text(file_name, "FileName")?;
        if file_name.chars().count() as u64 > MAX_FILE_NAME_LEN {
            return Err(ServiceError::InvalidRequest(format!(
                "FileName must be at most {} characters.",
                MAX_FILE_NAME_LEN
            )));
        }

        let record = self
            .repo
            .update_file_name(id, file_name)
            .await?
            .ok_or_else(ServiceError::video_not_found)?;
        info!(video_id = %id, "Video renamed");
        Ok(record)
    }

    /// Replace name, path, size and owner; status and error message are untouched.
    pub async fn update_details(&self, request: UpdateVideoDetails) -> ServiceResult<VideoRecord> {
        let id = parse_id(&request.id, "VideoId")?;
        require_text(&request.file_name, "FileName")?;
        require_text(&request.file_path, "FilePath")?;
        let owner_id = parse_optional_id(request.owner_id.as_deref(), "OwnerId")?;
        let changes = VideoChanges {
            id,
            file_name: request.file_name,
            file_path: request.file_path,
            file_size: request.file_size,
            owner_id,
        };
        changes.validate()?;

        let record = self
            .repo
            .update(changes)
            .await?
            .ok_or_else(ServiceError::video_not_found)?;
        info!(video_id = %id, "Video details updated");
        Ok(record)
    }

    pub async fn find_by_file_name(&self, file_name: &str) -> ServiceResult<VideoRecord> {
        require_text(file_name, "FileName")?;
        self.repo
            .get_by_file_name(file_name)
            .await?
            .ok_or_else(ServiceError::video_not_found)
    }

    /// One newest-first page plus the total number of records.
    pub async fn list_page(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> ServiceResult<(Vec<VideoRecord>, i64)> {
        if page_number < 1 {
            return Err(ServiceError::InvalidRequest(
                "PageNumber must be at least 1.".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(ServiceError::InvalidRequest(
                "PageSize must be positive.".to_string(),
            ));
        }
        Ok(self.repo.get_paginated(page_number, page_size).await?)
    }

    /// Same owner filtering as [`VideoCatalog::list`].
    pub async fn count(&self, owner_id: Option<&str>) -> ServiceResult<i64> {
        match lenient_owner(owner_id) {
            Some(owner) => Ok(self.repo.get_count_by_owner(owner).await?),
            None => Ok(self.repo.get_total_count().await?),
        }
    }

    /// Physically remove every record of an owner, independent of [`DeletePolicy`].
    pub async fn delete_owner_videos(&self, owner_id: &str) -> ServiceResult<u64> {
        let owner = parse_id(owner_id, "OwnerId")?;
        let deleted = self.repo.delete_by_owner(owner).await?;
        info!(owner_id = %owner, deleted, "Owner videos deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, RepositoryError};
    use crate::repository::{InMemoryVideoRepository, MockVideoRepository};

    fn catalog(policy: DeletePolicy) -> VideoCatalog {
        VideoCatalog::new(Arc::new(InMemoryVideoRepository::new()), policy)
    }

    fn upload_request(name: &str) -> UploadVideo {
        UploadVideo {
            file_name: name.to_string(),
            file_path: format!("/store/{}", name),
            file_size: 1024,
            ..UploadVideo::default()
        }
    }

    fn failing_catalog() -> VideoCatalog {
        let mut repo = MockVideoRepository::new();
        repo.expect_create()
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));
        repo.expect_get_by_id()
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));
        repo.expect_get_all()
            .returning(|| Err(RepositoryError::Database(sqlx::Error::PoolClosed)));
        repo.expect_update_status()
            .returning(|_, _, _| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));
        repo.expect_delete()
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));
        VideoCatalog::new(Arc::new(repo), DeletePolicy::Hard)
    }

    #[test]
    fn test_delete_policy_from_str() {
        assert_eq!("hard".parse::<DeletePolicy>(), Ok(DeletePolicy::Hard));
        assert_eq!(" SOFT ".parse::<DeletePolicy>(), Ok(DeletePolicy::Soft));
        assert!("archive".parse::<DeletePolicy>().is_err());
        assert_eq!(DeletePolicy::default(), DeletePolicy::Hard);
    }

    #[tokio::test]
    async fn test_end_to_end_hard_delete() {
        let catalog = catalog(DeletePolicy::Hard);

        let record = catalog.upload(upload_request("a.mp4")).await.unwrap();
        let id = record.id.to_string();

        let fetched = catalog.get(&id).await.unwrap();
        assert_eq!(fetched.file_name, "a.mp4");
        assert_eq!(fetched.processing_status, ProcessingStatus::Created);

        catalog
            .update_status(&id, ProcessingStatus::Processing.as_i32(), None)
            .await
            .unwrap();
        assert_eq!(
            catalog.get(&id).await.unwrap().processing_status,
            ProcessingStatus::Processing
        );

        catalog.delete(&id).await.unwrap();
        let err = catalog.get(&id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_end_to_end_soft_delete() {
        let catalog = catalog(DeletePolicy::Soft);
        let record = catalog.upload(upload_request("a.mp4")).await.unwrap();
        let id = record.id.to_string();

        catalog.delete(&id).await.unwrap();

        let fetched = catalog.get(&id).await.unwrap();
        assert_eq!(fetched.processing_status, ProcessingStatus::Deleted);
        assert!(fetched.updated_at.is_some());
        assert!(catalog.repository().exists(record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found_under_both_policies() {
        for policy in [DeletePolicy::Hard, DeletePolicy::Soft] {
            let err = catalog(policy)
                .delete(&Uuid::new_v4().to_string())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::NotFound);
        }
    }

    #[tokio::test]
    async fn test_upload_requires_name_and_path() {
        let catalog = catalog(DeletePolicy::Hard);

        let mut request = upload_request("a.mp4");
        request.file_name.clear();
        let err = catalog.upload(request).await.unwrap_err();
        assert_eq!(err, ServiceError::InvalidRequest("FileName or FilePath is missing.".into()));

        let mut request = upload_request("a.mp4");
        request.file_path.clear();
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(catalog.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_blank_name_and_path() {
        let catalog = catalog(DeletePolicy::Hard);

        let mut request = upload_request("a.mp4");
        request.file_name = "   ".to_string();
        let err = catalog.upload(request).await.unwrap_err();
        assert_eq!(err, ServiceError::InvalidRequest("FileName or FilePath is missing.".into()));

        let mut request = upload_request("a.mp4");
        request.file_path = "\t".to_string();
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog
                .rename(&Uuid::new_v4().to_string(), "   ")
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidRequest
        );
        let err = catalog
            .update_details(UpdateVideoDetails {
                id: Uuid::new_v4().to_string(),
                file_name: " ".to_string(),
                file_path: "/store/a.mp4".to_string(),
                file_size: 1,
                owner_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(catalog.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_enforces_length_limits() {
        let catalog = catalog(DeletePolicy::Hard);
        let mut request = upload_request("a.mp4");
        request.file_name = "n".repeat(256);
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );

        let mut request = upload_request("a.mp4");
        request.file_path = "p".repeat(501);
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );

        let mut request = upload_request("a.mp4");
        request.file_size = -5;
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
    }

    #[tokio::test]
    async fn test_upload_id_policy() {
        let catalog = catalog(DeletePolicy::Hard);

        let supplied = Uuid::new_v4();
        let mut request = upload_request("a.mp4");
        request.id = Some(supplied.to_string());
        assert_eq!(catalog.upload(request.clone()).await.unwrap().id, supplied);

        // Same id again violates the unique key
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InternalError
        );

        let mut request = upload_request("b.mp4");
        request.id = Some(String::new());
        let generated = catalog.upload(request).await.unwrap();
        assert_ne!(generated.id, supplied);

        let mut request = upload_request("c.mp4");
        request.id = Some("not-a-uuid".to_string());
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
    }

    #[tokio::test]
    async fn test_upload_status_and_owner_parsing() {
        let catalog = catalog(DeletePolicy::Hard);
        let owner = Uuid::new_v4();

        let mut request = upload_request("a.mp4");
        request.owner_id = Some(owner.to_string());
        request.status = Some(ProcessingStatus::Uploaded.as_i32());
        let record = catalog.upload(request).await.unwrap();
        assert_eq!(record.owner_id, Some(owner));
        assert_eq!(record.processing_status, ProcessingStatus::Uploaded);

        let mut request = upload_request("b.mp4");
        request.status = Some(99);
        assert_eq!(
            catalog.upload(request).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );

        let mut request = upload_request("c.mp4");
        request.owner_id = Some("bogus".to_string());
        let unowned = catalog.upload(request).await.unwrap();
        assert_eq!(unowned.owner_id, None);
        assert_eq!(catalog.get(&unowned.id.to_string()).await.unwrap().owner_id, None);
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let catalog = catalog(DeletePolicy::Hard);
        for raw in ["", "   ", "123", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
            assert_eq!(
                catalog.get(raw).await.unwrap_err().code(),
                ErrorCode::InvalidRequest
            );
        }
        assert_eq!(
            catalog
                .get(&Uuid::new_v4().to_string())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let catalog = catalog(DeletePolicy::Hard);
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut mine = Vec::new();
        for i in 0..3 {
            let mut request = upload_request(&format!("u{}.mp4", i));
            request.owner_id = Some(owner.to_string());
            mine.push(catalog.upload(request).await.unwrap().id);
        }
        for i in 0..2 {
            let mut request = upload_request(&format!("o{}.mp4", i));
            request.owner_id = Some(other.to_string());
            catalog.upload(request).await.unwrap();
        }

        let listed = catalog.list(Some(&owner.to_string())).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|id| mine.contains(id)));

        assert_eq!(catalog.list(None).await.unwrap().len(), 5);
        assert_eq!(catalog.list(Some("")).await.unwrap().len(), 5);
        assert_eq!(catalog.list(Some("nope")).await.unwrap().len(), 5);
        assert_eq!(catalog.count(Some("nope")).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_list_with_unparseable_owner_returns_everything() {
        let catalog = catalog(DeletePolicy::Hard);
        let owner = Uuid::new_v4();
        let mut request = upload_request("a.mp4");
        request.owner_id = Some(owner.to_string());
        catalog.upload(request).await.unwrap();
        catalog.upload(upload_request("b.mp4")).await.unwrap();

        let listed = catalog.list(Some("not-a-guid")).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(catalog.list(Some(" ")).await.unwrap().len(), 2);
        assert_eq!(catalog.list(Some(&owner.to_string())).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_error_message_rules() {
        let catalog = catalog(DeletePolicy::Hard);
        let id = catalog
            .upload(upload_request("a.mp4"))
            .await
            .unwrap()
            .id
            .to_string();

        let failed = catalog
            .update_status(&id, ProcessingStatus::Failed.as_i32(), Some("codec missing"))
            .await
            .unwrap();
        assert_eq!(failed.error_message.as_deref(), Some("codec missing"));

        // Empty message leaves the stored one in place, even for a non-error status
        let processed = catalog
            .update_status(&id, ProcessingStatus::Processed.as_i32(), Some(""))
            .await
            .unwrap();
        assert_eq!(processed.processing_status, ProcessingStatus::Processed);
        assert_eq!(processed.error_message.as_deref(), Some("codec missing"));

        // Messages are accepted for non-error statuses too
        let created = catalog
            .update_status(&id, ProcessingStatus::Created.as_i32(), Some("note"))
            .await
            .unwrap();
        assert_eq!(created.error_message.as_deref(), Some("note"));

        let too_long = "e".repeat(1001);
        assert_eq!(
            catalog
                .update_status(&id, ProcessingStatus::Failed.as_i32(), Some(&too_long))
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidRequest
        );
    }

    #[tokio::test]
    async fn test_update_status_validation_and_not_found() {
        let catalog = catalog(DeletePolicy::Hard);
        let id = catalog
            .upload(upload_request("a.mp4"))
            .await
            .unwrap()
            .id
            .to_string();

        assert_eq!(
            catalog.update_status(&id, 6, None).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog.update_status(&id, -1, None).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog
                .update_status(&Uuid::new_v4().to_string(), 2, None)
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_rename_and_update_details() {
        let catalog = catalog(DeletePolicy::Hard);
        let record = catalog.upload(upload_request("a.mp4")).await.unwrap();
        let id = record.id.to_string();
        catalog
            .update_status(&id, ProcessingStatus::Failed.as_i32(), Some("boom"))
            .await
            .unwrap();

        let renamed = catalog.rename(&id, "renamed.mp4").await.unwrap();
        assert_eq!(renamed.file_name, "renamed.mp4");
        assert_eq!(
            catalog.rename(&id, "").await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );

        let owner = Uuid::new_v4();
        let updated = catalog
            .update_details(UpdateVideoDetails {
                id: id.clone(),
                file_name: "b.mp4".to_string(),
                file_path: "/store/b.mp4".to_string(),
                file_size: 4096,
                owner_id: Some(owner.to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.owner_id, Some(owner));
        assert_eq!(updated.file_size, 4096);
        assert_eq!(updated.processing_status, ProcessingStatus::Failed);
        assert_eq!(updated.error_message.as_deref(), Some("boom"));
        assert_eq!(updated.created_at, record.created_at);

        let err = catalog
            .update_details(UpdateVideoDetails {
                id: Uuid::new_v4().to_string(),
                file_name: "x.mp4".to_string(),
                file_path: "/x".to_string(),
                file_size: 1,
                owner_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(catalog.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_page_count_and_owner_delete() {
        let catalog = catalog(DeletePolicy::Hard);
        let owner = Uuid::new_v4();
        for i in 0..5 {
            let mut request = upload_request(&format!("{}.mp4", i));
            if i % 2 == 0 {
                request.owner_id = Some(owner.to_string());
            }
            catalog.upload(request).await.unwrap();
        }

        assert_eq!(catalog.find_by_file_name("3.mp4").await.unwrap().file_name, "3.mp4");
        assert_eq!(
            catalog.find_by_file_name("missing.mp4").await.unwrap_err().code(),
            ErrorCode::NotFound
        );

        let (page, total) = catalog.list_page(2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(
            catalog.list_page(0, 2).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );

        assert_eq!(catalog.count(Some(&owner.to_string())).await.unwrap(), 3);
        assert_eq!(
            catalog.delete_owner_videos(&owner.to_string()).await.unwrap(),
            3
        );
        assert_eq!(catalog.count(None).await.unwrap(), 2);
        assert_eq!(
            catalog.delete_owner_videos("").await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_internal_error() {
        let catalog = failing_catalog();
        let id = Uuid::new_v4().to_string();

        let err = catalog.upload(upload_request("a.mp4")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(err.to_string().starts_with("Database error"));

        assert_eq!(catalog.get(&id).await.unwrap_err().code(), ErrorCode::InternalError);
        assert_eq!(catalog.list(None).await.unwrap_err().code(), ErrorCode::InternalError);
        assert_eq!(
            catalog.update_status(&id, 1, None).await.unwrap_err().code(),
            ErrorCode::InternalError
        );
        assert_eq!(catalog.delete(&id).await.unwrap_err().code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn test_validation_never_reaches_store() {
        // No expectations set: any repository call would panic the mock
        let catalog = VideoCatalog::new(Arc::new(MockVideoRepository::new()), DeletePolicy::Hard);

        assert_eq!(
            catalog.get("bad").await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog.update_status("bad", 1, None).await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog.delete("").await.unwrap_err().code(),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            catalog
                .upload(UploadVideo::default())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidRequest
        );
    }
}
