use uuid::Uuid;

use crate::domain::{NewVideo, ProcessingStatus, VideoChanges, VideoRecord};
use crate::error::RepoResult;

/// Data-access contract over video records.
///
/// Every listing is ordered newest first (`created_at DESC`, ties broken by
/// `id DESC`). Each mutation commits on its own; nothing is batched across
/// calls. Both [`PostgresVideoRepository`](super::PostgresVideoRepository)
/// and [`InMemoryVideoRepository`](super::InMemoryVideoRepository) implement this.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a record, assigning `created_at` and an id (unless one is supplied).
    async fn create(&self, video: NewVideo) -> RepoResult<VideoRecord>;

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<VideoRecord>>;

    async fn get_all(&self) -> RepoResult<Vec<VideoRecord>>;

    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<VideoRecord>>;

    /// First record with the given file name; which one is unspecified when
    /// names collide.
    async fn get_by_file_name(&self, file_name: &str) -> RepoResult<Option<VideoRecord>>;

    /// Overwrite name, path, size and owner. Returns `None` for an unknown id
    /// without creating anything.
    async fn update(&self, changes: VideoChanges) -> RepoResult<Option<VideoRecord>>;

    async fn update_file_name(&self, id: Uuid, file_name: &str)
        -> RepoResult<Option<VideoRecord>>;

    /// Set the processing status; `error_message`, when given, replaces the
    /// stored one and is otherwise left as is.
    async fn update_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> RepoResult<Option<VideoRecord>>;

    /// Physically remove a row. Returns whether one existed.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Physically remove every row owned by `owner_id`, returning the count.
    async fn delete_by_owner(&self, owner_id: Uuid) -> RepoResult<u64>;

    async fn exists(&self, id: Uuid) -> RepoResult<bool>;

    /// One page of the unfiltered listing plus the unfiltered total.
    ///
    /// `page_number` starts at 1; `page_size` must be positive.
    async fn get_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepoResult<(Vec<VideoRecord>, i64)>;

    async fn get_total_count(&self) -> RepoResult<i64>;

    async fn get_count_by_owner(&self, owner_id: Uuid) -> RepoResult<i64>;

    /// Health check
    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }
}
