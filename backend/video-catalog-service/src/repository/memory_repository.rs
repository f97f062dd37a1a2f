use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{page_offset, VideoRepository};
use crate::domain::{NewVideo, ProcessingStatus, VideoChanges, VideoRecord};
use crate::error::{RepoResult, RepositoryError};

/// Process-local video store for development and tests.
///
/// Each operation holds the lock for its whole read-modify-write, which gives
/// the same per-row atomicity the relational store provides.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    records: RwLock<HashMap<Uuid, VideoRecord>>,
}

fn newest_first(a: &VideoRecord, b: &VideoRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sorted<F>(&self, keep: F) -> Vec<VideoRecord>
    where
        F: Fn(&VideoRecord) -> bool,
    {
        let records = self.records.read().await;
        let mut matched: Vec<VideoRecord> = records.values().filter(|r| keep(r)).cloned().collect();
        matched.sort_by(newest_first);
        matched
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, video: NewVideo) -> RepoResult<VideoRecord> {
        let id = video.id.unwrap_or_else(Uuid::new_v4);
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(RepositoryError::Conflict(format!(
                "video {} already exists",
                id
            )));
        }

        let record = video.into_record(id, Utc::now());
        records.insert(id, record.clone());
        debug!(video_id = %id, "Stored video in memory");
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<VideoRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<VideoRecord>> {
        Ok(self.sorted(|_| true).await)
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<VideoRecord>> {
        Ok(self.sorted(|r| r.owner_id == Some(owner_id)).await)
    }

    async fn get_by_file_name(&self, file_name: &str) -> RepoResult<Option<VideoRecord>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.file_name == file_name).cloned())
    }

    async fn update(&self, changes: VideoChanges) -> RepoResult<Option<VideoRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&changes.id).map(|record| {
            changes.apply_to(record, Utc::now());
            record.clone()
        }))
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        file_name: &str,
    ) -> RepoResult<Option<VideoRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&id).map(|record| {
            record.file_name = file_name.to_string();
            record.updated_at = Some(Utc::now());
            record.clone()
        }))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> RepoResult<Option<VideoRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&id).map(|record| {
            record.processing_status = status;
            if error_message.is_some() {
                record.error_message = error_message;
            }
            record.updated_at = Some(Utc::now());
            record.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> RepoResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.owner_id != Some(owner_id));
        Ok((before - records.len()) as u64)
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.records.read().await.contains_key(&id))
    }

    async fn get_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepoResult<(Vec<VideoRecord>, i64)> {
        let offset = page_offset(page_number, page_size)?;
        let all = self.sorted(|_| true).await;
        let total = all.len() as i64;
        let page = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .collect();
        Ok((page, total))
    }

    async fn get_total_count(&self) -> RepoResult<i64> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn get_count_by_owner(&self, owner_id: Uuid) -> RepoResult<i64> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.owner_id == Some(owner_id))
            .count() as i64)
    }
}
