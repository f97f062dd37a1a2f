use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::debug;
use uuid::Uuid;

use super::{page_offset, VideoRepository};
use crate::domain::{NewVideo, ProcessingStatus, VideoChanges, VideoRecord};
use crate::error::{RepoResult, RepositoryError};
use crate::SERVICE_NAME;

/// Column list shared across queries.
const COLUMNS: &str = "id, file_name, file_path, created_at, updated_at, file_size, \
    owner_id, processing_status, error_message";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// PostgreSQL-backed video repository (source of truth)
///
/// The pool is injected at construction; every call checks out its own
/// connection and releases it when the call returns. Timestamps are always
/// taken from the application clock.
#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> RepoResult<PoolConnection<Postgres>> {
        Ok(db_pool::acquire_scoped(&self.pool, SERVICE_NAME).await?)
    }
}

#[async_trait::async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn create(&self, video: NewVideo) -> RepoResult<VideoRecord> {
        let id = video.id.unwrap_or_else(Uuid::new_v4);
        let query = format!(
            r#"
            INSERT INTO videos
                (id, file_name, file_path, created_at, file_size, owner_id, processing_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );

        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(id)
            .bind(&video.file_name)
            .bind(&video.file_path)
            .bind(Utc::now())
            .bind(video.file_size)
            .bind(video.owner_id)
            .bind(video.processing_status)
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        debug!(video_id = %record.id, "Inserted video row");
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<VideoRecord>> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    async fn get_all(&self) -> RepoResult<Vec<VideoRecord>> {
        let query = format!("SELECT {COLUMNS} FROM videos {NEWEST_FIRST}");
        let mut conn = self.conn().await?;
        let records = sqlx::query_as::<_, VideoRecord>(&query)
            .fetch_all(&mut *conn)
            .await?;
        Ok(records)
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<VideoRecord>> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE owner_id = $1 {NEWEST_FIRST}");
        let mut conn = self.conn().await?;
        let records = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(records)
    }

    async fn get_by_file_name(&self, file_name: &str) -> RepoResult<Option<VideoRecord>> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE file_name = $1 LIMIT 1");
        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(file_name)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    async fn update(&self, changes: VideoChanges) -> RepoResult<Option<VideoRecord>> {
        let query = format!(
            r#"
            UPDATE videos SET
                file_name = $2,
                file_path = $3,
                file_size = $4,
                owner_id = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(changes.id)
            .bind(&changes.file_name)
            .bind(&changes.file_path)
            .bind(changes.file_size)
            .bind(changes.owner_id)
            .bind(Utc::now())
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        file_name: &str,
    ) -> RepoResult<Option<VideoRecord>> {
        let query = format!(
            "UPDATE videos SET file_name = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(id)
            .bind(file_name)
            .bind(Utc::now())
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> RepoResult<Option<VideoRecord>> {
        let query = format!(
            r#"
            UPDATE videos SET
                processing_status = $2,
                error_message = COALESCE($3, error_message),
                updated_at = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let mut conn = self.conn().await?;
        let record = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(id)
            .bind(status)
            .bind(error_message)
            .bind(Utc::now())
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut conn = self.conn().await?;
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> RepoResult<u64> {
        let mut conn = self.conn().await?;
        let result = sqlx::query("DELETE FROM videos WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let mut conn = self.conn().await?;
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }

    async fn get_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepoResult<(Vec<VideoRecord>, i64)> {
        let offset = page_offset(page_number, page_size)?;
        let mut conn = self.conn().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&mut *conn)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM videos {NEWEST_FIRST} LIMIT $1 OFFSET $2");
        let records = sqlx::query_as::<_, VideoRecord>(&query)
            .bind(page_size)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;

        Ok((records, total))
    }

    async fn get_total_count(&self) -> RepoResult<i64> {
        let mut conn = self.conn().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    async fn get_count_by_owner(&self, owner_id: Uuid) -> RepoResult<i64> {
        let mut conn = self.conn().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    async fn health_check(&self) -> RepoResult<()> {
        let mut conn = self.conn().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
