mod memory_repository;
mod postgres_repository;
mod r#trait;

pub use memory_repository::InMemoryVideoRepository;
pub use postgres_repository::PostgresVideoRepository;
#[cfg(test)]
pub use r#trait::MockVideoRepository;
pub use r#trait::VideoRepository;

use crate::error::{RepoResult, RepositoryError};

/// Validate paging input and return the row offset of the requested page.
pub(crate) fn page_offset(page_number: i64, page_size: i64) -> RepoResult<i64> {
    if page_number < 1 {
        return Err(RepositoryError::InvalidArgument(format!(
            "page number must be at least 1, got {}",
            page_number
        )));
    }
    if page_size < 1 {
        return Err(RepositoryError::InvalidArgument(format!(
            "page size must be positive, got {}",
            page_size
        )));
    }
    (page_number - 1)
        .checked_mul(page_size)
        .ok_or_else(|| RepositoryError::InvalidArgument("page offset overflows".to_string()))
}
