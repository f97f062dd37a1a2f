pub mod config;
pub mod domain;
pub mod error;
pub mod grpc;
pub mod metrics;
pub mod repository;
pub mod services;

/// Label used for pool metrics and log context.
pub const SERVICE_NAME: &str = "video-catalog-service";

/// Embedded schema migrations for the `videos` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use domain::{NewVideo, ProcessingStatus, VideoChanges, VideoRecord};
pub use error::{ErrorCode, RepositoryError, ServiceError};
pub use repository::{InMemoryVideoRepository, PostgresVideoRepository, VideoRepository};
pub use services::{DeletePolicy, VideoCatalog};
