use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a video's external processing pipeline.
///
/// Persisted as its ordinal in an `INTEGER` column, so discriminants must
/// never be reordered or reused. Any status may follow any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Created = 0,
    Uploaded = 1,
    Processing = 2,
    Processed = 3,
    Failed = 4,
    Deleted = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown processing status: {0}")]
pub struct InvalidStatus(pub i32);

impl ProcessingStatus {
    pub const ALL: [ProcessingStatus; 6] = [
        ProcessingStatus::Created,
        ProcessingStatus::Uploaded,
        ProcessingStatus::Processing,
        ProcessingStatus::Processed,
        ProcessingStatus::Failed,
        ProcessingStatus::Deleted,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Created => "created",
            ProcessingStatus::Uploaded => "uploaded",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Processed => "processed",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Deleted => "deleted",
        }
    }

    /// Whether an error message is expected to accompany this status.
    pub fn is_failure(self) -> bool {
        matches!(self, ProcessingStatus::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Deleted)
    }
}

impl TryFrom<i32> for ProcessingStatus {
    type Error = InvalidStatus;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_i32() == value)
            .ok_or(InvalidStatus(value))
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(ProcessingStatus::Created.as_i32(), 0);
        assert_eq!(ProcessingStatus::Uploaded.as_i32(), 1);
        assert_eq!(ProcessingStatus::Processing.as_i32(), 2);
        assert_eq!(ProcessingStatus::Processed.as_i32(), 3);
        assert_eq!(ProcessingStatus::Failed.as_i32(), 4);
        assert_eq!(ProcessingStatus::Deleted.as_i32(), 5);
    }

    #[test]
    fn test_try_from_accepts_every_member() {
        for status in ProcessingStatus::ALL {
            assert_eq!(ProcessingStatus::try_from(status.as_i32()), Ok(status));
        }
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(ProcessingStatus::try_from(6), Err(InvalidStatus(6)));
        assert_eq!(ProcessingStatus::try_from(-1), Err(InvalidStatus(-1)));
        assert_eq!(
            InvalidStatus(42).to_string(),
            "unknown processing status: 42"
        );
    }

    #[test]
    fn test_default_is_created() {
        assert_eq!(ProcessingStatus::default(), ProcessingStatus::Created);
        assert!(ProcessingStatus::Failed.is_failure());
        assert!(ProcessingStatus::Deleted.is_terminal());
        assert!(!ProcessingStatus::Created.is_terminal());
    }
}
