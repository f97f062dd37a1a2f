//! Video catalog domain types

mod status;
mod video;

pub use status::{InvalidStatus, ProcessingStatus};
pub use video::{
    NewVideo, VideoChanges, VideoRecord, MAX_ERROR_MESSAGE_LEN, MAX_FILE_NAME_LEN,
    MAX_FILE_PATH_LEN,
};
