pub mod catalog;

pub use catalog::{DeletePolicy, UpdateVideoDetails, UploadVideo, VideoCatalog};
