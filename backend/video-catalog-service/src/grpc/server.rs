//! gRPC adapter for the catalog.
//!
//! Handlers never fail at the transport level: every outcome, including
//! malformed input and store failures, is carried in the response's
//! `result` oneof.
use chrono::{DateTime, Utc};
use tonic::{Request, Response, Status};
use tracing::{error, warn};

use super::proto::video_catalog_service_server::VideoCatalogService;
use super::proto::*;
use crate::domain::VideoRecord;
use crate::error::{ErrorCode, ServiceError, ServiceResult};
use crate::metrics::RequestTimer;
use crate::services::{UpdateVideoDetails, UploadVideo, VideoCatalog};

pub struct VideoCatalogGrpc {
    catalog: VideoCatalog,
}

impl VideoCatalogGrpc {
    pub fn new(catalog: VideoCatalog) -> Self {
        Self { catalog }
    }
}

#[inline]
fn ts(value: DateTime<Utc>) -> i64 {
    value.timestamp()
}

#[inline]
fn ts_opt(value: Option<DateTime<Utc>>) -> Option<i64> {
    value.map(|dt| dt.timestamp())
}

/// proto3 `optional string`: treat an explicitly empty value as absent.
#[inline]
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn to_proto(record: VideoRecord) -> Video {
    Video {
        id: record.id.to_string(),
        file_name: record.file_name,
        file_path: record.file_path,
        created_at: ts(record.created_at),
        updated_at: ts_opt(record.updated_at),
        file_size: record.file_size,
        owner_id: record.owner_id.map(|id| id.to_string()),
        status: record.processing_status.as_i32(),
        error_message: record.error_message,
    }
}

fn make_error(err: &ServiceError) -> ErrorMessage {
    ErrorMessage {
        code: err.code().as_str().to_string(),
        message: err.to_string(),
    }
}

/// Record metrics and logs for one call and convert the error into its payload.
fn finish<T>(timer: RequestTimer, result: ServiceResult<T>) -> Result<T, ErrorMessage> {
    match result {
        Ok(value) => {
            timer.finish("ok");
            Ok(value)
        }
        Err(err) => {
            let code = err.code();
            match code {
                ErrorCode::InternalError => error!(error = %err, "Catalog request failed"),
                _ => warn!(code = %code, error = %err, "Catalog request rejected"),
            }
            timer.finish(code.as_str());
            Err(make_error(&err))
        }
    }
}

#[tonic::async_trait]
impl VideoCatalogService for VideoCatalogGrpc {
    #[tracing::instrument(skip(self, request), fields(file_name = %request.get_ref().file_name))]
    async fn upload_video(
        &self,
        request: Request<UploadVideoRequest>,
    ) -> Result<Response<UploadVideoResponse>, Status> {
        let timer = RequestTimer::start("UploadVideo");
        let req = request.into_inner();
        let command = UploadVideo {
            file_name: req.file_name,
            file_path: req.file_path,
            file_size: req.file_size,
            owner_id: non_empty(req.owner_id),
            status: req.status,
            id: Some(req.id).filter(|id| !id.is_empty()),
        };

        let response = match finish(timer, self.catalog.upload(command).await) {
            Ok(record) => UploadVideoResponse {
                result: Some(upload_video_response::Result::Ok(true)),
                id: record.id.to_string(),
            },
            Err(e) => UploadVideoResponse {
                result: Some(upload_video_response::Result::Error(e)),
                id: String::new(),
            },
        };
        Ok(Response::new(response))
    }

    #[tracing::instrument(skip(self, request), fields(video_id = %request.get_ref().id))]
    async fn get_video(
        &self,
        request: Request<GetVideoRequest>,
    ) -> Result<Response<GetVideoResponse>, Status> {
        let timer = RequestTimer::start("GetVideo");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.get(&req.id).await) {
            Ok(record) => get_video_response::Result::Video(to_proto(record)),
            Err(e) => get_video_response::Result::Error(e),
        };
        Ok(Response::new(GetVideoResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn list_videos(
        &self,
        request: Request<ListVideosRequest>,
    ) -> Result<Response<ListVideosResponse>, Status> {
        let timer = RequestTimer::start("ListVideos");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.list(req.owner_id.as_deref()).await) {
            Ok(ids) => list_videos_response::Result::Videos(VideoIds {
                video_ids: ids.into_iter().map(|id| id.to_string()).collect(),
            }),
            Err(e) => list_videos_response::Result::Error(e),
        };
        Ok(Response::new(ListVideosResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(video_id = %request.get_ref().id, status = request.get_ref().status))]
    async fn update_video(
        &self,
        request: Request<UpdateVideoRequest>,
    ) -> Result<Response<UpdateVideoResponse>, Status> {
        let timer = RequestTimer::start("UpdateVideo");
        let req = request.into_inner();
        let outcome = self
            .catalog
            .update_status(&req.id, req.status, req.error_message.as_deref())
            .await;

        let result = match finish(timer, outcome) {
            Ok(_) => update_video_response::Result::Ok(true),
            Err(e) => update_video_response::Result::Error(e),
        };
        Ok(Response::new(UpdateVideoResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(video_id = %request.get_ref().id))]
    async fn delete_video(
        &self,
        request: Request<DeleteVideoRequest>,
    ) -> Result<Response<DeleteVideoResponse>, Status> {
        let timer = RequestTimer::start("DeleteVideo");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.delete(&req.id).await) {
            Ok(()) => delete_video_response::Result::Ok(true),
            Err(e) => delete_video_response::Result::Error(e),
        };
        Ok(Response::new(DeleteVideoResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(video_id = %request.get_ref().id))]
    async fn rename_video(
        &self,
        request: Request<RenameVideoRequest>,
    ) -> Result<Response<RenameVideoResponse>, Status> {
        let timer = RequestTimer::start("RenameVideo");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.rename(&req.id, &req.file_name).await) {
            Ok(_) => rename_video_response::Result::Ok(true),
            Err(e) => rename_video_response::Result::Error(e),
        };
        Ok(Response::new(RenameVideoResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(video_id = %request.get_ref().id))]
    async fn update_video_details(
        &self,
        request: Request<UpdateVideoDetailsRequest>,
    ) -> Result<Response<UpdateVideoDetailsResponse>, Status> {
        let timer = RequestTimer::start("UpdateVideoDetails");
        let req = request.into_inner();
        let command = UpdateVideoDetails {
            id: req.id,
            file_name: req.file_name,
            file_path: req.file_path,
            file_size: req.file_size,
            owner_id: non_empty(req.owner_id),
        };

        let result = match finish(timer, self.catalog.update_details(command).await) {
            Ok(record) => update_video_details_response::Result::Video(to_proto(record)),
            Err(e) => update_video_details_response::Result::Error(e),
        };
        Ok(Response::new(UpdateVideoDetailsResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(file_name = %request.get_ref().file_name))]
    async fn find_video_by_file_name(
        &self,
        request: Request<FindVideoByFileNameRequest>,
    ) -> Result<Response<FindVideoByFileNameResponse>, Status> {
        let timer = RequestTimer::start("FindVideoByFileName");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.find_by_file_name(&req.file_name).await) {
            Ok(record) => find_video_by_file_name_response::Result::Video(to_proto(record)),
            Err(e) => find_video_by_file_name_response::Result::Error(e),
        };
        Ok(Response::new(FindVideoByFileNameResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(page = request.get_ref().page_number, size = request.get_ref().page_size))]
    async fn list_videos_page(
        &self,
        request: Request<ListVideosPageRequest>,
    ) -> Result<Response<ListVideosPageResponse>, Status> {
        let timer = RequestTimer::start("ListVideosPage");
        let req = request.into_inner();
        let outcome = self
            .catalog
            .list_page(i64::from(req.page_number), i64::from(req.page_size))
            .await;

        let result = match finish(timer, outcome) {
            Ok((records, total)) => list_videos_page_response::Result::Page(VideoPage {
                videos: records.into_iter().map(to_proto).collect(),
                total_count: total,
            }),
            Err(e) => list_videos_page_response::Result::Error(e),
        };
        Ok(Response::new(ListVideosPageResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn count_videos(
        &self,
        request: Request<CountVideosRequest>,
    ) -> Result<Response<CountVideosResponse>, Status> {
        let timer = RequestTimer::start("CountVideos");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.count(req.owner_id.as_deref()).await) {
            Ok(count) => count_videos_response::Result::Count(count),
            Err(e) => count_videos_response::Result::Error(e),
        };
        Ok(Response::new(CountVideosResponse {
            result: Some(result),
        }))
    }

    #[tracing::instrument(skip(self, request), fields(owner_id = %request.get_ref().owner_id))]
    async fn delete_owner_videos(
        &self,
        request: Request<DeleteOwnerVideosRequest>,
    ) -> Result<Response<DeleteOwnerVideosResponse>, Status> {
        let timer = RequestTimer::start("DeleteOwnerVideos");
        let req = request.into_inner();

        let result = match finish(timer, self.catalog.delete_owner_videos(&req.owner_id).await) {
            Ok(deleted) => delete_owner_videos_response::Result::DeletedCount(
                i64::try_from(deleted).unwrap_or(i64::MAX),
            ),
            Err(e) => delete_owner_videos_response::Result::Error(e),
        };
        Ok(Response::new(DeleteOwnerVideosResponse {
            result: Some(result),
        }))
    }
}
