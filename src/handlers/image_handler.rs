use crate::error::ApiError;
use crate::models::{
    ImageContext, ImageEntry, ImageListResponse, MessageResponse, UploadForm, UploadResponse,
};
use crate::state::AppState;
use crate::utils::{decode_path_segment, StagedFile, StagingError};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, Uri};
use axum::response::Json;
use serde_json::json;

const FILE_FIELD: &str = "file";
const USERNAME_FIELD: &str = "username";
const DESCRIPTION_FIELD: &str = "description";
const TOO_LARGE_MESSAGE: &str = "File exceeds the upload size limit";

fn staging_error(err: StagingError<MultipartError>) -> ApiError {
    match err {
        StagingError::Source(e) => multipart_error(e),
        StagingError::Io(e) => {
            tracing::error!("Failed to stage uploaded file: {}", e);
            ApiError::server("Failed to upload image", json!({ "message": e.to_string() }))
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    // The body limit surfaces as a read error partway through the form
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Rejected oversized upload: {}", err);
        return ApiError::payload_too_large(TOO_LARGE_MESSAGE);
    }
    tracing::error!("Failed to parse multipart form: {}", err);
    ApiError::client("Invalid multipart payload")
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "images",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded", body = UploadResponse),
        (status = 400, description = "No file uploaded"),
        (status = 413, description = "File exceeds the upload size limit"),
        (status = 500, description = "Provider failure")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::error!("Upload without a multipart body: {}", rejection);
            return Err(ApiError::client("No file uploaded!"));
        }
    };

    let mut staged: Option<StagedFile> = None;
    let mut username = None;
    let mut description = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                // A part without a filename is not a file upload.
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                if staged.is_some() {
                    return Err(ApiError::client("Only one file can be uploaded"));
                }
                let content_type = field.content_type().map(str::to_string);
                let file =
                    StagedFile::write_from(field, &state.staging_dir, file_name, content_type)
                        .await
                        .map_err(staging_error)?;
                staged = Some(file);
            }
            USERNAME_FIELD => username = Some(field.text().await.map_err(multipart_error)?),
            DESCRIPTION_FIELD => description = Some(field.text().await.map_err(multipart_error)?),
            other => tracing::debug!("Ignoring form field {:?}", other),
        }
    }

    let Some(file) = staged else {
        return Err(ApiError::client("No file uploaded!"));
    };

    let context = ImageContext::from_form(username, description);
    let result = state.provider.upload(&file, &context).await;

    let path = file.path().to_path_buf();
    if let Err(e) = file.close().await {
        tracing::warn!("Failed to remove staged upload {:?}: {}", path, e);
    }

    match result {
        Ok(data) => Ok(Json(UploadResponse {
            message: "Image uploaded successfully!".to_string(),
            data,
        })),
        Err(e) => {
            tracing::error!("Failed to upload image: {}", e);
            Err(ApiError::server("Failed to upload image", e.to_json()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/get-images",
    tag = "images",
    responses(
        (status = 200, description = "Images in the folder", body = ImageListResponse),
        (status = 500, description = "Provider failure")
    )
)]
pub async fn get_images(
    State(state): State<AppState>,
) -> Result<Json<ImageListResponse>, ApiError> {
    match state.provider.list().await {
        Ok(resources) => Ok(Json(ImageListResponse {
            message: "Images retrieved successfully!".to_string(),
            data: resources.into_iter().map(ImageEntry::from).collect(),
        })),
        Err(e) => {
            tracing::error!("Failed to retrieve images: {}", e);
            Err(ApiError::server("Failed to retrieve images", e.to_json()))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/delete-image/{public_id}",
    tag = "images",
    params(("public_id" = String, Path, description = "URL-encoded Cloudinary public id")),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Provider refused the deletion"),
        (status = 500, description = "Provider failure")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<MessageResponse>, ApiError> {
    // Last path segment, still percent-encoded. Decoded exactly once here.
    let raw = uri.path().rsplit('/').next().unwrap_or_default();

    let public_id = decode_path_segment(raw).map_err(|e| {
        tracing::error!("Invalid public_id {:?}: {}", raw, e);
        ApiError::client("Invalid public_id")
    })?;
    tracing::info!("Received public_id: {}", public_id);

    match state.provider.destroy(&public_id).await {
        Ok(result) if result.get("result").and_then(|r| r.as_str()) == Some("ok") => {
            Ok(Json(MessageResponse {
                message: "Image deleted successfully!".to_string(),
            }))
        }
        Ok(result) => {
            tracing::error!("Provider refused to delete {}: {}", public_id, result);
            Err(ApiError::client_with_result("Failed to delete image!", result))
        }
        Err(e) => {
            tracing::error!("Error deleting image: {}", e);
            Err(ApiError::server("Server error", e.to_json()))
        }
    }
}
