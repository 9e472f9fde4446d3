//! Upload endpoints: ShareX descriptor, create, serve, list and delete

use auth::SessionClaims;
use axum::{
    Extension, Json,
    body::{Body, Bytes},
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::header,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};
use std::io;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    messages,
    middleware::{SESSION_COOKIE, session_token},
    models::{DeleteUploadRequest, NewUpload, Upload},
    routes::payload,
    state::AppState,
    storage::generate_upload_code,
};

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";
const DEFAULT_PART_TYPE: &str = "text/plain";

/// Image read from a multipart body
struct IncomingImage {
    file_name: Option<String>,
    mime_type: String,
    data: Bytes,
}

/// ShareX custom uploader descriptor pre-filled with the caller's cookie
pub async fn sharex_config(State(state): State<AppState>, jar: CookieJar) -> Json<Value> {
    let cookie = session_token(&jar).unwrap_or("***");

    Json(json!({
        "Version": "13.2.1",
        "Name": "image Storage",
        "DestinationType": "ImageUploader",
        "RequestMethod": "POST",
        "RequestURL": format!("{}/api/uploads/create", state.config.host.trim_end_matches('/')),
        "Headers": {
            "cookie": format!("{SESSION_COOKIE}={cookie}"),
        },
        "Body": "MultipartFormData",
        "FileFormName": IMAGE_FIELD,
        "URL": "$json:url$",
    }))
}

fn upload_failed(err: MultipartError) -> ApiError {
    warn!("Multipart upload failed: {}", err);
    ApiError::Rejected(messages::UPLOAD_FAILED)
}

/// Pull the `image` field out of the body, checking its type and size
async fn read_image(state: &AppState, multipart: &mut Multipart) -> ApiResult<Option<IncomingImage>> {
    while let Some(field) = multipart.next_field().await.map_err(upload_failed)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // A part without a Content-Type is plain text
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_PART_TYPE)
            .to_ascii_lowercase();
        if !state.config.allowed_mimetypes.iter().any(|allowed| *allowed == mime_type) {
            warn!("Rejected upload with type {:?}", mime_type);
            return Err(ApiError::Rejected(messages::UPLOAD_FAILED_UNKNOWN));
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(upload_failed)?;
        if data.len() > state.config.limits.file_size {
            warn!(
                "Rejected upload of {} bytes, limit is {}",
                data.len(),
                state.config.limits.file_size
            );
            return Err(ApiError::Rejected(messages::UPLOAD_FAILED));
        }

        return Ok(Some(IncomingImage {
            file_name,
            mime_type,
            data,
        }));
    }

    Ok(None)
}

/// Store an uploaded image and record it for the caller
pub async fn create_upload(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("Unreadable upload body: {}", rejection);
        ApiError::Rejected(messages::UPLOAD_FAILED)
    })?;

    let image = read_image(&state, &mut multipart)
        .await?
        .ok_or(ApiError::Rejected(messages::NO_FILE))?;

    let path = state
        .storage
        .save(image.file_name.as_deref(), &image.data)
        .await?;
    let new_upload = NewUpload {
        code: generate_upload_code(&image.mime_type),
        path: path.to_string_lossy().into_owned(),
        author: Some(claims.id),
    };

    let upload = match state.upload_repository.create(&new_upload).await {
        Ok(upload) => upload,
        Err(err) => {
            if let Err(remove_err) = state.storage.remove(&path).await {
                error!("Failed to remove orphaned file {}: {}", path.display(), remove_err);
            }
            return Err(err.into());
        }
    };

    info!(
        "User {} uploaded {} ({} bytes)",
        claims.id,
        upload.code,
        image.data.len()
    );

    let url = state.config.upload_url(&upload.code);
    Ok(Json(json!({
        "ok": true,
        "message": messages::FILE_UPLOADED,
        "upload": upload,
        "url": url,
    })))
}

/// Stream a stored file by its public code
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let upload = state
        .upload_repository
        .find_by_code(&code)
        .await?
        .ok_or(ApiError::NotFound(messages::IMAGE_NOT_FOUND))?;

    let file = match tokio::fs::File::open(&upload.path).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("Upload {} has no file at {}", upload.code, upload.path);
            return Err(ApiError::NotFound(messages::IMAGE_NOT_FOUND));
        }
        Err(err) => return Err(err.into()),
    };

    let content_type = mime_guess::from_path(&upload.code).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| ApiError::Internal(format!("Failed to build file response: {}", e)))
}

/// The caller's uploads
pub async fn list_uploads(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<Value>> {
    let uploads = state.upload_repository.list_by_author(claims.id).await?;

    Ok(Json(json!({
        "ok": true,
        "message": messages::UPLOADS_LISTED,
        "uploads": uploads,
    })))
}

async fn discard_file(state: &AppState, upload: &Upload) {
    if let Err(err) = state.storage.remove(&upload.path).await {
        error!("Failed to remove file {} of upload {}: {}", upload.path, upload.id, err);
    }
}

/// Delete one of the caller's uploads and its file
pub async fn delete_upload(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    body: Result<Json<DeleteUploadRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = match payload(body).upload_id() {
        None => return Err(ApiError::Rejected(messages::MISSING_FILE_ID)),
        Some(None) => return Err(ApiError::Rejected(messages::UNKNOWN_FILE_ID)),
        Some(Some(id)) => id,
    };

    let upload = state
        .upload_repository
        .find_owned(id, claims.id)
        .await?
        .ok_or(ApiError::Rejected(messages::UNKNOWN_FILE_ID))?;

    if !state.upload_repository.delete(upload.id).await? {
        return Err(ApiError::Rejected(messages::UNKNOWN_FILE_ID));
    }
    discard_file(&state, &upload).await;

    info!("User {} deleted upload {}", claims.id, upload.code);

    Ok(Json(json!({
        "ok": true,
        "message": messages::FILE_DELETED,
    })))
}

/// Delete every upload of the caller
pub async fn truncate_uploads(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<Value>> {
    let removed = state.upload_repository.delete_by_author(claims.id).await?;
    for upload in &removed {
        discard_file(&state, upload).await;
    }

    info!("User {} deleted all {} uploads", claims.id, removed.len());

    Ok(Json(json!({
        "ok": true,
        "message": messages::UPLOADS_TRUNCATED,
    })))
}
