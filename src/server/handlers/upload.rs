//! Form upload handler.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{error, info, warn};

use super::super::response::{ApiError, UploadResponse};
use super::super::AppState;
use crate::repository;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "imagem";

/// Uploads shorter than this are treated as empty.
pub const MIN_IMAGE_BYTES: usize = 100;

/// `POST /api/upload`: read the form and save it.
///
/// The response reports the extracted fields even when saving them failed.
/// A request that is not multipart at all has no image either.
pub async fn upload_form(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|_| ApiError::bad_request("Sem imagem"))?;
    let result = handle_upload(&state, multipart).await;
    if let Err(ref e) = result {
        if e.status.is_server_error() {
            error!("Upload failed: {}", e.message);
        }
    }
    result
}

async fn handle_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        // Only the first file part named `imagem` counts; plain text fields
        // with that name are not uploads.
        if field.name() == Some(IMAGE_FIELD) && field.file_name().is_some() {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::internal(e.to_string()))?;
            image = Some(data.to_vec());
            break;
        }
    }

    let image = image.ok_or_else(|| ApiError::bad_request("Sem imagem"))?;
    if image.len() < MIN_IMAGE_BYTES {
        return Err(ApiError::bad_request("Imagem vazia"));
    }
    info!("Received form image ({} bytes)", image.len());

    let record = state.extractor.extract(&image).await?;

    // Best-effort: the store already logged the cause.
    if repository::persist(state.store.as_ref(), &record).await.is_err() {
        warn!("Form was read but not saved; reporting success anyway");
    }

    Ok(Json(UploadResponse::new(record)))
}
