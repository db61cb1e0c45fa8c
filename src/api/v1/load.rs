//! Document load endpoint handlers

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiErrorType, JsonBody};
use crate::domain::{Document, DomainError, LoadRequest};
use crate::infrastructure::resource::StagedUpload;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// POST /load/
///
/// Stages the uploaded file, dispatches it by extension and removes it.
pub async fn load_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        ApiError::new(
            rejection.status(),
            ApiErrorType::InvalidRequestError,
            rejection.body_text(),
        )
        .with_code("invalid_upload")
    })?;

    let (filename, contents) = read_upload(&mut multipart).await?;

    debug!(
        filename = %filename,
        bytes = contents.len(),
        guessed_type = %mime_guess::from_path(&filename).first_or_octet_stream(),
        "Received upload"
    );

    let staged = StagedUpload::stage(&filename, contents).await?;
    let outcome = state.document_service.load_upload(&staged).await;

    if let Err(e) = staged.close() {
        warn!(filename = %filename, error = %e, "Failed to remove staged upload");
    }

    Ok(Json(outcome?.into_documents()?))
}

/// POST /load/remote
pub async fn load_remote_document(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoadRequest>,
) -> Result<Json<Vec<Document>>, ApiError> {
    debug!(url = %request.url, "Loading remote document");

    let documents = state.document_service.load_remote(&request).await?;

    Ok(Json(documents))
}

/// POST /load/crawl
pub async fn crawl_website(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoadRequest>,
) -> Result<Json<Vec<Document>>, ApiError> {
    debug!(url = %request.url, "Crawling website");

    let documents = state.document_service.web_crawl(&request).await?;

    Ok(Json(documents))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| DomainError::validation("Uploaded file has no file name"))?;
        let contents = field.bytes().await.map_err(upload_error)?;

        return Ok((filename, contents.to_vec()));
    }

    Err(DomainError::validation(format!(
        "Missing '{}' field in multipart upload",
        UPLOAD_FIELD
    ))
    .into())
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), ApiErrorType::InvalidRequestError, err.body_text())
        .with_code("invalid_upload")
}
