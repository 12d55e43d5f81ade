use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::forms::FileUploadForm;
use serde_json::{Value, json};
use tracing::info;

use super::{create_with_file, form_page, see_other};
use crate::{
    error::AppError,
    guard::validate,
    models::{UPLOADS_DIR, UploadedFile},
    state::AppState,
    store,
    utils::read_multipart,
};

pub async fn upload_form() -> impl IntoResponse {
    form_page::<FileUploadForm>()
}

pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let input = read_multipart::<FileUploadForm>(multipart).await?;
    let input = validate::<FileUploadForm>(input)?;

    let id = store::allocate_id::<UploadedFile>(state.store.as_ref()).await?;
    let upload = create_with_file(&state, UPLOADS_DIR, &input.file, |file| UploadedFile {
        id,
        file,
        filename: input.file.filename.clone(),
        size: input.file.size(),
        uploaded_at: Utc::now(),
    })
    .await?;

    info!("Stored upload {}", upload.file);
    Ok(see_other("/upload/success"))
}

/// Newest first.
pub async fn list_uploads(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let mut uploads = store::all::<UploadedFile>(state.store.as_ref()).await?;
    uploads.reverse();

    Ok(Json(json!({ "uploads": uploads })))
}
