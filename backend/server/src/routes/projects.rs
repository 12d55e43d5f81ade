use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::forms::ProjectSubmissionForm;
use serde_json::{Value, json};
use tracing::info;

use super::{create_with_file, form_page, see_other};
use crate::{
    error::AppError,
    guard::validate_unique,
    models::{PROJECTS, PROJECTS_DIR, ProjectSubmission},
    state::AppState,
    store,
    utils::read_multipart,
};

pub async fn project_form() -> impl IntoResponse {
    form_page::<ProjectSubmissionForm>()
}

pub async fn submit_project(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let input = read_multipart::<ProjectSubmissionForm>(multipart).await?;
    let input = validate_unique::<ProjectSubmissionForm>(&state, PROJECTS, input).await?;

    let id = store::allocate_id::<ProjectSubmission>(state.store.as_ref()).await?;
    let submission = create_with_file(&state, PROJECTS_DIR, &input.project_file, |project_file| {
        ProjectSubmission {
            id,
            tu_registration_number: input.tu_registration_number,
            email: input.email,
            project_file,
            uploaded_at: Utc::now(),
        }
    })
    .await?;

    info!("Project submitted for {}", submission.tu_registration_number);
    Ok(see_other("/projects"))
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let projects = store::all::<ProjectSubmission>(state.store.as_ref()).await?;

    Ok(Json(json!({ "projects": projects })))
}
