use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::forms::RegistrationForm;
use serde_json::{Value, json};
use tracing::info;

use super::{create_with_file, form_page, see_other};
use crate::{
    error::AppError,
    guard::validate_unique,
    hashing::hash_password,
    models::{REGISTRATIONS, RESUMES_DIR, Registration},
    state::AppState,
    store,
    utils::read_multipart,
};

pub async fn registration_form() -> impl IntoResponse {
    form_page::<RegistrationForm>()
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let input = read_multipart::<RegistrationForm>(multipart).await?;
    let input = validate_unique::<RegistrationForm>(&state, REGISTRATIONS, input).await?;

    let password = hash_password(input.password).await?;
    let id = store::allocate_id::<Registration>(state.store.as_ref()).await?;

    let registration = create_with_file(&state, RESUMES_DIR, &input.resume, |resume| {
        Registration {
            id,
            name: input.name,
            gender: input.gender,
            hobbies: input.hobbies,
            appointment: input.appointment,
            country: input.country,
            email: input.email,
            phone: input.phone,
            resume,
            password,
            created_at: Utc::now(),
        }
    })
    .await?;

    info!("Registration {} for {}", registration.id, registration.email);
    Ok(see_other("/registration"))
}

/// Newest first, without password hashes.
pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let registrations = store::all::<Registration>(state.store.as_ref()).await?;

    let listed = registrations
        .iter()
        .rev()
        .map(|registration| {
            let mut row = serde_json::to_value(registration).map_err(AppError::internal)?;
            if let Some(fields) = row.as_object_mut() {
                fields.remove("password");
            }
            Ok(row)
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(json!({ "registrations": listed })))
}
