//! HTTP handlers. `GET` on a form route describes the empty form, `POST` submits it.
//!
//! A valid submission redirects with `303 See Other`; an invalid one is a `422`
//! carrying the submitted values and the error map.

use axum::{Json, response::Redirect};
use forms::{FileUpload, Form};
use serde_json::{Value, json};
use tracing::warn;

use crate::{
    error::AppError,
    state::AppState,
    store::{self, Record},
};

pub mod auth;
pub mod grocery;
pub mod notes;
pub mod patients;
pub mod projects;
pub mod registration;
pub mod upload;
pub mod users;

pub fn form_page<F: Form>() -> Json<Value> {
    Json(json!({
        "form": F::NAME,
        "fields": F::unbound().schema(),
    }))
}

pub fn see_other(to: &str) -> Redirect {
    Redirect::to(to)
}

/// Stores the file, then the record built around its reference. The file is
/// removed again if the record cannot be written.
pub async fn create_with_file<R: Record>(
    state: &AppState,
    dir: &str,
    file: &FileUpload,
    build: impl FnOnce(String) -> R,
) -> Result<R, AppError> {
    let reference = state.media.save(dir, file).await?;
    let record = build(reference.clone());

    if let Err(e) = store::create(state.store.as_ref(), &record).await {
        warn!("Discarding {reference}: {e}");
        state.media.discard(&reference).await;
        return Err(e.into());
    }

    Ok(record)
}
