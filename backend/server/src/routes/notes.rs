use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::{Form as _, forms::NoteForm};
use serde_json::{Value, json};
use tracing::info;

use super::{form_page, see_other};
use crate::{
    error::AppError,
    guard::validate,
    models::Note,
    state::AppState,
    store,
    utils::read_pairs,
};

async fn find_note(state: &AppState, id: u64) -> Result<Note, AppError> {
    store::fetch::<Note>(state.store.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Newest first.
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let mut notes = store::all::<Note>(state.store.as_ref()).await?;
    notes.reverse();

    Ok(Json(json!({ "notes": notes })))
}

pub async fn note_form() -> impl IntoResponse {
    form_page::<NoteForm>()
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let input = validate::<NoteForm>(read_pairs(pairs))?;

    let note = Note {
        id: store::allocate_id::<Note>(state.store.as_ref()).await?,
        title: input.title,
        description: input.description,
        created_at: Utc::now(),
    };
    store::create(state.store.as_ref(), &note).await?;

    info!("Added note {}", note.id);
    Ok(see_other("/notes"))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    let note = find_note(&state, id).await?;

    Ok(Json(json!({
        "note": note,
        "form": NoteForm::NAME,
        "fields": NoteForm::unbound().schema(),
    })))
}

pub async fn edit_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let mut note = find_note(&state, id).await?;
    let input = validate::<NoteForm>(read_pairs(pairs))?;

    note.title = input.title;
    note.description = input.description;
    if !store::save(state.store.as_ref(), &note).await? {
        return Err(AppError::NotFound);
    }

    info!("Updated note {id}");
    Ok(see_other("/notes"))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    if !store::delete::<Note>(state.store.as_ref(), id).await? {
        return Err(AppError::NotFound);
    }

    info!("Deleted note {id}");
    Ok(see_other("/notes"))
}
