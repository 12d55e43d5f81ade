use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use chrono::Utc;
use forms::{Form as _, forms::GroceryForm};
use serde_json::{Value, json};
use tracing::info;

use super::see_other;
use crate::{
    error::AppError,
    guard::validate,
    models::GroceryItem,
    state::AppState,
    store,
    utils::read_pairs,
};

pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let items = store::all::<GroceryItem>(state.store.as_ref()).await?;

    Ok(Json(json!({
        "items": items,
        "form": GroceryForm::NAME,
        "fields": GroceryForm::unbound().schema(),
    })))
}

pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let input = validate::<GroceryForm>(read_pairs(pairs))?;

    let item = GroceryItem {
        id: store::allocate_id::<GroceryItem>(state.store.as_ref()).await?,
        name: input.name,
        completed: false,
        created_at: Utc::now(),
    };
    store::create(state.store.as_ref(), &item).await?;

    info!("Added grocery item {}", item.name);
    Ok(see_other("/grocery"))
}

pub async fn toggle_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    let mut item = store::fetch::<GroceryItem>(state.store.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    item.completed = !item.completed;
    if !store::save(state.store.as_ref(), &item).await? {
        return Err(AppError::NotFound);
    }

    Ok(see_other("/grocery"))
}
