use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::forms::UserRegistrationForm;
use serde_json::{Value, json};
use tracing::info;

use super::{form_page, see_other};
use crate::{
    error::AppError,
    guard::validate_unique,
    hashing::hash_password,
    models::{USERS, User},
    state::AppState,
    store,
    utils::read_pairs,
};

pub async fn user_form() -> impl IntoResponse {
    form_page::<UserRegistrationForm>()
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let input = validate_unique::<UserRegistrationForm>(&state, USERS, read_pairs(pairs)).await?;

    let id = store::allocate_id::<User>(state.store.as_ref()).await?;
    let user = User {
        id,
        full_name: input.full_name,
        email: input.email,
        username: input.username,
        password: hash_password(input.password).await?,
        created_at: Utc::now(),
    };
    store::create(state.store.as_ref(), &user).await?;

    info!("Registered user {}", user.username);
    Ok(see_other("/users"))
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let users = store::all::<User>(state.store.as_ref()).await?;
    let summaries: Vec<_> = users.iter().map(User::summary).collect();

    Ok(Json(json!({ "users": summaries })))
}
