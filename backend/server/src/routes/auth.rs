use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use forms::{
    Form as _, Outcome,
    forms::{LoginForm, StudentRegistrationForm},
};
use serde_json::json;
use tracing::info;

use super::{form_page, see_other};
use crate::{
    error::AppError,
    guard::validate_unique,
    hashing::{hash_password, verify_password, verify_unknown},
    models::{STUDENTS, Student},
    session::{expired_cookie, session_cookie, token_from_headers},
    state::AppState,
    store,
    utils::read_pairs,
};

pub const REGISTERED_MESSAGE: &str = "Account created successfully! You can now login.";

pub async fn register_form() -> impl IntoResponse {
    form_page::<StudentRegistrationForm>()
}

pub async fn register_student(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input =
        validate_unique::<StudentRegistrationForm>(&state, STUDENTS, read_pairs(pairs)).await?;

    let student = Student {
        id: store::allocate_id::<Student>(state.store.as_ref()).await?,
        name: input.name,
        email: input.email,
        username: input.username,
        password: hash_password(input.password).await?,
        created_at: Utc::now(),
    };
    store::create(state.store.as_ref(), &student).await?;

    info!("Registered student {}", student.username);
    Ok(Json(json!({ "message": REGISTERED_MESSAGE })))
}

pub async fn login_form() -> impl IntoResponse {
    form_page::<LoginForm>()
}

/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let Outcome::Valid(input) = LoginForm::bind(read_pairs(pairs)).validate(Utc::now()) else {
        return Err(AppError::InvalidCredentials);
    };

    let student =
        store::find::<Student>(state.store.as_ref(), "username", &input.username).await?;

    let verified = match &student {
        Some(student) => verify_password(input.password, student.password.clone()).await?,
        None => verify_unknown(input.password).await?,
    };

    let Some(student) = student.filter(|_| verified) else {
        return Err(AppError::InvalidCredentials);
    };

    let token = state.sessions.create(student.id, student.name).await;
    info!("Student {} logged in", student.username);

    let cookie = session_cookie(&token, state.config.session_ttl);
    Ok(([(SET_COOKIE, cookie)], see_other("/auth/dashboard")).into_response())
}

pub async fn dashboard(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = match token_from_headers(&headers) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };

    match session {
        Some(session) => Json(json!({
            "student_id": session.student_id,
            "name": session.student_name,
            "message": format!("Welcome, {}!", session.student_name),
        }))
        .into_response(),
        None => see_other("/auth/login").into_response(),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        state.sessions.destroy(&token).await;
    }

    ([(SET_COOKIE, expired_cookie())], see_other("/auth/login")).into_response()
}
