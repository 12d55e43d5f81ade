//! # Intake server
//!
//! Form endpoints for patient records, event registrations, user accounts, file uploads,
//! project submissions, notes, a grocery list and a student login.
//!
//! ## Request flow
//!
//! - Urlencoded or multipart body is read into a `forms::RawInput`
//! - The form validates it, then [`guard`] checks declared unique fields against the store
//! - Passwords are hashed with argon2 on the blocking pool, files are written under `MEDIA_ROOT`
//! - The record is inserted with its unique keys claimed atomically, so a lost race is a `409`
//!
//! ## Storage
//!
//! Redis when `REDIS_URL` is set, otherwise an in-memory store that is lost on restart.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod guard;
pub mod hashing;
pub mod media;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod utils;

use config::Config;
use routes::{auth, grocery, notes, patients, projects, registration, upload, users};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/patients", get(patients::list_patients))
        .route(
            "/patients/register",
            get(patients::patient_form).post(patients::register_patient),
        )
        .route(
            "/registration",
            get(registration::registration_form).post(registration::register),
        )
        .route("/registrations", get(registration::list_registrations))
        .route("/users", get(users::list_users))
        .route(
            "/users/register",
            get(users::user_form).post(users::register_user),
        )
        .route("/upload", get(upload::upload_form).post(upload::upload_file))
        .route("/upload/success", get(upload::list_uploads))
        .route("/projects", get(projects::list_projects))
        .route(
            "/projects/submit",
            get(projects::project_form).post(projects::submit_project),
        )
        .route("/notes", get(notes::list_notes))
        .route("/notes/add", get(notes::note_form).post(notes::add_note))
        .route(
            "/notes/{id}/edit",
            get(notes::edit_form).post(notes::edit_note),
        )
        .route(
            "/notes/{id}/delete",
            get(notes::delete_note).post(notes::delete_note),
        )
        .route("/grocery", get(grocery::list_items).post(grocery::add_item))
        .route("/grocery/{id}/toggle", post(grocery::toggle_item))
        .route(
            "/auth/register",
            get(auth::register_form).post(auth::register_student),
        )
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/dashboard", get(auth::dashboard))
        .route("/auth/logout", get(auth::logout))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
