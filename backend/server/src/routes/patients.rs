use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use forms::forms::PatientForm;
use serde_json::{Value, json};
use tracing::info;

use super::{form_page, see_other};
use crate::{
    error::AppError,
    guard::validate_unique,
    models::{PATIENTS, Patient, generate_patient_id},
    state::AppState,
    store,
    utils::read_pairs,
};

pub async fn patient_form() -> impl IntoResponse {
    form_page::<PatientForm>()
}

pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let input = validate_unique::<PatientForm>(&state, PATIENTS, read_pairs(pairs)).await?;

    let id = store::allocate_id::<Patient>(state.store.as_ref()).await?;
    let patient = Patient {
        id,
        name: input.name,
        patient_id: input.patient_id.unwrap_or_else(generate_patient_id),
        mobile: input.mobile,
        gender: input.gender,
        address: input.address,
        dob: input.dob,
        doctor_name: input.doctor_name,
        created_at: Utc::now(),
    };
    store::create(state.store.as_ref(), &patient).await?;

    info!("Registered patient {}", patient.patient_id);
    Ok(see_other("/patients"))
}

pub async fn list_patients(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let patients = store::all::<Patient>(state.store.as_ref()).await?;

    Ok(Json(json!({ "patients": patients })))
}
