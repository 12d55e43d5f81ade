//! Store lookups for fields a form declares unique.
//!
//! The check runs before insert, so it reports duplicates as field errors next to every other
//! failure. It cannot stop two submissions racing to the same value; the store's insert settles that.

use chrono::Utc;
use forms::{BoundForm, ErrorKind, Form, Outcome, RawInput, ValidationError};

use crate::{error::AppError, state::AppState};

pub async fn guard_unique<F: Form>(
    state: &AppState,
    collection: &str,
    bound: &BoundForm<F>,
    mut outcome: Outcome<F::Output>,
) -> Result<Outcome<F::Output>, AppError> {
    for candidate in bound.unique_candidates(&outcome) {
        let existing = state
            .store
            .find_by(collection, candidate.field, &candidate.value)
            .await?;

        if existing.is_some() {
            outcome = outcome.reject(ValidationError::new(
                candidate.field,
                ErrorKind::DuplicateValue,
                candidate.message,
            ));
        }
    }

    Ok(outcome)
}

/// Field rules and cross-field rules only, for forms with nothing unique.
pub fn validate<F: Form>(input: RawInput) -> Result<F::Output, AppError> {
    let bound = F::bind(input);

    match bound.validate(Utc::now()) {
        Outcome::Valid(output) => Ok(output),
        Outcome::Invalid(errors) => Err(AppError::invalid(&bound, errors)),
    }
}

/// Field rules, cross-field rules, then uniqueness. Any failure is a 422 re-render.
pub async fn validate_unique<F: Form>(
    state: &AppState,
    collection: &str,
    input: RawInput,
) -> Result<F::Output, AppError> {
    let bound = F::bind(input);
    let outcome = bound.validate(Utc::now());
    let outcome = guard_unique(state, collection, &bound, outcome).await?;

    match outcome {
        Outcome::Valid(output) => Ok(output),
        Outcome::Invalid(errors) => Err(AppError::invalid(&bound, errors)),
    }
}
