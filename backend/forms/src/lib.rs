//! # Forms
//!
//! Field validation shared by every intake endpoint.
//!
//! ## Flow
//!
//! - A form is declared once as a static list of fields, each with a required message and an ordered rule chain
//! - `Form::unbound()` describes the empty form for rendering
//! - `Form::bind(input)` attaches raw posted values, `validate(now)` turns them into a typed record or an error map
//! - Every field is checked, so the error map lists all failures at once
//! - Cross-field rules (password confirmation) only run once every field passed
//! - Uniqueness needs the store, so the server looks up `unique_candidates` and calls `Outcome::reject` on a hit
//!
//! ## Notes
//!
//! - Text is trimmed before checks; secrets are kept verbatim
//! - Appointment times are read as UTC
//! - `now` is an argument, so the same input validated at the same instant always gives the same result

pub mod choices;
pub mod error;
pub mod forms;
pub mod input;
pub mod pipeline;
pub mod rules;

pub use choices::{Country, Gender, Hobby};
pub use error::{ErrorKind, ValidationError, ValidationErrors};
pub use input::{FileUpload, RawInput, RawValue};
pub use pipeline::{BoundForm, Candidate, Echo, FieldSchema, Form, Outcome, UnboundForm};
