use serde::{Serialize, Serializer, ser::SerializeMap};
use strum::{AsRefStr, Display};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
pub enum ErrorKind {
    MissingField,
    TooLong,
    TooShort,
    PatternMismatch,
    InvalidChoice,
    InvalidDate,
    UnsupportedFileType,
    FileTooLarge,
    PastAppointment,
    PasswordMismatch,
    DuplicateValue,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Every error produced by one validation run, in the order the fields were declared.
///
/// Serializes as `{"field": ["message", ...]}` so a client can render messages inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn kinds(&self, field: &str) -> Vec<ErrorKind> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.kind)
            .collect()
    }

    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.kind == kind)
    }

    fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(field, &self.messages(field))?;
        }
        map.end()
    }
}
