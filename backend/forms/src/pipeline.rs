//! The generic form runner.
//!
//! A form is a static list of [`FieldSpec`]s plus cross-field and uniqueness
//! declarations. [`BoundForm::validate`] runs every field's chain independently,
//! collects all failures, then runs cross-field rules only when every field passed.
//! Validation is a pure function of the bound input and `now`.

use std::{collections::HashMap, marker::PhantomData, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    error::{ErrorKind, ValidationError, ValidationErrors},
    input::{FileUpload, RawInput, RawValue},
    rules::{Rule, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    /// Not trimmed and never echoed back.
    Secret,
    List,
    File,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: InputKind,
    /// `Some(message)` marks the field required.
    pub required: Option<&'static str>,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::Text,
            required: Some(REQUIRED),
            rules: &[],
        }
    }

    pub const fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub const fn optional(mut self) -> Self {
        self.required = None;
        self
    }

    pub const fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.rules = rules;
        self
    }
}

pub const REQUIRED: &str = "This field is required.";

#[derive(Debug, Clone, Copy)]
pub enum CrossRule {
    /// The second field must repeat the first; the error lands on the second.
    Equal {
        first: &'static str,
        second: &'static str,
        message: &'static str,
    },
}

impl CrossRule {
    fn check(&self, cleaned: &Cleaned) -> Result<(), ValidationError> {
        match self {
            CrossRule::Equal {
                first,
                second,
                message,
            } => {
                if cleaned.values.get(first) != cleaned.values.get(second) {
                    return Err(ValidationError::new(
                        *second,
                        ErrorKind::PasswordMismatch,
                        *message,
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A field whose value must not already exist in the store.
#[derive(Debug, Clone, Copy)]
pub struct UniqueField {
    pub field: &'static str,
    pub message: &'static str,
}

pub trait Form {
    const NAME: &'static str;
    const FIELDS: &'static [FieldSpec];
    const CROSS: &'static [CrossRule] = &[];
    const UNIQUE: &'static [UniqueField] = &[];

    type Output;

    fn build(cleaned: Cleaned) -> Result<Self::Output, ValidationErrors>;

    fn unbound() -> UnboundForm<Self>
    where
        Self: Sized,
    {
        UnboundForm(PhantomData)
    }

    fn bind(input: RawInput) -> BoundForm<Self>
    where
        Self: Sized,
    {
        BoundForm {
            input,
            _form: PhantomData,
        }
    }

    /// The size error for a file field whose upload was cut off by the body limit.
    fn oversized(field: &str) -> Option<ValidationError> {
        let spec = Self::FIELDS
            .iter()
            .find(|spec| spec.name == field && spec.kind == InputKind::File)?;

        spec.rules.iter().find_map(|rule| match rule {
            Rule::File(policy) => Some(ValidationError::new(
                spec.name,
                ErrorKind::FileTooLarge,
                policy.size_message,
            )),
            _ => None,
        })
    }
}

/// Validated values keyed by field name, consumed by [`Form::build`].
#[derive(Debug, Clone, Default)]
pub struct Cleaned {
    values: HashMap<&'static str, Value>,
}

impl Cleaned {
    fn take(&mut self, field: &'static str) -> Value {
        self.values.remove(field).unwrap_or(Value::Absent)
    }

    pub fn text(&mut self, field: &'static str) -> Result<String, ValidationError> {
        match self.take(field) {
            Value::Text(text) => Ok(text),
            _ => Err(missing(field)),
        }
    }

    pub fn optional_text(&mut self, field: &'static str) -> Option<String> {
        match self.take(field) {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn list(&mut self, field: &'static str) -> Result<Vec<String>, ValidationError> {
        match self.take(field) {
            Value::List(values) => Ok(values),
            _ => Err(missing(field)),
        }
    }

    pub fn date(&mut self, field: &'static str) -> Result<NaiveDate, ValidationError> {
        match self.take(field) {
            Value::Date(date) => Ok(date),
            _ => Err(missing(field)),
        }
    }

    pub fn timestamp(&mut self, field: &'static str) -> Result<DateTime<Utc>, ValidationError> {
        match self.take(field) {
            Value::DateTime(at) => Ok(at),
            _ => Err(missing(field)),
        }
    }

    pub fn file(&mut self, field: &'static str) -> Result<FileUpload, ValidationError> {
        match self.take(field) {
            Value::File(file) => Ok(file),
            _ => Err(missing(field)),
        }
    }

    pub fn choice<T: FromStr>(&mut self, field: &'static str) -> Result<T, ValidationError> {
        let code = self.text(field)?;
        parse_choice(field, &code)
    }

    /// Repeated selections are kept once, in first-seen order.
    pub fn choices<T: FromStr + PartialEq>(
        &mut self,
        field: &'static str,
    ) -> Result<Vec<T>, ValidationError> {
        let mut choices = Vec::new();
        for code in self.list(field)? {
            let choice = parse_choice(field, &code)?;
            if !choices.contains(&choice) {
                choices.push(choice);
            }
        }
        Ok(choices)
    }
}

fn parse_choice<T: FromStr>(field: &'static str, code: &str) -> Result<T, ValidationError> {
    code.parse().map_err(|_| {
        ValidationError::new(
            field,
            ErrorKind::InvalidChoice,
            format!("Select a valid choice. {code} is not one of the available choices."),
        )
    })
}

fn missing(field: &'static str) -> ValidationError {
    ValidationError::new(field, ErrorKind::MissingField, REQUIRED)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Valid(T),
    Invalid(ValidationErrors),
}

impl<T> Outcome<T> {
    /// Adds a failure found outside the field rules; a valid outcome becomes invalid.
    pub fn reject(self, error: ValidationError) -> Self {
        match self {
            Outcome::Valid(_) => Outcome::Invalid(error.into()),
            Outcome::Invalid(mut errors) => {
                errors.push(error);
                Outcome::Invalid(errors)
            }
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Outcome::Valid(_) => None,
            Outcome::Invalid(errors) => Some(errors),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

/// A form with nothing attached, used to render an empty form.
pub struct UnboundForm<F: Form>(PhantomData<F>);

impl<F: Form> UnboundForm<F> {
    pub fn schema(&self) -> Vec<FieldSchema> {
        F::FIELDS
            .iter()
            .map(|spec| FieldSchema {
                name: spec.name,
                kind: spec.kind,
                required: spec.required.is_some(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Echo {
    Text(String),
    List(Vec<String>),
}

/// A value a uniqueness check should look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: &'static str,
    pub value: String,
    pub message: &'static str,
}

pub struct BoundForm<F: Form> {
    input: RawInput,
    _form: PhantomData<F>,
}

impl<F: Form> BoundForm<F> {
    pub fn input(&self) -> &RawInput {
        &self.input
    }

    pub fn validate(&self, now: DateTime<Utc>) -> Outcome<F::Output> {
        let mut errors = ValidationErrors::default();
        let mut cleaned = Cleaned::default();

        for spec in F::FIELDS {
            match clean_field(spec, &self.input, now) {
                Ok(value) => {
                    cleaned.values.insert(spec.name, value);
                }
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            for rule in F::CROSS {
                if let Err(error) = rule.check(&cleaned) {
                    errors.push(error);
                }
            }
        }

        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }

        match F::build(cleaned) {
            Ok(output) => Outcome::Valid(output),
            Err(errors) => Outcome::Invalid(errors),
        }
    }

    /// Unique fields that passed their own rules and carry a value.
    pub fn unique_candidates(&self, outcome: &Outcome<F::Output>) -> Vec<Candidate> {
        F::UNIQUE
            .iter()
            .filter(|unique| {
                outcome
                    .errors()
                    .is_none_or(|errors| !errors.contains_field(unique.field))
            })
            .filter_map(|unique| {
                let value = match self.input.get(unique.field)? {
                    RawValue::Text(text) => text.trim().to_string(),
                    RawValue::List(values) => values.last()?.trim().to_string(),
                    RawValue::File(_) => return None,
                };
                (!value.is_empty()).then_some(Candidate {
                    field: unique.field,
                    value,
                    message: unique.message,
                })
            })
            .collect()
    }

    /// Submitted non-secret text values, for re-rendering a rejected form.
    pub fn echo(&self) -> Vec<(&'static str, Echo)> {
        F::FIELDS
            .iter()
            .filter(|spec| matches!(spec.kind, InputKind::Text | InputKind::List))
            .filter_map(|spec| {
                let echo = match self.input.get(spec.name)? {
                    RawValue::Text(text) => Echo::Text(text.clone()),
                    RawValue::List(values) => Echo::List(values.clone()),
                    RawValue::File(_) => return None,
                };
                Some((spec.name, echo))
            })
            .collect()
    }
}

fn clean_field(
    spec: &FieldSpec,
    input: &RawInput,
    now: DateTime<Utc>,
) -> Result<Value, ValidationError> {
    let mut value = bind_value(spec, input.get(spec.name));

    if value == Value::Absent {
        return match spec.required {
            Some(message) => Err(ValidationError::new(
                spec.name,
                ErrorKind::MissingField,
                message,
            )),
            None => Ok(Value::Absent),
        };
    }

    for rule in spec.rules {
        value = rule
            .apply(value, now)
            .map_err(|(kind, message)| ValidationError::new(spec.name, kind, message))?;
    }

    Ok(value)
}

fn bind_value(spec: &FieldSpec, raw: Option<&RawValue>) -> Value {
    let Some(raw) = raw else {
        return Value::Absent;
    };

    match (spec.kind, raw) {
        (InputKind::Text, RawValue::Text(text)) => non_empty(text.trim()),
        (InputKind::Text, RawValue::List(values)) => {
            non_empty(values.last().map(|v| v.trim()).unwrap_or_default())
        }
        (InputKind::Secret, RawValue::Text(text)) => non_empty(text),
        (InputKind::Secret, RawValue::List(values)) => {
            non_empty(values.last().map(String::as_str).unwrap_or_default())
        }
        (InputKind::List, RawValue::Text(text)) if !text.is_empty() => {
            Value::List(vec![text.clone()])
        }
        (InputKind::List, RawValue::List(values)) if !values.is_empty() => {
            Value::List(values.clone())
        }
        (InputKind::File, RawValue::File(file)) if !file.is_empty() => Value::File(file.clone()),
        _ => Value::Absent,
    }
}

fn non_empty(text: &str) -> Value {
    if text.is_empty() {
        Value::Absent
    } else {
        Value::Text(text.to_string())
    }
}
