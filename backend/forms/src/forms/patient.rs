use chrono::NaiveDate;

use crate::{
    choices::Gender,
    error::ValidationErrors,
    pipeline::{Cleaned, FieldSpec, Form, UniqueField},
    rules::{Pattern, Rule},
};

pub struct PatientForm;

#[derive(Debug, Clone, PartialEq)]
pub struct PatientInput {
    pub name: String,
    pub patient_id: Option<String>,
    pub mobile: String,
    pub gender: Gender,
    pub address: Option<String>,
    pub dob: NaiveDate,
    pub doctor_name: String,
}

impl Form for PatientForm {
    const NAME: &'static str = "patient";

    // The mobile pattern fixes the length, so it carries no separate length rule.
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name")
            .required("Name is required")
            .rules(&[Rule::MaxLength(200, None)]),
        FieldSpec::text("patient_id")
            .optional()
            .rules(&[Rule::MaxLength(50, None)]),
        FieldSpec::text("mobile")
            .required("Mobile is required")
            .rules(&[Rule::Pattern(
                Pattern::Mobile,
                "Mobile must be 10 digits and start with 98, 97 or 96",
            )]),
        FieldSpec::text("gender")
            .required("Gender is required")
            .rules(&[Rule::Choice(Gender::CODES)]),
        FieldSpec::text("address").optional(),
        FieldSpec::text("dob")
            .required("Date of Birth is required")
            .rules(&[
                Rule::Pattern(Pattern::Dob, "Date of Birth must be in YYYY-MM-DD format"),
                Rule::CalendarDate("Invalid calendar date"),
            ]),
        FieldSpec::text("doctor_name")
            .required("Doctor Name is required")
            .rules(&[Rule::MaxLength(200, None)]),
    ];

    const UNIQUE: &'static [UniqueField] = &[UniqueField {
        field: "patient_id",
        message: "Patient with this Patient ID already exists.",
    }];

    type Output = PatientInput;

    fn build(mut cleaned: Cleaned) -> Result<PatientInput, ValidationErrors> {
        Ok(PatientInput {
            name: cleaned.text("name")?,
            patient_id: cleaned.optional_text("patient_id"),
            mobile: cleaned.text("mobile")?,
            gender: cleaned.choice("gender")?,
            address: cleaned.optional_text("address"),
            dob: cleaned.date("dob")?,
            doctor_name: cleaned.text("doctor_name")?,
        })
    }
}
