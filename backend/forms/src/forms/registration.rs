use chrono::{DateTime, Utc};

use crate::{
    choices::{Country, Gender, Hobby},
    error::ValidationErrors,
    input::FileUpload,
    pipeline::{Cleaned, CrossRule, FieldSpec, Form, InputKind, UniqueField},
    rules::{Pattern, RESUME_POLICY, Rule},
};

pub struct RegistrationForm;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationInput {
    pub name: String,
    pub gender: Gender,
    pub hobbies: Vec<Hobby>,
    pub appointment: DateTime<Utc>,
    pub country: Country,
    pub email: String,
    pub phone: String,
    pub resume: FileUpload,
    pub password: String,
}

const PASSWORD_RULES: &str = "Password must be at least 8 characters long and include one uppercase letter, one lowercase letter, one number, and one symbol";

impl Form for RegistrationForm {
    const NAME: &'static str = "registration";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name").rules(&[Rule::MaxLength(100, None)]),
        FieldSpec::text("gender")
            .required("Please select gender")
            .rules(&[Rule::Choice(Gender::CODES)]),
        FieldSpec::text("hobbies")
            .kind(InputKind::List)
            .required("Please select at least one hobby")
            .rules(&[Rule::Choice(Hobby::CODES)]),
        FieldSpec::text("appointment")
            .required("Please select appointment")
            .rules(&[
                Rule::Timestamp,
                Rule::NotPast("Appointment date & time cannot be in the past"),
            ]),
        FieldSpec::text("country")
            .required("Please select country")
            .rules(&[Rule::Choice(Country::CODES)]),
        FieldSpec::text("email")
            .required("Email is required")
            .rules(&[Rule::Pattern(Pattern::Email, "Please enter a valid email")]),
        FieldSpec::text("phone")
            .required("Phone Number is required")
            .rules(&[
                Rule::MaxLength(15, None),
                Rule::Pattern(Pattern::Phone, "Please enter a valid phone number"),
            ]),
        FieldSpec::text("resume")
            .kind(InputKind::File)
            .required("Please upload resume")
            .rules(&[Rule::File(RESUME_POLICY)]),
        FieldSpec::text("password")
            .kind(InputKind::Secret)
            .required("Password is required")
            .rules(&[Rule::Strength(PASSWORD_RULES)]),
        FieldSpec::text("confirm_password")
            .kind(InputKind::Secret)
            .required("Confirm Password is required"),
    ];

    const CROSS: &'static [CrossRule] = &[CrossRule::Equal {
        first: "password",
        second: "confirm_password",
        message: "Confirm Password did not match Password",
    }];

    const UNIQUE: &'static [UniqueField] = &[UniqueField {
        field: "email",
        message: "Email already registered",
    }];

    type Output = RegistrationInput;

    fn build(mut cleaned: Cleaned) -> Result<RegistrationInput, ValidationErrors> {
        Ok(RegistrationInput {
            name: cleaned.text("name")?,
            gender: cleaned.choice("gender")?,
            hobbies: cleaned.choices("hobbies")?,
            appointment: cleaned.timestamp("appointment")?,
            country: cleaned.choice("country")?,
            email: cleaned.text("email")?,
            phone: cleaned.text("phone")?,
            resume: cleaned.file("resume")?,
            password: cleaned.text("password")?,
        })
    }
}
