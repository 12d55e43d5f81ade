use crate::{
    error::ValidationErrors,
    pipeline::{Cleaned, CrossRule, FieldSpec, Form, InputKind, UniqueField},
};

const ALL_REQUIRED: &str = "All fields are required";

pub struct StudentRegistrationForm;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRegistrationInput {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
}

impl Form for StudentRegistrationForm {
    const NAME: &'static str = "student_registration";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("username").required(ALL_REQUIRED),
        FieldSpec::text("password")
            .kind(InputKind::Secret)
            .required(ALL_REQUIRED),
        FieldSpec::text("confirm_password")
            .kind(InputKind::Secret)
            .required(ALL_REQUIRED),
        FieldSpec::text("name").required(ALL_REQUIRED),
        FieldSpec::text("email").required(ALL_REQUIRED),
    ];

    const CROSS: &'static [CrossRule] = &[CrossRule::Equal {
        first: "password",
        second: "confirm_password",
        message: "Passwords do not match",
    }];

    const UNIQUE: &'static [UniqueField] = &[
        UniqueField {
            field: "username",
            message: "Username already exists",
        },
        UniqueField {
            field: "email",
            message: "Email already registered",
        },
    ];

    type Output = StudentRegistrationInput;

    fn build(mut cleaned: Cleaned) -> Result<StudentRegistrationInput, ValidationErrors> {
        Ok(StudentRegistrationInput {
            username: cleaned.text("username")?,
            password: cleaned.text("password")?,
            name: cleaned.text("name")?,
            email: cleaned.text("email")?,
        })
    }
}

pub struct LoginForm;

#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl Form for LoginForm {
    const NAME: &'static str = "login";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("username"),
        FieldSpec::text("password").kind(InputKind::Secret),
    ];

    type Output = LoginInput;

    fn build(mut cleaned: Cleaned) -> Result<LoginInput, ValidationErrors> {
        Ok(LoginInput {
            username: cleaned.text("username")?,
            password: cleaned.text("password")?,
        })
    }
}
