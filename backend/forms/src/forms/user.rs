use crate::{
    error::ValidationErrors,
    pipeline::{Cleaned, FieldSpec, Form, InputKind, UniqueField},
    rules::{Pattern, Rule},
};

pub struct UserRegistrationForm;

#[derive(Debug, Clone, PartialEq)]
pub struct UserRegistrationInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl Form for UserRegistrationForm {
    const NAME: &'static str = "user_registration";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("full_name")
            .required("Full name is required")
            .rules(&[Rule::MaxLength(40, Some("Full name must be up to 40 characters"))]),
        FieldSpec::text("email")
            .required("Email is required")
            .rules(&[Rule::Pattern(
                Pattern::Email,
                "Please enter a valid email address",
            )]),
        FieldSpec::text("username")
            .required("Username is required")
            .rules(&[
                Rule::MaxLength(100, None),
                Rule::Pattern(
                    Pattern::Username,
                    "Username must start with letters and end with numbers",
                ),
            ]),
        FieldSpec::text("password")
            .kind(InputKind::Secret)
            .required("Password is required")
            .rules(&[Rule::MinLength(8, "Password must be more than 8 characters")]),
    ];

    const UNIQUE: &'static [UniqueField] = &[
        UniqueField {
            field: "email",
            message: "Email already registered",
        },
        UniqueField {
            field: "username",
            message: "Username already taken",
        },
    ];

    type Output = UserRegistrationInput;

    fn build(mut cleaned: Cleaned) -> Result<UserRegistrationInput, ValidationErrors> {
        Ok(UserRegistrationInput {
            full_name: cleaned.text("full_name")?,
            email: cleaned.text("email")?,
            username: cleaned.text("username")?,
            password: cleaned.text("password")?,
        })
    }
}
