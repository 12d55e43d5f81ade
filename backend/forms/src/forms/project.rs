use crate::{
    error::ValidationErrors,
    input::FileUpload,
    pipeline::{Cleaned, FieldSpec, Form, InputKind, UniqueField},
    rules::{DOCUMENT_POLICY, Pattern, Rule},
};

pub struct ProjectSubmissionForm;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSubmissionInput {
    pub tu_registration_number: String,
    pub email: String,
    pub project_file: FileUpload,
}

impl Form for ProjectSubmissionForm {
    const NAME: &'static str = "project_submission";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("tu_registration_number")
            .required("TU Registration Number is required")
            .rules(&[Rule::MaxLength(50, None)]),
        FieldSpec::text("email")
            .required("Email Address is required")
            .rules(&[Rule::Pattern(
                Pattern::Email,
                "Please enter a valid email address",
            )]),
        FieldSpec::text("project_file")
            .kind(InputKind::File)
            .required("Project File is required")
            .rules(&[Rule::File(DOCUMENT_POLICY)]),
    ];

    const UNIQUE: &'static [UniqueField] = &[UniqueField {
        field: "tu_registration_number",
        message: "This registration number already submitted",
    }];

    type Output = ProjectSubmissionInput;

    fn build(mut cleaned: Cleaned) -> Result<ProjectSubmissionInput, ValidationErrors> {
        Ok(ProjectSubmissionInput {
            tu_registration_number: cleaned.text("tu_registration_number")?,
            email: cleaned.text("email")?,
            project_file: cleaned.file("project_file")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        forms::test_support::{errors_of, kinds_of, now},
        input::RawInput,
        rules::MB,
    };

    #[test]
    fn test_accepts_five_megabyte_slides() {
        let input = RawInput::new()
            .with_text("tu_registration_number", "7-2-39-123-2020")
            .with_text("email", "student@tu.edu.np")
            .with_file(
                "project_file",
                FileUpload::new("final.PPTX", vec![0u8; (5 * MB) as usize]),
            );

        assert!(ProjectSubmissionForm::bind(input).validate(now()).is_valid());
    }

    #[test]
    fn test_rejects_archives_and_oversize() {
        let zip = RawInput::new().with_file("project_file", FileUpload::new("code.zip", vec![1u8]));
        let errors = errors_of::<ProjectSubmissionForm>(zip);
        assert_eq!(
            errors.messages("project_file"),
            vec!["File format must be pdf, doc, docx, ppt, pptx, or jpeg"]
        );

        let big = RawInput::new().with_file(
            "project_file",
            FileUpload::new("report.pdf", vec![0u8; (5 * MB + 1) as usize]),
        );
        assert_eq!(
            kinds_of::<ProjectSubmissionForm>(big, "project_file"),
            vec![ErrorKind::FileTooLarge]
        );
    }

    #[test]
    fn test_empty_file_part_is_missing() {
        let input = RawInput::new().with_file("project_file", FileUpload::new("", Vec::new()));

        let errors = errors_of::<ProjectSubmissionForm>(input);
        assert_eq!(errors.messages("project_file"), vec!["Project File is required"]);
        assert_eq!(errors.messages("email"), vec!["Email Address is required"]);
    }
}
