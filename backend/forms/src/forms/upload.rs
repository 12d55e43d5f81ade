use crate::{
    error::ValidationErrors,
    input::FileUpload,
    pipeline::{Cleaned, FieldSpec, Form, InputKind},
    rules::{IMAGE_POLICY, Rule},
};

pub struct FileUploadForm;

#[derive(Debug, Clone, PartialEq)]
pub struct FileUploadInput {
    pub file: FileUpload,
}

impl Form for FileUploadForm {
    const NAME: &'static str = "file_upload";

    const FIELDS: &'static [FieldSpec] = &[FieldSpec::text("file")
        .kind(InputKind::File)
        .required("Please select a file to upload!")
        .rules(&[Rule::File(IMAGE_POLICY)])];

    type Output = FileUploadInput;

    fn build(mut cleaned: Cleaned) -> Result<FileUploadInput, ValidationErrors> {
        Ok(FileUploadInput {
            file: cleaned.file("file")?,
        })
    }
}
