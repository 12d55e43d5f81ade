use crate::{
    error::ValidationErrors,
    pipeline::{Cleaned, FieldSpec, Form},
};

/// Used for both adding and editing a note.
pub struct NoteForm;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteInput {
    pub title: String,
    pub description: String,
}

impl Form for NoteForm {
    const NAME: &'static str = "note";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("title").required("Title field is empty."),
        FieldSpec::text("description").required("Description field is empty."),
    ];

    type Output = NoteInput;

    fn build(mut cleaned: Cleaned) -> Result<NoteInput, ValidationErrors> {
        Ok(NoteInput {
            title: cleaned.text("title")?,
            description: cleaned.text("description")?,
        })
    }
}
