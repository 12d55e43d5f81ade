use crate::{
    error::ValidationErrors,
    pipeline::{Cleaned, FieldSpec, Form},
};

pub struct GroceryForm;

#[derive(Debug, Clone, PartialEq)]
pub struct GroceryInput {
    pub name: String,
}

impl Form for GroceryForm {
    const NAME: &'static str = "grocery";

    const FIELDS: &'static [FieldSpec] = &[FieldSpec::text("name").required("Please provide value")];

    type Output = GroceryInput;

    fn build(mut cleaned: Cleaned) -> Result<GroceryInput, ValidationErrors> {
        Ok(GroceryInput {
            name: cleaned.text("name")?,
        })
    }
}
