//! Raw, unvalidated request data as it arrives from a form post.

use std::collections::HashMap;

use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased text after the last dot, or the whole name when there is no dot.
    pub fn extension(&self) -> String {
        self.filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Browsers send an empty part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty() && self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
    File(FileUpload),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    fields: HashMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeated keys collect into a list, the way checkbox groups are posted.
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        let merged = match self.fields.remove(&name) {
            Some(RawValue::Text(first)) => RawValue::List(vec![first, value]),
            Some(RawValue::List(mut values)) => {
                values.push(value);
                RawValue::List(values)
            }
            Some(RawValue::File(_)) | None => RawValue::Text(value),
        };

        self.fields.insert(name, merged);
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: FileUpload) {
        self.fields.insert(name.into(), RawValue::File(file));
    }

    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.push_file(name, file);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = RawInput::new();
        for (name, value) in iter {
            input.push_text(name, value);
        }
        input
    }
}
