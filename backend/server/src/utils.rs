use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use forms::{FileUpload, Form, RawInput};
use tracing::warn;

use crate::error::AppError::{self, MalformedPayload, PayloadTooLarge};

/// Parts with a filename become files; the rest are text. Repeated names collect into lists.
///
/// A file part cut off by the body limit is reported as that field's size error, with the
/// fields read so far echoed back.
pub async fn read_multipart<F: Form>(mut multipart: Multipart) -> Result<RawInput, AppError> {
    let mut input = RawInput::new();

    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let filename = field.file_name().map(str::to_string);

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if filename.is_some() && e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                let Some(error) = F::oversized(&name) else {
                    return Err(rejected(e));
                };
                warn!("Upload {name} for {} exceeded the body limit", F::NAME);
                return Err(AppError::invalid(&F::bind(input), error.into()));
            }
            Err(e) => return Err(rejected(e)),
        };

        match filename {
            Some(filename) => input.push_file(name, FileUpload::new(filename, bytes)),
            None => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| MalformedPayload)?;
                input.push_text(name, text);
            }
        }
    }

    Ok(input)
}

fn rejected(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Multipart body over the size limit: {e}");
        return PayloadTooLarge;
    }

    warn!("Malformed multipart body: {e}");
    MalformedPayload
}

pub fn read_pairs(pairs: Vec<(String, String)>) -> RawInput {
    pairs.into_iter().collect()
}
