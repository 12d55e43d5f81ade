use std::{io, path::PathBuf, sync::LazyLock};

use forms::FileUpload;
use regex::Regex;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static UNSAFE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());
static REPEATED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Keeps letters, digits, dots, dashes and underscores of the last path segment.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let s = WHITESPACE.replace_all(base.trim(), "_");
    let s = UNSAFE.replace_all(&s, "");
    let s = REPEATED.replace_all(&s, "_");
    let s = s.trim_start_matches('.');

    if s.is_empty() {
        "file".to_string()
    } else {
        s.to_string()
    }
}

/// Uploaded files on disk under one root. Stored files are referred to by their
/// path relative to the root, e.g. `resumes/<uuid>_cv.pdf`.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }

    pub async fn save(&self, dir: &str, file: &FileUpload) -> io::Result<String> {
        fs::create_dir_all(self.root.join(dir)).await?;

        let name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(&file.filename)
        );
        let reference = format!("{dir}/{name}");
        fs::write(self.path(&reference), &file.bytes).await?;

        Ok(reference)
    }

    /// Best effort; used when the record for a saved file could not be written.
    pub async fn discard(&self, reference: &str) {
        if let Err(e) = fs::remove_file(self.path(reference)).await {
            warn!("Failed to remove {reference}: {e}");
        }
    }
}
