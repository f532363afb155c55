use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FinstatError {
    #[error("document '{doc_id}' is unreadable: {reason}")]
    DocumentUnreadable { doc_id: String, reason: String },

    #[error("required field '{field}' is missing")]
    FieldMissingRequired { field: String },

    #[error("input {path} is unavailable: {reason}")]
    InputUnavailable { path: PathBuf, reason: String },

    #[error("failed to open source {path}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("failed to load mapping from {path}: {reason}")]
    MappingLoad { path: PathBuf, reason: String },

    #[error("invalid mapping: {0}")]
    MappingInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FinstatError {
    pub(crate) fn unreadable(doc_id: impl Into<String>, reason: impl ToString) -> Self {
        FinstatError::DocumentUnreadable {
            doc_id: doc_id.into(),
            reason: reason.to_string(),
        }
    }
}
