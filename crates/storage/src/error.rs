/// All errors that can be returned by a Borang storage implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No template with the given id.
    #[error("template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    /// No submission with the given id.
    #[error("submission not found: {submission_id}")]
    SubmissionNotFound { submission_id: String },

    /// A backend-specific storage error (DB connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
