use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{FormSubmissionRecord, TemplateSummary};

/// Read access to stored form templates.
///
/// Templates are returned as raw JSON; callers deserialize with
/// `borang_model::from_template_json`. Implementations must be
/// `Send + Sync + 'static` so a host can share one store across
/// concurrent request handlers.
#[async_trait]
pub trait TemplateStore: Send + Sync + 'static {
    /// Fetch a template document by id.
    ///
    /// Returns `Err(StorageError::TemplateNotFound)` if absent.
    async fn get_template(&self, template_id: &str) -> Result<serde_json::Value, StorageError>;

    /// List all stored templates.
    async fn list_templates(&self) -> Result<Vec<TemplateSummary>, StorageError>;
}

/// Read/write access to form submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync + 'static {
    /// Fetch a submission by id.
    ///
    /// Returns `Err(StorageError::SubmissionNotFound)` if absent.
    async fn get_submission(
        &self,
        submission_id: &str,
    ) -> Result<FormSubmissionRecord, StorageError>;

    /// Insert or replace a submission. The record's `updated_at` is the
    /// caller's responsibility; the store persists it verbatim.
    async fn put_submission(&self, record: FormSubmissionRecord) -> Result<(), StorageError>;

    /// List submissions filed against one template.
    async fn list_submissions(
        &self,
        template_id: &str,
    ) -> Result<Vec<FormSubmissionRecord>, StorageError>;
}
