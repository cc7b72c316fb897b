//! In-memory reference backend.
//!
//! Backs both stores with `tokio::sync::RwLock`-guarded maps. Intended
//! for tests and single-process embedding; a production host would put a
//! database behind the same traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::record::{FormSubmissionRecord, TemplateSummary};
use crate::traits::{SubmissionStore, TemplateStore};

#[derive(Default)]
pub struct MemoryStore {
    templates: RwLock<BTreeMap<String, serde_json::Value>>,
    submissions: RwLock<BTreeMap<String, FormSubmissionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Load a template document, keyed by its `id` field.
    ///
    /// Returns `Err(StorageError::Backend)` when the document has no
    /// string `id` to key on.
    pub async fn insert_template(&self, template: serde_json::Value) -> Result<(), StorageError> {
        let id = template
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| StorageError::Backend("template document has no 'id'".to_string()))?
            .to_string();
        self.templates.write().await.insert(id, template);
        Ok(())
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn get_template(&self, template_id: &str) -> Result<serde_json::Value, StorageError> {
        self.templates
            .read()
            .await
            .get(template_id)
            .cloned()
            .ok_or_else(|| StorageError::TemplateNotFound {
                template_id: template_id.to_string(),
            })
    }

    async fn list_templates(&self) -> Result<Vec<TemplateSummary>, StorageError> {
        let templates = self.templates.read().await;
        Ok(templates
            .iter()
            .map(|(id, doc)| TemplateSummary {
                template_id: id.clone(),
                name: doc
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                year_of_assessment: doc
                    .get("yearOfAssessment")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn get_submission(
        &self,
        submission_id: &str,
    ) -> Result<FormSubmissionRecord, StorageError> {
        self.submissions
            .read()
            .await
            .get(submission_id)
            .cloned()
            .ok_or_else(|| StorageError::SubmissionNotFound {
                submission_id: submission_id.to_string(),
            })
    }

    async fn put_submission(&self, record: FormSubmissionRecord) -> Result<(), StorageError> {
        self.submissions
            .write()
            .await
            .insert(record.submission_id.clone(), record);
        Ok(())
    }

    async fn list_submissions(
        &self,
        template_id: &str,
    ) -> Result<Vec<FormSubmissionRecord>, StorageError> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .filter(|r| r.template_id == template_id)
            .cloned()
            .collect())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
