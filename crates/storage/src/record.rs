use serde::{Deserialize, Serialize};

/// A persisted form submission.
///
/// `data` is the raw form-data JSON object (field id -> scalar value);
/// hosts deserialize it with `borang_model::form_data_from_json` when
/// resuming an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmissionRecord {
    pub submission_id: String,
    pub template_id: String,
    /// Year of assessment the submission was filed for.
    pub year: String,
    pub data: serde_json::Value,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub updated_at: String,
}

/// Listing entry for stored templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub template_id: String,
    pub name: String,
    pub year_of_assessment: String,
}
