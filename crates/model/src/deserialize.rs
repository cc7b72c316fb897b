//! Deserialization from template JSON into typed structs.
//!
//! The main entry point is [`from_template_json`], which takes a
//! `&serde_json::Value` and produces a [`FormTemplate`]. Only structurally
//! unusable JSON is an error here; authoring mistakes inside a well-formed
//! template are the lint pass's concern.

use std::fmt;

use crate::types::{FormData, FormTemplate, TableData};

/// Errors during template JSON deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template is missing a required top-level field.
    MissingField { field: String },
    /// The template structure is invalid.
    InvalidTemplate(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MissingField { field } => {
                write!(f, "template missing required field: '{}'", field)
            }
            TemplateError::InvalidTemplate(msg) => {
                write!(f, "invalid template: {}", msg)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Deserialize a template JSON document into a typed [`FormTemplate`].
pub fn from_template_json(template: &serde_json::Value) -> Result<FormTemplate, TemplateError> {
    if !template.is_object() {
        return Err(TemplateError::InvalidTemplate(
            "template must be a JSON object".to_string(),
        ));
    }
    for field in ["id", "name", "yearOfAssessment", "pages"] {
        if template.get(field).is_none() {
            return Err(TemplateError::MissingField {
                field: field.to_string(),
            });
        }
    }
    serde_json::from_value(template.clone())
        .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))
}

/// Deserialize a form-data JSON object (field id -> scalar value).
///
/// Used to seed a session from a persisted submission's `data` payload.
pub fn form_data_from_json(data: &serde_json::Value) -> Result<FormData, TemplateError> {
    if !data.is_object() {
        return Err(TemplateError::InvalidTemplate(
            "form data must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(data.clone()).map_err(|e| TemplateError::InvalidTemplate(e.to_string()))
}

/// Deserialize a raw table JSON array (rows of column id -> cell).
pub fn table_from_json(table: &serde_json::Value) -> Result<TableData, TemplateError> {
    if !table.is_array() {
        return Err(TemplateError::InvalidTemplate(
            "table data must be a JSON array".to_string(),
        ));
    }
    serde_json::from_value(table.clone())
        .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
