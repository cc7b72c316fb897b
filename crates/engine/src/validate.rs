//! Visibility-aware validation.
//!
//! One parameterized implementation serves both the full-template pass
//! and the single-page wizard pass. Only fields in the visible set are
//! checked: a hidden field keeps whatever value it holds, but never
//! produces an error (retain-and-skip is the contract; values are not
//! cleared on hiding).
//!
//! Validation never throws. An empty scope (unknown page id, nothing
//! visible) is simply valid.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use borang_model::{FieldValue, FormData, FormTemplate, FormTemplateField, InputType};
use regex::Regex;
use serde::Serialize;

/// Result of a validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// field id -> first failing message for that field.
    pub errors: std::collections::BTreeMap<String, String>,
    pub valid: bool,
}

impl ValidationReport {
    fn from_errors(errors: std::collections::BTreeMap<String, String>) -> Self {
        let valid = errors.is_empty();
        ValidationReport { errors, valid }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Shape check only: something@something.tld, no whitespace
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

/// Validate the whole template.
pub fn validate(
    template: &FormTemplate,
    form_data: &FormData,
    visible: &BTreeSet<String>,
) -> ValidationReport {
    validate_scoped(template, form_data, visible, None)
}

/// Validate one page; true when every visible field on it passes.
/// An unknown page id has nothing to validate and is valid.
pub fn validate_page(
    template: &FormTemplate,
    page_id: &str,
    form_data: &FormData,
    visible: &BTreeSet<String>,
) -> bool {
    validate_scoped(template, form_data, visible, Some(page_id)).valid
}

/// The shared rule pass, optionally restricted to one page.
pub fn validate_scoped(
    template: &FormTemplate,
    form_data: &FormData,
    visible: &BTreeSet<String>,
    page_scope: Option<&str>,
) -> ValidationReport {
    let mut errors = std::collections::BTreeMap::new();

    for page in &template.pages {
        if let Some(scope) = page_scope {
            if page.id != scope {
                continue;
            }
        }
        for section in &page.sections {
            for field in &section.fields {
                if field.input_type == InputType::ReadonlyNote {
                    continue;
                }
                if !visible.contains(&field.id) {
                    continue;
                }
                if let Some(message) = check_field(field, form_data) {
                    errors.insert(field.id.clone(), message);
                }
            }
        }
    }

    ValidationReport::from_errors(errors)
}

/// First failing rule for one field, or None when it passes.
fn check_field(field: &FormTemplateField, form_data: &FormData) -> Option<String> {
    let value = form_data.get(&field.id);
    let empty = value.map(FieldValue::is_empty_value).unwrap_or(true);

    if field.is_required() && empty {
        return Some(format!("{} is required.", field.label));
    }

    if field.input_type == InputType::Email && !empty {
        let looks_like_email = match value {
            Some(FieldValue::Text(s)) => email_regex().is_match(s),
            // Non-text values can never look like an email
            _ => false,
        };
        if !looks_like_email {
            return Some(format!("{} must be a valid email.", field.label));
        }
    }

    None
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
