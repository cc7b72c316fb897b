//! Initial form data generation.
//!
//! Text-like inputs start as the empty string, everything selectable or
//! numeric starts as an explicit Null (so show_if comparisons against
//! null behave), and readonly notes are omitted from the map entirely --
//! they carry no value and the validator skips them.

use borang_model::{FieldValue, FormData, FormTemplate, InputType};

/// Produce the initial `FormData` for a template, covering every field
/// across all pages and sections regardless of visibility.
pub fn generate_defaults(template: &FormTemplate) -> FormData {
    let mut data = FormData::new();
    for field in template.all_fields() {
        match field.input_type {
            InputType::Text | InputType::Email => {
                data.insert(field.id.clone(), FieldValue::Text(String::new()));
            }
            InputType::ReadonlyNote => {}
            InputType::Number
            | InputType::Date
            | InputType::Radio
            | InputType::Checkbox
            | InputType::Select
            | InputType::Countries
            | InputType::States
            | InputType::ItemList
            | InputType::Lookup => {
                data.insert(field.id.clone(), FieldValue::Null);
            }
        }
    }
    data
}

/// Seed form data from a prior submission: defaults overlaid with the
/// prior values of fields the template still declares. Values for fields
/// the template no longer carries are dropped.
pub fn seed_form_data(template: &FormTemplate, prior: &FormData) -> FormData {
    let mut data = generate_defaults(template);
    for (field_id, value) in prior {
        if data.contains_key(field_id) {
            data.insert(field_id.clone(), value.clone());
        }
    }
    data
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
