//! Borang form rules engine -- accepts a form template + form data,
//! derives visibility, formula results, and validation errors.
//!
//! The engine is the algorithmic core behind template-described tax
//! forms (Form C, CP204, generic forms): a visibility evaluator over
//! ShowIf condition trees, two formula engines performing bounded
//! fixed-point recomputation (per-row table formulas and cross-field
//! global formulas), and a visibility-aware validator.
//!
//! Everything here is a pure or near-pure function over
//! `(template, form_data)`, driven by the host's field-changed events.
//! The engine owns no persistence and no rendering; it sits on the hot
//! path of every keystroke-level edit, so no condition inside it is
//! fatal -- recoverable problems become [`diag::Diagnostic`] findings and
//! evaluation degrades to last known good values.

pub mod defaults;
pub mod diag;
pub mod expr;
pub mod global;
pub mod session;
pub mod table;
pub mod validate;
pub mod visibility;

pub use defaults::{generate_defaults, seed_form_data};
pub use diag::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use expr::ExprError;
pub use global::{on_field_changed, sync_global_formulas, SyncOutcome};
pub use session::FormSession;
pub use table::{resolve_table_formulas, FormulaKind, TableResolution};
pub use validate::{validate, validate_page, validate_scoped, ValidationReport};
pub use visibility::{is_visible, visible_field_ids};

/// Bound on fixed-point recomputation passes, shared by the table and
/// global formula engines. Hitting the bound is surfaced as a finding,
/// not an error: the last computed values are returned.
pub const MAX_PASSES: u32 = 5;

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod integration_tests {
    use super::*;
    use borang_model::{from_template_json, table_from_json, FieldValue, FormData};

    /// End-to-end wizard scenario: a required field hidden behind a
    /// toggle produces no error until the toggle reveals it.
    #[test]
    fn hidden_required_field_round_trip() {
        let template = from_template_json(&serde_json::json!({
            "id": "generic", "name": "Generic form", "yearOfAssessment": "2024",
            "pages": [{
                "id": "P1", "title": "Page one",
                "sections": [{
                    "part": "S1", "title": "Section one",
                    "fields": [
                        { "id": "toggle", "label": "Toggle", "inputType": "radio" },
                        { "id": "F1", "label": "Conditional detail", "inputType": "text",
                          "required": true,
                          "show_if": { "fieldId": "toggle", "operator": "equals", "value": "yes" } }
                    ]
                }]
            }]
        }))
        .unwrap();

        let mut data = generate_defaults(&template);
        data.insert("toggle".to_string(), FieldValue::Text("no".to_string()));

        let visible = visible_field_ids(&template, &data);
        assert!(!visible.contains("F1"));
        let report = validate(&template, &data, &visible);
        assert!(report.valid);

        data.insert("toggle".to_string(), FieldValue::Text("yes".to_string()));
        let visible = visible_field_ids(&template, &data);
        assert!(visible.contains("F1"));
        let report = validate(&template, &data, &visible);
        assert_eq!(
            report.errors.get("F1").map(String::as_str),
            Some("Conditional detail is required.")
        );
    }

    /// A capital-allowance style schedule: per-row amounts plus a
    /// running total, resolved alongside a cross-field computation.
    #[test]
    fn schedule_and_global_formulas_compose() {
        let template = from_template_json(&serde_json::json!({
            "id": "form_c", "name": "Form C", "yearOfAssessment": "2024",
            "pages": [{
                "id": "p_comp", "title": "Computation",
                "sections": [{
                    "part": "B", "title": "Income",
                    "fields": [
                        { "id": "schedule", "label": "Capital allowances", "inputType": "itemList" },
                        { "id": "gross_income", "label": "Gross income", "inputType": "number" },
                        { "id": "allowances_claimed", "label": "Allowances claimed", "inputType": "number" },
                        { "id": "chargeable", "label": "Chargeable income", "inputType": "number",
                          "formula": "{gross_income} - {allowances_claimed}" }
                    ]
                }]
            }]
        }))
        .unwrap();

        let raw = table_from_json(&serde_json::json!([
            { "asset": "Plant",    "cost": 100000, "rate": 0.14,
              "allowance": { "formula": "{cost} * {rate}" } },
            { "asset": "Vehicles", "cost": 50000,  "rate": 0.2,
              "allowance": { "formula": "{cost} * {rate}" } },
            { "asset": "Total", "allowance": { "formula": "SUM(ABOVE)" } }
        ]))
        .unwrap();

        let resolution = resolve_table_formulas(&raw);
        assert!(resolution.converged);
        let total = resolution.display[2]
            .get("allowance")
            .map(|c| c.to_decimal_or_zero())
            .unwrap();
        assert_eq!(total, "24000.00".parse().unwrap());

        // The host copies the schedule total into the flat field, then
        // lets the global engine derive the chargeable amount.
        let mut data = FormData::new();
        data.insert(
            "gross_income".to_string(),
            FieldValue::Number("180000".parse().unwrap()),
        );
        let outcome = on_field_changed(
            &template,
            &data,
            "allowances_claimed",
            FieldValue::Number(total),
        );
        assert!(outcome.converged);
        assert_eq!(
            outcome.data.get("chargeable"),
            Some(&FieldValue::Number("156000.00".parse().unwrap()))
        );
    }
}
