//! ShowIf evaluation and visible-field resolution.
//!
//! The condition tree is recursive: leaves compare one field's stored
//! value against a literal, composites combine children with and/or.
//! Evaluation is total -- every malformed case degrades to a boolean, and
//! the policy is fail-open: an authoring mistake must never silently hide
//! a required field, so the unrecognized cases evaluate visible at the
//! cost of occasionally over-showing.

use std::collections::BTreeSet;

use borang_model::{FieldValue, FormData, FormTemplate, ShowIf};

use crate::diag::{DiagnosticCode, Diagnostics};

/// Evaluate a visibility condition. `None` means unconditional.
///
/// Total and side-effect free; findings from malformed conditions are
/// discarded here. Use [`eval_show_if`] to collect them.
pub fn is_visible(cond: Option<&ShowIf>, form_data: &FormData) -> bool {
    match cond {
        None => true,
        Some(c) => eval_show_if(c, form_data, &mut Diagnostics::new()),
    }
}

/// Evaluate one condition tree, recording findings in the collector.
pub fn eval_show_if(cond: &ShowIf, form_data: &FormData, diag: &mut Diagnostics) -> bool {
    match cond.operator.as_str() {
        // An empty (or absent) conditions list is vacuously true for
        // `and` but false for `or`. The asymmetry matches Array.every /
        // Array.some and existing templates depend on it.
        "and" => match cond.conditions {
            Some(ref children) => children.iter().all(|c| eval_show_if(c, form_data, diag)),
            None => true,
        },
        "or" => match cond.conditions {
            Some(ref children) => children.iter().any(|c| eval_show_if(c, form_data, diag)),
            None => false,
        },
        "equals" | "not_equals" => {
            // A leaf without a fieldId cannot be evaluated; fail open
            // regardless of the operator.
            let Some(ref field_id) = cond.field_id else {
                return true;
            };
            let matches = eval_leaf(field_id, cond.value.as_ref(), form_data);
            if cond.operator == "equals" {
                matches
            } else {
                !matches
            }
        }
        other => {
            diag.warn(
                DiagnosticCode::UnknownShowIfOperator,
                format!("unknown show_if operator '{}', failing open", other),
            );
            true
        }
    }
}

/// Leaf equality, strict: no cross-type coercion, and a field missing
/// from the map equals nothing (not even an explicit Null comparand).
fn eval_leaf(field_id: &str, value: Option<&FieldValue>, form_data: &FormData) -> bool {
    let expected = value.unwrap_or(&FieldValue::Null);
    match form_data.get(field_id) {
        Some(actual) => actual == expected,
        None => false,
    }
}

/// Resolve the set of currently visible field ids.
///
/// Hierarchical short-circuit: a hidden page hides every section and
/// field under it regardless of their own conditions, and a hidden
/// section hides its fields. The result is always a subset of the
/// template's declared field ids.
pub fn visible_field_ids(template: &FormTemplate, form_data: &FormData) -> BTreeSet<String> {
    resolve_visible(template, form_data, &mut Diagnostics::new())
}

/// [`visible_field_ids`] with finding collection.
pub fn resolve_visible(
    template: &FormTemplate,
    form_data: &FormData,
    diag: &mut Diagnostics,
) -> BTreeSet<String> {
    let mut visible = BTreeSet::new();
    for page in &template.pages {
        if let Some(ref cond) = page.show_if {
            if !eval_show_if(cond, form_data, diag) {
                continue;
            }
        }
        for section in &page.sections {
            if let Some(ref cond) = section.show_if {
                if !eval_show_if(cond, form_data, diag) {
                    continue;
                }
            }
            for field in &section.fields {
                let shown = match field.show_if {
                    Some(ref cond) => eval_show_if(cond, form_data, diag),
                    None => true,
                };
                if shown {
                    visible.insert(field.id.clone());
                }
            }
        }
    }
    visible
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use borang_model::from_template_json;
    use rust_decimal::Decimal;

    fn data(entries: &[(&str, FieldValue)]) -> FormData {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn no_condition_is_visible() {
        assert!(is_visible(None, &FormData::new()));
    }

    #[test]
    fn leaf_equals_and_not_equals() {
        let cond = ShowIf::leaf("field1", "equals", FieldValue::Text("value1".to_string()));
        assert!(is_visible(
            Some(&cond),
            &data(&[("field1", FieldValue::Text("value1".to_string()))])
        ));
        assert!(!is_visible(
            Some(&cond),
            &data(&[("field1", FieldValue::Text("other".to_string()))])
        ));

        let cond = ShowIf::leaf("field1", "not_equals", FieldValue::Text("value1".to_string()));
        assert!(is_visible(
            Some(&cond),
            &data(&[("field1", FieldValue::Text("other".to_string()))])
        ));
    }

    #[test]
    fn leaf_equality_is_strict() {
        // Text "1" does not equal Number 1
        let cond = ShowIf::leaf("n", "equals", FieldValue::Number(Decimal::ONE));
        assert!(!is_visible(
            Some(&cond),
            &data(&[("n", FieldValue::Text("1".to_string()))])
        ));
        assert!(is_visible(
            Some(&cond),
            &data(&[("n", FieldValue::Number(Decimal::ONE))])
        ));
    }

    #[test]
    fn missing_field_matches_nothing() {
        let empty = FormData::new();
        let eq_null = ShowIf::leaf("gone", "equals", FieldValue::Null);
        assert!(!is_visible(Some(&eq_null), &empty));

        let ne_null = ShowIf::leaf("gone", "not_equals", FieldValue::Null);
        assert!(is_visible(Some(&ne_null), &empty));

        // An explicitly Null value does match a Null comparand
        let with_null = data(&[("gone", FieldValue::Null)]);
        assert!(is_visible(Some(&eq_null), &with_null));
    }

    #[test]
    fn leaf_without_field_id_fails_open() {
        for operator in ["equals", "not_equals"] {
            let cond = ShowIf {
                field_id: None,
                operator: operator.to_string(),
                value: Some(FieldValue::Text("x".to_string())),
                conditions: None,
            };
            assert!(is_visible(Some(&cond), &FormData::new()));
        }
    }

    #[test]
    fn empty_composites_are_asymmetric() {
        let d = FormData::new();
        assert!(!is_visible(Some(&ShowIf::composite("or", vec![])), &d));
        assert!(is_visible(Some(&ShowIf::composite("and", vec![])), &d));
    }

    #[test]
    fn composite_or_and_and() {
        let d = data(&[
            ("a", FieldValue::Text("yes".to_string())),
            ("b", FieldValue::Text("no".to_string())),
        ]);
        let matching = ShowIf::leaf("a", "equals", FieldValue::Text("yes".to_string()));
        let non_matching = ShowIf::leaf("b", "equals", FieldValue::Text("yes".to_string()));

        let or = ShowIf::composite("or", vec![matching.clone(), non_matching.clone()]);
        assert!(is_visible(Some(&or), &d));

        let and = ShowIf::composite("and", vec![matching, non_matching]);
        assert!(!is_visible(Some(&and), &d));
    }

    #[test]
    fn unknown_operator_fails_open_with_warning() {
        let cond = ShowIf {
            field_id: Some("a".to_string()),
            operator: "greater_than".to_string(),
            value: Some(FieldValue::Number(Decimal::TEN)),
            conditions: None,
        };
        let mut diag = Diagnostics::new();
        assert!(eval_show_if(&cond, &FormData::new(), &mut diag));
        assert_eq!(diag.entries().len(), 1);
        assert_eq!(
            diag.entries()[0].code,
            DiagnosticCode::UnknownShowIfOperator
        );
    }

    fn wizard_template() -> FormTemplate {
        from_template_json(&serde_json::json!({
            "id": "t", "name": "T", "yearOfAssessment": "2024",
            "pages": [
                {
                    "id": "p1", "title": "Main",
                    "sections": [
                        {
                            "part": "A", "title": "Always",
                            "fields": [
                                { "id": "toggle", "label": "Claim incentives?", "inputType": "radio" },
                                { "id": "incentive_code", "label": "Incentive code", "inputType": "text",
                                  "show_if": { "fieldId": "toggle", "operator": "equals", "value": "yes" } }
                            ]
                        },
                        {
                            "part": "B", "title": "Conditional section",
                            "show_if": { "fieldId": "toggle", "operator": "equals", "value": "yes" },
                            "fields": [
                                { "id": "incentive_amount", "label": "Amount", "inputType": "number" }
                            ]
                        }
                    ]
                },
                {
                    "id": "p2", "title": "Hidden page",
                    "show_if": { "fieldId": "toggle", "operator": "equals", "value": "never" },
                    "sections": [
                        {
                            "part": "C", "title": "Unreachable",
                            "fields": [
                                // Unconditional field, but the page gates it out
                                { "id": "unreachable", "label": "Unreachable", "inputType": "text" }
                            ]
                        }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn hierarchy_short_circuits() {
        let t = wizard_template();

        let off = data(&[("toggle", FieldValue::Text("no".to_string()))]);
        let visible = visible_field_ids(&t, &off);
        assert!(visible.contains("toggle"));
        assert!(!visible.contains("incentive_code"));
        assert!(!visible.contains("incentive_amount"));
        assert!(!visible.contains("unreachable"));

        let on = data(&[("toggle", FieldValue::Text("yes".to_string()))]);
        let visible = visible_field_ids(&t, &on);
        assert!(visible.contains("incentive_code"));
        assert!(visible.contains("incentive_amount"));
        assert!(!visible.contains("unreachable"));
    }

    #[test]
    fn result_is_subset_of_declared_ids() {
        let t = wizard_template();
        let declared: BTreeSet<String> = t.all_fields().map(|f| f.id.clone()).collect();
        let visible = visible_field_ids(&t, &data(&[("toggle", FieldValue::Text("yes".to_string()))]));
        assert!(visible.is_subset(&declared));
    }
}
