//! Template authoring lint.
//!
//! A template that deserializes cleanly can still carry authoring bugs:
//! duplicate field ids, conditions pointing at fields that do not exist,
//! formulas referencing undeclared fields. None of these abort evaluation
//! (the engine degrades to safe defaults at runtime), so the lint pass
//! surfaces them as findings for the template author instead.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::{FormTemplate, ShowIf};

/// Severity level for a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LintSeverity {
    Info,
    Warning,
}

/// What kind of authoring mistake a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LintCode {
    DuplicateFieldId,
    UnknownShowIfField,
    UnknownFormulaField,
}

/// A notable finding from the template lint.
#[derive(Debug, Clone, Serialize)]
pub struct LintFinding {
    pub code: LintCode,
    pub severity: LintSeverity,
    pub message: String,
    /// The declared field (or page/section part) the finding is anchored to.
    pub location: String,
}

/// Lint a template for authoring mistakes.
///
/// Findings are sorted by location then message for deterministic output.
pub fn lint_template(template: &FormTemplate) -> Vec<LintFinding> {
    let mut findings = Vec::new();

    // Duplicate field ids
    let mut seen: BTreeMap<&str, u32> = BTreeMap::new();
    for field in template.all_fields() {
        *seen.entry(field.id.as_str()).or_insert(0) += 1;
    }
    let declared: BTreeSet<&str> = seen.keys().copied().collect();
    for (id, count) in &seen {
        if *count > 1 {
            findings.push(LintFinding {
                code: LintCode::DuplicateFieldId,
                severity: LintSeverity::Warning,
                message: format!("field id '{}' is declared {} times", id, count),
                location: id.to_string(),
            });
        }
    }

    // show_if references, at every level of the hierarchy
    for page in &template.pages {
        check_show_if(page.show_if.as_ref(), &page.id, &declared, &mut findings);
        for section in &page.sections {
            let loc = format!("{}/{}", page.id, section.part);
            check_show_if(section.show_if.as_ref(), &loc, &declared, &mut findings);
            for field in &section.fields {
                check_show_if(field.show_if.as_ref(), &field.id, &declared, &mut findings);
            }
        }
    }

    // Formula placeholder references
    for field in template.all_fields() {
        if let Some(ref formula) = field.formula {
            for referenced in placeholder_ids(formula) {
                if !declared.contains(referenced.as_str()) {
                    findings.push(LintFinding {
                        code: LintCode::UnknownFormulaField,
                        severity: LintSeverity::Warning,
                        message: format!(
                            "formula on '{}' references undeclared field '{}'",
                            field.id, referenced
                        ),
                        location: field.id.clone(),
                    });
                }
            }
        }
    }

    findings.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.message.cmp(&b.message))
    });
    findings
}

fn check_show_if(
    cond: Option<&ShowIf>,
    location: &str,
    declared: &BTreeSet<&str>,
    findings: &mut Vec<LintFinding>,
) {
    let Some(cond) = cond else { return };
    if let Some(ref field_id) = cond.field_id {
        if !declared.contains(field_id.as_str()) {
            findings.push(LintFinding {
                code: LintCode::UnknownShowIfField,
                severity: LintSeverity::Warning,
                message: format!(
                    "show_if at '{}' references undeclared field '{}'",
                    location, field_id
                ),
                location: location.to_string(),
            });
        }
    }
    if let Some(ref children) = cond.conditions {
        for child in children {
            check_show_if(Some(child), location, declared, findings);
        }
    }
}

/// Extract `{identifier}` placeholder ids from a formula string.
///
/// Unterminated braces yield no id for that fragment; the expression
/// engine reports the syntax error at evaluation time.
pub fn placeholder_ids(formula: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut rest = formula;
    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        match rest.find('}') {
            Some(close) => {
                let id = rest[..close].trim();
                if !id.is_empty() {
                    ids.push(id.to_string());
                }
                rest = &rest[close + 1..];
            }
            None => break,
        }
    }
    ids
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
