//! One editing session over a template.
//!
//! `FormSession` composes the engines into the whole-form lifecycle:
//! defaults (or a resumed submission) produce the initial data, edits
//! flow through the global formula engine one at a time, and visibility
//! plus validation are derived on demand. Validation failures never
//! change state -- the session stays editable; persistence of the final
//! data belongs to the host's stores.
//!
//! Findings from every operation accumulate on the session until the
//! host drains them.

use std::collections::BTreeSet;

use borang_model::{FieldValue, FormData, FormTemplate, TableData};

use crate::diag::{Diagnostic, Diagnostics};
use crate::table::{resolve_table_formulas_with, TableResolution};
use crate::validate::ValidationReport;
use crate::{defaults, global, validate, visibility};

pub struct FormSession {
    template: FormTemplate,
    data: FormData,
    diagnostics: Diagnostics,
}

impl FormSession {
    /// Start a fresh session with generated defaults.
    pub fn new(template: FormTemplate) -> Self {
        let data = defaults::generate_defaults(&template);
        FormSession {
            template,
            data,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Resume a session from a prior submission's data.
    pub fn resume(template: FormTemplate, prior: &FormData) -> Self {
        let data = defaults::seed_form_data(&template, prior);
        FormSession {
            template,
            data,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Apply one edit and run the formula cascade to its fixed point
    /// (or pass bound). Returns whether the cascade converged.
    pub fn set_field(&mut self, field_id: &str, value: FieldValue) -> bool {
        let outcome = global::on_field_changed_with(
            &self.template,
            &self.data,
            field_id,
            value,
            &mut self.diagnostics,
        );
        self.data = outcome.data;
        outcome.converged
    }

    /// Field ids currently eligible for display and validation.
    pub fn visible_fields(&mut self) -> BTreeSet<String> {
        visibility::resolve_visible(&self.template, &self.data, &mut self.diagnostics)
    }

    /// Full-template validation against the current visible set.
    pub fn validate(&mut self) -> ValidationReport {
        let visible = self.visible_fields();
        validate::validate(&self.template, &self.data, &visible)
    }

    /// Single-page validation (wizard "next" button).
    pub fn validate_page(&mut self, page_id: &str) -> bool {
        let visible = self.visible_fields();
        validate::validate_page(&self.template, page_id, &self.data, &visible)
    }

    /// Resolve an item-list table's formulas, accumulating findings on
    /// the session. The raw table is owned by the host; only the display
    /// copy is returned.
    pub fn resolve_table(&mut self, raw: &TableData) -> TableResolution {
        resolve_table_formulas_with(raw, &mut self.diagnostics)
    }

    /// Findings accumulated since the last drain.
    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
