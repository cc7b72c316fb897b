//! Cross-field formula synchronization.
//!
//! Template fields may carry a formula over other field ids (e.g. a net
//! tax line computed from gross income and deductions). After every edit
//! the engine re-derives those fields against the current data snapshot,
//! writing a result back only when it differs from the stored value so
//! the host's change detection stays quiet on no-op recomputes.
//!
//! Passes repeat until one is clean. The original relied on the host
//! re-triggering its watcher to reach the fixed point, which loops
//! forever when two formulas reference each other; here the loop is
//! explicit and bounded like the table engine's.

use borang_model::{FieldValue, FormData, FormTemplate};
use rust_decimal::Decimal;

use crate::diag::{DiagnosticCode, Diagnostics};
use crate::expr;
use crate::MAX_PASSES;

/// Outcome of one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The data snapshot with derived fields recomputed.
    pub data: FormData,
    /// Full passes executed, including the final clean pass.
    pub passes: u32,
    /// False when the pass bound was exhausted with fields still changing
    /// (a formula cycle).
    pub converged: bool,
}

/// Recompute every formula-bearing field, discarding findings.
pub fn sync_global_formulas(template: &FormTemplate, form_data: &FormData) -> SyncOutcome {
    sync_global_formulas_with(template, form_data, &mut Diagnostics::new())
}

/// Recompute every formula-bearing field, recording findings.
pub fn sync_global_formulas_with(
    template: &FormTemplate,
    form_data: &FormData,
    diag: &mut Diagnostics,
) -> SyncOutcome {
    let mut data = form_data.clone();
    let mut passes = 0u32;
    let mut converged = false;

    while passes < MAX_PASSES {
        passes += 1;
        let mut changed = false;

        for field in template.all_fields() {
            let Some(ref formula) = field.formula else {
                continue;
            };

            let resolve = |id: &str| {
                data.get(id)
                    .map(FieldValue::to_decimal_or_zero)
                    .unwrap_or(Decimal::ZERO)
            };
            let computed = match expr::evaluate(formula, &resolve) {
                Ok(d) => d,
                Err(err) => {
                    // The field keeps its prior value; a broken formula
                    // must not wipe user-visible amounts.
                    diag.warn_field(
                        DiagnosticCode::FormulaError,
                        field.id.clone(),
                        format!("formula '{}' failed: {}", formula, err),
                    );
                    continue;
                }
            };

            let next = FieldValue::Number(computed);
            if data.get(&field.id) != Some(&next) {
                data.insert(field.id.clone(), next);
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }
    }

    if !converged {
        diag.warn(
            DiagnosticCode::PassBoundExceeded,
            format!(
                "global formulas did not stabilize within {} passes; formulas likely form a cycle",
                MAX_PASSES
            ),
        );
    }

    SyncOutcome {
        data,
        passes,
        converged,
    }
}

/// Apply one external edit, then synchronize derived fields.
///
/// This is the host's re-entry point after each field change. One edit
/// completes -- including its formula cascade -- before the next is
/// accepted, because the call consumes a snapshot and returns the next.
pub fn on_field_changed(
    template: &FormTemplate,
    form_data: &FormData,
    field_id: &str,
    value: FieldValue,
) -> SyncOutcome {
    on_field_changed_with(template, form_data, field_id, value, &mut Diagnostics::new())
}

/// [`on_field_changed`] with finding collection.
pub fn on_field_changed_with(
    template: &FormTemplate,
    form_data: &FormData,
    field_id: &str,
    value: FieldValue,
    diag: &mut Diagnostics,
) -> SyncOutcome {
    let mut data = form_data.clone();
    data.insert(field_id.to_string(), value);
    sync_global_formulas_with(template, &data, diag)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
