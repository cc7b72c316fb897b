//! Table formula resolution over item-list schedules.
//!
//! A raw table is the source of truth: literal cells plus immutable
//! `{ "formula": ... }` descriptors. Resolution derives a display copy
//! where every descriptor is replaced by its computed value, iterating
//! full passes until no cell changes or the pass bound is hit. Blind
//! fixed-point iteration handles chained and mutually-dependent formulas
//! (a running total feeding another column) without building a
//! dependency graph; the bound caps the cost when they never stabilize.
//!
//! The raw table is never mutated, so resolution is idempotent for a
//! given input.

use borang_model::{CellValue, FieldValue, TableData};
use rust_decimal::Decimal;

use crate::diag::{DiagnosticCode, Diagnostics};
use crate::expr;
use crate::MAX_PASSES;

/// How a formula string is computed, dispatched by exact inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    /// `SUM(ABOVE)`: sum of the same column over all rows strictly above.
    SumAbove,
    /// Anything else: an arithmetic expression over `{colId}` placeholders
    /// resolved from the same row.
    IntraRow,
}

impl FormulaKind {
    pub fn classify(formula: &str) -> FormulaKind {
        if formula.trim() == "SUM(ABOVE)" {
            FormulaKind::SumAbove
        } else {
            FormulaKind::IntraRow
        }
    }
}

/// Outcome of one table resolution.
#[derive(Debug, Clone)]
pub struct TableResolution {
    /// The derived display table: all formula cells replaced by computed
    /// values (or Null where the formula failed).
    pub display: TableData,
    /// Full passes executed, including the final clean pass.
    pub passes: u32,
    /// False when the pass bound was exhausted with cells still changing.
    pub converged: bool,
}

/// Resolve all formula cells of a raw table, discarding findings.
pub fn resolve_table_formulas(raw: &TableData) -> TableResolution {
    resolve_table_formulas_with(raw, &mut Diagnostics::new())
}

/// Resolve all formula cells, recording findings in the collector.
pub fn resolve_table_formulas_with(raw: &TableData, diag: &mut Diagnostics) -> TableResolution {
    // Display copy starts with formula cells unresolved (Null); literal
    // cells are carried over verbatim and never touched again.
    let mut display: TableData = raw
        .iter()
        .map(|row| {
            row.iter()
                .map(|(col, cell)| {
                    let initial = match cell {
                        CellValue::Formula(_) => CellValue::Literal(FieldValue::Null),
                        CellValue::Literal(v) => CellValue::Literal(v.clone()),
                    };
                    (col.clone(), initial)
                })
                .collect()
        })
        .collect();

    let mut passes = 0u32;
    let mut converged = false;

    while passes < MAX_PASSES {
        passes += 1;
        let mut changed = false;

        for row_idx in 0..raw.len() {
            // Column ids snapshot; BTreeMap iteration keeps this stable.
            let cols: Vec<String> = raw[row_idx].keys().cloned().collect();
            for col in cols {
                let Some(CellValue::Formula(descriptor)) = raw[row_idx].get(&col) else {
                    continue;
                };

                let computed = compute_cell(&descriptor.formula, &display, row_idx, &col);
                let next = match computed {
                    Ok(value) => FieldValue::Number(value),
                    Err(err) => {
                        diag.warn_field(
                            DiagnosticCode::FormulaError,
                            format!("row {} col {}", row_idx, col),
                            format!("formula '{}' failed: {}", descriptor.formula, err),
                        );
                        FieldValue::Null
                    }
                };

                let current = display[row_idx]
                    .get(&col)
                    .map(CellValue::as_literal)
                    .cloned()
                    .unwrap_or(FieldValue::Null);
                if current != next {
                    display[row_idx].insert(col.clone(), CellValue::Literal(next));
                    changed = true;
                }
            }
        }

        if !changed {
            converged = true;
            break;
        }
    }

    if !converged {
        diag.warn(
            DiagnosticCode::ConvergenceExceeded,
            format!(
                "table formulas did not stabilize within {} passes; returning last computed values",
                MAX_PASSES
            ),
        );
    }

    TableResolution {
        display,
        passes,
        converged,
    }
}

fn compute_cell(
    formula: &str,
    display: &TableData,
    row_idx: usize,
    col: &str,
) -> Result<Decimal, expr::ExprError> {
    match FormulaKind::classify(formula) {
        FormulaKind::SumAbove => {
            let mut sum = Decimal::ZERO;
            for row in display.iter().take(row_idx) {
                if let Some(cell) = row.get(col) {
                    sum = sum
                        .checked_add(cell.to_decimal_or_zero())
                        .ok_or(expr::ExprError::Overflow)?;
                }
            }
            Ok(sum)
        }
        FormulaKind::IntraRow => {
            let row = &display[row_idx];
            let resolve = |id: &str| {
                row.get(id)
                    .map(CellValue::to_decimal_or_zero)
                    .unwrap_or(Decimal::ZERO)
            };
            expr::evaluate(formula, &resolve)
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use borang_model::table_from_json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cell_number(resolution: &TableResolution, row: usize, col: &str) -> Decimal {
        match resolution.display[row].get(col) {
            Some(CellValue::Literal(FieldValue::Number(d))) => *d,
            other => panic!("expected numeric cell at row {} col {}, got {:?}", row, col, other),
        }
    }

    #[test]
    fn intra_row_product() {
        let raw = table_from_json(&serde_json::json!([
            { "price": 10, "qty": 5, "amount": { "formula": "{price}*{qty}" } }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert_eq!(cell_number(&resolution, 0, "amount"), dec("50"));
        assert!(resolution.converged);
    }

    #[test]
    fn sum_above_sums_strictly_above() {
        let raw = table_from_json(&serde_json::json!([
            { "amount": 10 },
            { "amount": 20 },
            { "amount": { "formula": "SUM(ABOVE)" } }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert_eq!(cell_number(&resolution, 2, "amount"), dec("30"));
    }

    #[test]
    fn sum_above_at_first_row_is_zero() {
        let raw = table_from_json(&serde_json::json!([
            { "amount": { "formula": "SUM(ABOVE)" } },
            { "amount": 10 }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert_eq!(cell_number(&resolution, 0, "amount"), dec("0"));
    }

    #[test]
    fn formula_free_table_converges_in_one_pass() {
        let raw = table_from_json(&serde_json::json!([
            { "desc": "Machinery", "amount": 120000 },
            { "desc": "Vehicles", "amount": 45000 }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert_eq!(resolution.passes, 1);
        assert!(resolution.converged);
        // Literal cells are carried over verbatim
        assert_eq!(
            resolution.display[0].get("desc"),
            Some(&CellValue::Literal(FieldValue::Text("Machinery".to_string())))
        );
    }

    #[test]
    fn chained_formulas_reach_fixed_point() {
        // amount depends on price*qty; total sums amounts above it.
        let raw = table_from_json(&serde_json::json!([
            { "price": 10, "qty": 2, "amount": { "formula": "{price}*{qty}" } },
            { "price": 7,  "qty": 3, "amount": { "formula": "{price}*{qty}" } },
            { "amount": { "formula": "SUM(ABOVE)" } }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert!(resolution.converged);
        assert_eq!(cell_number(&resolution, 0, "amount"), dec("20"));
        assert_eq!(cell_number(&resolution, 1, "amount"), dec("21"));
        assert_eq!(cell_number(&resolution, 2, "amount"), dec("41"));
    }

    #[test]
    fn raw_table_is_never_mutated() {
        let raw = table_from_json(&serde_json::json!([
            { "price": 10, "qty": 5, "amount": { "formula": "{price}*{qty}" } }
        ]))
        .unwrap();
        let before = raw.clone();
        let first = resolve_table_formulas(&raw);
        assert_eq!(raw, before);
        // Idempotent: resolving the same raw input again matches
        let second = resolve_table_formulas(&raw);
        assert_eq!(first.display, second.display);
    }

    #[test]
    fn malformed_formula_leaves_cell_null_and_warns() {
        let raw = table_from_json(&serde_json::json!([
            { "a": 1, "bad": { "formula": "{a} +" }, "good": { "formula": "{a} + 1" } }
        ]))
        .unwrap();
        let mut diag = Diagnostics::new();
        let resolution = resolve_table_formulas_with(&raw, &mut diag);

        assert_eq!(
            resolution.display[0].get("bad"),
            Some(&CellValue::Literal(FieldValue::Null))
        );
        // The failing cell does not poison the rest of the pass
        assert_eq!(cell_number(&resolution, 0, "good"), dec("2"));
        assert!(resolution.converged);
        assert!(diag
            .entries()
            .iter()
            .any(|d| d.code == DiagnosticCode::FormulaError));
    }

    #[test]
    fn division_by_zero_is_recovered_per_cell() {
        let raw = table_from_json(&serde_json::json!([
            { "n": 5, "d": 0, "ratio": { "formula": "{n}/{d}" } }
        ]))
        .unwrap();
        let mut diag = Diagnostics::new();
        let resolution = resolve_table_formulas_with(&raw, &mut diag);
        assert_eq!(
            resolution.display[0].get("ratio"),
            Some(&CellValue::Literal(FieldValue::Null))
        );
        assert!(!diag.is_empty());
    }

    #[test]
    fn non_numeric_operands_coerce_to_zero() {
        let raw = table_from_json(&serde_json::json!([
            { "desc": "text row", "qty": null, "amount": { "formula": "{desc} + {qty} + 8" } }
        ]))
        .unwrap();
        let resolution = resolve_table_formulas(&raw);
        assert_eq!(cell_number(&resolution, 0, "amount"), dec("8"));
    }

    #[test]
    fn mutually_dependent_growth_exhausts_pass_bound() {
        // b = a + 1 and a = b + 1 never stabilize; the engine must stop at
        // the bound and surface it rather than loop.
        let raw = table_from_json(&serde_json::json!([
            { "a": { "formula": "{b} + 1" }, "b": { "formula": "{a} + 1" } }
        ]))
        .unwrap();
        let mut diag = Diagnostics::new();
        let resolution = resolve_table_formulas_with(&raw, &mut diag);
        assert_eq!(resolution.passes, MAX_PASSES);
        assert!(!resolution.converged);
        assert!(diag
            .entries()
            .iter()
            .any(|d| d.code == DiagnosticCode::ConvergenceExceeded));
    }
}
