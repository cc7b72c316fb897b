use std::path::Path;

use borang_engine::Diagnostics;
use borang_model::table_from_json;

use crate::commands::defaults::format_value;
use crate::{fail, print_json, read_json, OutputFormat};

pub(crate) fn run(table_path: &Path, output: OutputFormat) {
    let doc = read_json(table_path, output);
    let raw = match table_from_json(&doc) {
        Ok(t) => t,
        Err(e) => fail(&format!("{}: {}", table_path.display(), e), output),
    };

    let mut diag = Diagnostics::new();
    let resolution = borang_engine::table::resolve_table_formulas_with(&raw, &mut diag);

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "display": resolution.display,
            "passes": resolution.passes,
            "converged": resolution.converged,
            "diagnostics": diag.entries(),
        })),
        OutputFormat::Text => {
            for (idx, row) in resolution.display.iter().enumerate() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|(col, cell)| format!("{}={}", col, format_value(cell.as_literal())))
                    .collect();
                println!("row {}: {}", idx, cells.join(", "));
            }
            println!(
                "resolved in {} pass(es){}",
                resolution.passes,
                if resolution.converged {
                    ""
                } else {
                    " (did not converge)"
                }
            );
            for finding in diag.entries() {
                println!("warning: {}", finding.message);
            }
        }
    }
}
