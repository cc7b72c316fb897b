use std::path::Path;

use borang_engine::Diagnostics;
use borang_model::FieldValue;

use crate::{fail, load_form_data, load_template, print_json, OutputFormat};

pub(crate) fn run(template_path: &Path, data_path: &Path, sets: &[String], output: OutputFormat) {
    let template = load_template(template_path, output);
    let mut data = load_form_data(data_path, output);

    for edit in sets {
        let (field_id, value) = parse_edit(edit, output);
        data.insert(field_id, value);
    }

    let mut diag = Diagnostics::new();
    let outcome = borang_engine::global::sync_global_formulas_with(&template, &data, &mut diag);

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "data": outcome.data,
            "passes": outcome.passes,
            "converged": outcome.converged,
            "diagnostics": diag.entries(),
        })),
        OutputFormat::Text => {
            for (field_id, value) in &outcome.data {
                println!(
                    "{} = {}",
                    field_id,
                    crate::commands::defaults::format_value(value)
                );
            }
            println!(
                "synchronized in {} pass(es){}",
                outcome.passes,
                if outcome.converged {
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

/// Parse a `field=value` edit. The value is tried as a JSON scalar first
/// (numbers, booleans, null, quoted strings), falling back to plain text.
fn parse_edit(edit: &str, output: OutputFormat) -> (String, FieldValue) {
    let Some((field_id, raw_value)) = edit.split_once('=') else {
        fail(
            &format!("invalid --set '{}', expected FIELD=VALUE", edit),
            output,
        );
    };
    let value = match serde_json::from_str::<FieldValue>(raw_value) {
        Ok(v) => v,
        Err(_) => FieldValue::Text(raw_value.to_string()),
    };
    (field_id.to_string(), value)
}
