use std::path::Path;
use std::process;

use crate::{load_form_data, load_template, print_json, OutputFormat};

pub(crate) fn run(
    template_path: &Path,
    data_path: &Path,
    page: Option<&str>,
    output: OutputFormat,
) {
    let template = load_template(template_path, output);
    let data = load_form_data(data_path, output);

    let visible = borang_engine::visible_field_ids(&template, &data);
    let report = borang_engine::validate_scoped(&template, &data, &visible, page);

    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            if report.valid {
                match page {
                    Some(p) => println!("page '{}' is valid", p),
                    None => println!("form is valid"),
                }
            } else {
                println!("{} validation error(s):", report.errors.len());
                for (field_id, message) in &report.errors {
                    println!("  {}: {}", field_id, message);
                }
            }
        }
    }

    if !report.valid {
        process::exit(1);
    }
}
