use std::path::Path;

use crate::{load_template, print_json, OutputFormat};

pub(crate) fn run(template_path: &Path, output: OutputFormat) {
    let template = load_template(template_path, output);
    let data = borang_engine::generate_defaults(&template);

    match output {
        OutputFormat::Json => print_json(&data),
        OutputFormat::Text => {
            if data.is_empty() {
                println!("no value-bearing fields");
                return;
            }
            for (field_id, value) in &data {
                println!("{} = {}", field_id, format_value(value));
            }
        }
    }
}

pub(crate) fn format_value(value: &borang_model::FieldValue) -> String {
    match value {
        borang_model::FieldValue::Text(s) => format!("\"{}\"", s),
        borang_model::FieldValue::Number(d) => format!("{}", d),
        borang_model::FieldValue::Bool(b) => format!("{}", b),
        borang_model::FieldValue::Null => "null".to_string(),
    }
}
