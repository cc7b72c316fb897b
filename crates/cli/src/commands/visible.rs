use std::path::Path;

use crate::{load_form_data, load_template, print_json, OutputFormat};

pub(crate) fn run(template_path: &Path, data_path: &Path, output: OutputFormat) {
    let template = load_template(template_path, output);
    let data = load_form_data(data_path, output);
    let visible = borang_engine::visible_field_ids(&template, &data);

    match output {
        OutputFormat::Json => print_json(&visible),
        OutputFormat::Text => {
            println!("{} visible field(s):", visible.len());
            for field_id in &visible {
                println!("  {}", field_id);
            }
        }
    }
}
