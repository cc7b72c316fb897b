use std::path::Path;
use std::process;

use crate::{load_template, print_json, OutputFormat};

pub(crate) fn run(template_path: &Path, output: OutputFormat) {
    let template = load_template(template_path, output);
    let findings = borang_model::lint_template(&template);

    match output {
        OutputFormat::Json => print_json(&findings),
        OutputFormat::Text => {
            if findings.is_empty() {
                println!("no findings");
            } else {
                println!("{} finding(s):", findings.len());
                for finding in &findings {
                    println!("  [{}] {}", finding.location, finding.message);
                }
            }
        }
    }

    if !findings.is_empty() {
        process::exit(1);
    }
}
