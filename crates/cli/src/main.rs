mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Borang form rules engine toolchain.
#[derive(Parser)]
#[command(name = "borang", version, about = "Borang form rules engine toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the initial form data for a template
    Defaults {
        /// Path to the template JSON file
        template: PathBuf,
    },

    /// Resolve the currently visible field ids
    Visible {
        /// Path to the template JSON file
        template: PathBuf,
        /// Path to the form data JSON file
        #[arg(long)]
        data: PathBuf,
    },

    /// Validate form data against a template
    Validate {
        /// Path to the template JSON file
        template: PathBuf,
        /// Path to the form data JSON file
        #[arg(long)]
        data: PathBuf,
        /// Restrict validation to one page (wizard mode)
        #[arg(long)]
        page: Option<String>,
    },

    /// Resolve formula cells of an item-list table
    Table {
        /// Path to the raw table JSON file (array of rows)
        table: PathBuf,
    },

    /// Apply edits and recompute cross-field formulas
    Sync {
        /// Path to the template JSON file
        template: PathBuf,
        /// Path to the form data JSON file
        #[arg(long)]
        data: PathBuf,
        /// Edit to apply before the sync, as field=value (repeatable).
        /// The value is parsed as JSON when possible, else taken as text.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,
    },

    /// Check a template for authoring mistakes
    Lint {
        /// Path to the template JSON file
        template: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Defaults { template } => commands::defaults::run(&template, cli.output),
        Commands::Visible { template, data } => commands::visible::run(&template, &data, cli.output),
        Commands::Validate {
            template,
            data,
            page,
        } => commands::validate::run(&template, &data, page.as_deref(), cli.output),
        Commands::Table { table } => commands::table::run(&table, cli.output),
        Commands::Sync {
            template,
            data,
            sets,
        } => commands::sync::run(&template, &data, &sets, cli.output),
        Commands::Lint { template } => commands::lint::run(&template, cli.output),
    }
}

/// Report an error in the selected format and exit 1.
pub(crate) fn fail(message: &str, output: OutputFormat) -> ! {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&err_json).unwrap_or_default()
            );
        }
        OutputFormat::Text => eprintln!("error: {}", message),
    }
    process::exit(1);
}

/// Read and parse a JSON file, exiting on failure.
pub(crate) fn read_json(path: &Path, output: OutputFormat) -> serde_json::Value {
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => fail(&format!("file not found: {}", path.display()), output),
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => fail(
            &format!("invalid JSON in {}: {}", path.display(), e),
            output,
        ),
    }
}

/// Load and deserialize a template file, exiting on failure.
pub(crate) fn load_template(path: &Path, output: OutputFormat) -> borang_model::FormTemplate {
    let doc = read_json(path, output);
    match borang_model::from_template_json(&doc) {
        Ok(t) => t,
        Err(e) => fail(&format!("{}: {}", path.display(), e), output),
    }
}

/// Load and deserialize a form data file, exiting on failure.
pub(crate) fn load_form_data(path: &Path, output: OutputFormat) -> borang_model::FormData {
    let doc = read_json(path, output);
    match borang_model::form_data_from_json(&doc) {
        Ok(d) => d,
        Err(e) => fail(&format!("{}: {}", path.display(), e), output),
    }
}

/// Print a serializable value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}
