//! borang-model: Shared form template JSON model and deserialization.
//!
//! Provides typed structs for the template hierarchy (FormTemplate ->
//! FormTemplatePage -> FormTemplateSection -> FormTemplateField), the
//! ShowIf condition tree, the runtime FieldValue scalar, and the tabular
//! TableData/CellValue types used by item-list schedules.
//!
//! borang-engine and borang-cli both consume this crate for initial JSON
//! parsing, then operate on the typed representations. Authoring mistakes
//! inside a well-formed template (duplicate ids, dangling references) are
//! surfaced by `lint_template` as findings, never as hard errors.

pub mod deserialize;
pub mod lint;
pub mod types;

pub use deserialize::{form_data_from_json, from_template_json, table_from_json, TemplateError};
pub use lint::{lint_template, LintCode, LintFinding, LintSeverity};
pub use types::{
    CellValue, FieldValue, FormData, FormTemplate, FormTemplateField, FormTemplatePage,
    FormTemplateSection, FormulaDescriptor, InputType, RowData, ShowIf, TableData,
};
