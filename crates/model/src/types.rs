//! Typed structs representing the form template JSON schema.
//!
//! Wire names follow the template format exactly: `yearOfAssessment`,
//! `inputType`, `itemStructure`, `fieldId` are camelCase; `show_if` is
//! snake_case. All numeric values use `rust_decimal::Decimal` -- never
//! `f64` -- so formula arithmetic over tax amounts stays exact.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Form data: field id -> current value. A field absent from the map is
/// *unset*, which is distinct from an explicit `FieldValue::Null`.
pub type FormData = BTreeMap<String, FieldValue>;

/// One table row: column id -> cell.
pub type RowData = BTreeMap<String, CellValue>;

/// An ordered item-list / schedule table.
pub type TableData = Vec<RowData>;

// ──────────────────────────────────────────────
// Scalar values
// ──────────────────────────────────────────────

/// A scalar form value as stored in `FormData` and in literal table cells.
///
/// Comparison is strict: no cross-type coercion. `Text("1")` never equals
/// `Number(1)`, and `Null` only equals `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Returns a human-readable type name for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "Text",
            FieldValue::Number(_) => "Number",
            FieldValue::Bool(_) => "Bool",
            FieldValue::Null => "Null",
        }
    }

    /// True for the values validation treats as "empty": `Null` and `""`.
    pub fn is_empty_value(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion with a zero default, matching the formula engines'
    /// input rule: numbers pass through, numeric-looking text parses, and
    /// everything else (bools, empty text, null) coerces to zero.
    pub fn to_decimal_or_zero(&self) -> Decimal {
        match self {
            FieldValue::Number(d) => *d,
            FieldValue::Text(s) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            // Decimal's serde representation is a string, preserving exact
            // amounts across round-trips.
            FieldValue::Number(d) => Serialize::serialize(d, serializer),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
        }
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean, or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Decimal::try_from(v)
            .map(FieldValue::Number)
            .map_err(|_| E::custom(format!("number {} not representable as decimal", v)))
    }

    // Strings stay Text even when numeric-looking; coercion is the formula
    // engines' decision, not the model's.
    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<FieldValue, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

// ──────────────────────────────────────────────
// Condition tree
// ──────────────────────────────────────────────

/// A visibility condition gating a page, section, or field.
///
/// One struct covers both wire shapes: a leaf comparison
/// `{ "fieldId": ..., "operator": "equals" | "not_equals", "value": ... }`
/// and a composite `{ "operator": "and" | "or", "conditions": [...] }`.
/// The operator stays a plain string -- an unrecognized operator is a
/// runtime fail-open decision, not a deserialization failure. The tree is
/// acyclic by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowIf {
    #[serde(
        default,
        rename = "fieldId",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_id: Option<String>,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ShowIf>>,
}

impl ShowIf {
    /// Leaf comparison against a field.
    pub fn leaf(field_id: &str, operator: &str, value: FieldValue) -> Self {
        ShowIf {
            field_id: Some(field_id.to_string()),
            operator: operator.to_string(),
            value: Some(value),
            conditions: None,
        }
    }

    /// Composite `and`/`or` over child conditions.
    pub fn composite(operator: &str, conditions: Vec<ShowIf>) -> Self {
        ShowIf {
            field_id: None,
            operator: operator.to_string(),
            value: None,
            conditions: Some(conditions),
        }
    }
}

// ──────────────────────────────────────────────
// Template hierarchy
// ──────────────────────────────────────────────

/// Field input types, closed set with exact wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "radio")]
    Radio,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "readonly_note")]
    ReadonlyNote,
    #[serde(rename = "countries")]
    Countries,
    #[serde(rename = "states")]
    States,
    #[serde(rename = "itemList")]
    ItemList,
    #[serde(rename = "lookup")]
    Lookup,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplateField {
    /// Unique across the whole template.
    pub id: String,
    pub label: String,
    #[serde(rename = "inputType")]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    /// Cross-field arithmetic formula over field ids, e.g.
    /// `"{gross_income} - {allowable_deductions}"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Column layout for `itemList` fields. Kept as raw JSON: the engine
    /// operates on uploaded TableData, not on the declared structure.
    #[serde(
        default,
        rename = "itemStructure",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_structure: Option<serde_json::Value>,
}

impl FormTemplateField {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// A titled section within a page (e.g. "Part B: Statutory income").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplateSection {
    pub part: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    pub fields: Vec<FormTemplateField>,
}

/// One wizard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplatePage {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    pub sections: Vec<FormTemplateSection>,
}

/// A complete form template (Form C, CP204, generic forms).
///
/// Loaded once per editing session and read-only thereafter; all engine
/// operations are pure functions over `(template, form_data)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "yearOfAssessment")]
    pub year_of_assessment: String,
    pub pages: Vec<FormTemplatePage>,
}

impl FormTemplate {
    /// Iterate every field in declaration order, across all pages and
    /// sections, ignoring visibility.
    pub fn all_fields(&self) -> impl Iterator<Item = &FormTemplateField> {
        self.pages
            .iter()
            .flat_map(|p| p.sections.iter())
            .flat_map(|s| s.fields.iter())
    }

    /// Look up a page by id.
    pub fn find_page(&self, page_id: &str) -> Option<&FormTemplatePage> {
        self.pages.iter().find(|p| p.id == page_id)
    }
}

// ──────────────────────────────────────────────
// Table cells
// ──────────────────────────────────────────────

/// Marker distinguishing a computed table cell from a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaDescriptor {
    pub formula: String,
}

/// One table cell: either a literal scalar or a formula descriptor.
///
/// The raw table (source of truth) keeps descriptors in place across every
/// recompute; only the derived display copy carries computed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Formula(FormulaDescriptor),
    Literal(FieldValue),
}

impl CellValue {
    /// The literal scalar, treating an unresolved formula cell as `Null`.
    pub fn as_literal(&self) -> &FieldValue {
        match self {
            CellValue::Literal(v) => v,
            CellValue::Formula(_) => &FieldValue::Null,
        }
    }

    /// Numeric coercion with the zero-default rule; formula descriptors
    /// count as zero until resolved.
    pub fn to_decimal_or_zero(&self) -> Decimal {
        self.as_literal().to_decimal_or_zero()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
