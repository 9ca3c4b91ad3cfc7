use crate::model::RecordsManagement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Field name → scalar value supplied at merge time. Never persisted; it is
/// consumed to produce merged content.
pub type MergeData = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    #[serde(rename = "textarea")]
    TextArea,
    Email,
    Number,
    Date,
    Dropdown,
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the string form must match. A pattern that fails
    /// to compile degrades to no constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Declaration of one merge field, used both by the standard library catalog
/// and by template authors. `name` is the placeholder key and is matched
/// case-sensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FieldSchema {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category: String::new(),
            field_type: FieldType::Text,
            required: false,
            validation: None,
            options: Vec::new(),
            default_value: None,
        }
    }

    /// True when the schema declares nothing beyond its name, i.e. a bare
    /// placeholder a template author listed without constraining it.
    pub fn is_unconstrained(&self) -> bool {
        self.field_type == FieldType::Text
            && !self.required
            && self.validation.is_none()
            && self.options.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub document_type: String,
    pub content: String,
    #[serde(default)]
    pub merge_fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_management: Option<RecordsManagement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(name: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            category: String::new(),
            document_type: String::new(),
            content,
            merge_fields: Vec::new(),
            records_management: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// String form of a merge value: strings pass through unquoted, null becomes
/// the empty string, scalars use their display form, anything nested falls
/// back to compact JSON.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
