//! # Template Merge Engine
//!
//! Placeholder extraction, merge-data validation, and textual substitution
//! over the `{{fieldName}}` wire syntax. Whitespace inside the braces is
//! trimmed; there is no escaping mechanism for a literal `{{`.
//!
//! Content is otherwise opaque. The one concession to structured payloads:
//! a JSON object with a string `"text"` property has that embedded text
//! scanned and merged in place, so templates whose content is produced by a
//! rich editor still merge correctly.

use crate::fields;
use crate::template::{value_to_string, FieldSchema, MergeData, Template};
use once_cell::sync::Lazy;
use regex::Regex;

pub use crate::fields::ValidationReport;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

/// How [`scannable_text`] classified a payload.
enum Payload<'a> {
    /// Plain text, scanned and merged whole.
    Plain(&'a str),
    /// JSON object with an embedded `"text"` string property.
    Embedded(serde_json::Map<String, serde_json::Value>, String),
    /// Structured but with no text we know how to read.
    Opaque,
}

fn classify(content: &str) -> Payload<'_> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with('{') || trimmed.starts_with("{{") {
        return Payload::Plain(content);
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("text") {
            Some(serde_json::Value::String(text)) => {
                let text = text.clone();
                Payload::Embedded(map, text)
            }
            _ => Payload::Opaque,
        },
        // Doesn't actually parse, so treat it as plain text after all
        _ => Payload::Plain(content),
    }
}

/// Scan content for `{{name}}` placeholders and return each distinct
/// trimmed name once, in first-seen order. Never errors: opaque payloads
/// yield an empty list.
pub fn extract_fields(content: &str) -> Vec<String> {
    let text = match classify(content) {
        Payload::Plain(t) => t.to_string(),
        Payload::Embedded(_, t) => t,
        Payload::Opaque => return Vec::new(),
    };

    let mut seen = Vec::new();
    for cap in PLACEHOLDER_RE.captures_iter(&text) {
        let name = cap[1].trim();
        if name.is_empty() {
            continue;
        }
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Replace every `{{key}}` occurrence with the string form of the value.
/// Unknown placeholders are left untouched; re-merging with the same data
/// is a no-op because no matching placeholders remain.
pub fn merge(content: &str, data: &MergeData) -> String {
    match classify(content) {
        Payload::Plain(text) => merge_text(text, data),
        Payload::Embedded(mut map, text) => {
            map.insert(
                "text".to_string(),
                serde_json::Value::String(merge_text(&text, data)),
            );
            serde_json::Value::Object(map).to_string()
        }
        Payload::Opaque => content.to_string(),
    }
}

fn merge_text(text: &str, data: &MergeData) -> String {
    let mut out = text.to_string();
    for (key, value) in data {
        // The key is matched literally; escape it before building the pattern
        let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(key));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        let replacement = value_to_string(value);
        out = re.replace_all(&out, regex::NoExpand(&replacement)).into_owned();
    }
    out
}

/// The fields a template actually merges against: its declared fields, or,
/// when it declares none, every extracted placeholder as optional text.
pub fn effective_fields(template: &Template) -> Vec<FieldSchema> {
    if template.merge_fields.is_empty() {
        extract_fields(&template.content)
            .into_iter()
            .map(|name| FieldSchema::text(&name))
            .collect()
    } else {
        template.merge_fields.clone()
    }
}

/// Validate merge data against a template's declared fields.
///
/// When the template declares no fields, every extracted placeholder is
/// treated as optional text (always satisfiable). A declared field that
/// carries no constraints of its own falls back to the library definition
/// of the same name when one exists. Errors accumulate across fields so a
/// caller can surface every problem at once.
pub fn validate(template: &Template, data: &MergeData) -> ValidationReport {
    let declared = effective_fields(template);

    let mut errors = Vec::new();
    for schema in &declared {
        let effective = if schema.is_unconstrained() {
            fields::field_by_name(&schema.name).unwrap_or(schema)
        } else {
            schema
        };
        let report = fields::validate(effective, data.get(&schema.name));
        errors.extend(report.errors);
    }

    if errors.is_empty() {
        ValidationReport::valid()
    } else {
        ValidationReport::invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FieldType, FieldValidation};
    use serde_json::json;

    fn data(pairs: &[(&str, serde_json::Value)]) -> MergeData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn extract_distinct_first_seen_order() {
        let fields = extract_fields("Hello {{Name}}, welcome to {{Company}}! Bye {{Name}}.");
        assert_eq!(fields, vec!["Name", "Company"]);
    }

    #[test]
    fn extract_trims_inner_whitespace() {
        let fields = extract_fields("{{ Name }} and {{\tCompany }}");
        assert_eq!(fields, vec!["Name", "Company"]);
    }

    #[test]
    fn extract_skips_empty_and_handles_no_placeholders() {
        assert!(extract_fields("{{}} {{  }}").is_empty());
        assert!(extract_fields("no placeholders here").is_empty());
        assert!(extract_fields("").is_empty());
    }

    #[test]
    fn extract_reads_embedded_text_property() {
        let content = r#"{"text": "Dear {{Name}}", "styles": [1, 2]}"#;
        assert_eq!(extract_fields(content), vec!["Name"]);
    }

    #[test]
    fn extract_opaque_json_yields_nothing() {
        let content = r#"{"blocks": ["{{Name}} is hidden in here"]}"#;
        assert!(extract_fields(content).is_empty());
    }

    #[test]
    fn extract_unparseable_braces_treated_as_text() {
        // Looks like JSON but isn't; scanned as plain text
        let content = "{ not json but {{Name}} appears }";
        assert_eq!(extract_fields(content), vec!["Name"]);
    }

    #[test]
    fn merge_replaces_all_occurrences() {
        let out = merge(
            "Dear {{Name}}, {{Name}} of {{Company}}",
            &data(&[("Name", json!("Alice")), ("Company", json!("Acme"))]),
        );
        assert_eq!(out, "Dear Alice, Alice of Acme");
    }

    #[test]
    fn merge_leaves_unknown_placeholders() {
        let out = merge("Dear {{Name}} of {{Company}}", &data(&[("Name", json!("Alice"))]));
        assert_eq!(out, "Dear Alice of {{Company}}");
    }

    #[test]
    fn merge_is_whitespace_tolerant() {
        let out = merge("Dear {{ Name }}", &data(&[("Name", json!("Alice"))]));
        assert_eq!(out, "Dear Alice");
    }

    #[test]
    fn merge_escapes_regex_special_keys() {
        let out = merge(
            "Total: {{Amount (USD)}}",
            &data(&[("Amount (USD)", json!("12.50"))]),
        );
        assert_eq!(out, "Total: 12.50");
    }

    #[test]
    fn merge_value_with_dollar_sign_is_literal() {
        let out = merge("Price {{P}}", &data(&[("P", json!("$1 and $2"))]));
        assert_eq!(out, "Price $1 and $2");
    }

    #[test]
    fn merge_null_becomes_empty_string() {
        let out = merge("X{{A}}Y", &data(&[("A", json!(null))]));
        assert_eq!(out, "XY");
    }

    #[test]
    fn merge_twice_with_same_data_is_noop() {
        let d = data(&[("Name", json!("Alice"))]);
        let once = merge("Dear {{Name}}", &d);
        let twice = merge(&once, &d);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_into_embedded_text_keeps_other_properties() {
        let content = r#"{"text": "Dear {{Name}}", "styles": [1]}"#;
        let out = merge(content, &data(&[("Name", json!("Alice"))]));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["text"], "Dear Alice");
        assert_eq!(parsed["styles"], json!([1]));
    }

    #[test]
    fn merge_opaque_payload_is_noop() {
        let content = r#"{"blocks": []}"#;
        assert_eq!(merge(content, &data(&[("Name", json!("Alice"))])), content);
    }

    #[test]
    fn effective_fields_extracts_when_none_declared() {
        let template = Template::new("T".into(), "Hi {{Name}} from {{Company}}".into());
        let fields = effective_fields(&template);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Company"]);
        assert!(fields.iter().all(|f| !f.required));
    }

    #[test]
    fn validate_collects_all_missing_required_fields() {
        let mut template = Template::new("T".into(), "{{A}} {{B}}".into());
        let mut a = FieldSchema::text("A");
        a.required = true;
        let mut b = FieldSchema::text("B");
        b.required = true;
        template.merge_fields = vec![a, b];

        let report = validate(&template, &MergeData::new());
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("'A'"));
        assert!(report.errors[1].contains("'B'"));
    }

    #[test]
    fn validate_applies_typed_checks() {
        let mut template = Template::new("T".into(), "{{Contact}}".into());
        let mut contact = FieldSchema::text("Contact");
        contact.field_type = FieldType::Email;
        template.merge_fields = vec![contact];

        let report = validate(&template, &data(&[("Contact", json!("nope"))]));
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("email"));
    }

    #[test]
    fn validate_no_declared_fields_treats_extracted_as_optional() {
        let template = Template::new("T".into(), "Hi {{Name}} from {{Company}}".into());
        let report = validate(&template, &MergeData::new());
        assert!(report.is_valid);
    }

    #[test]
    fn validate_unconstrained_field_falls_back_to_library() {
        // "Email" declared bare picks up the library's email type check
        let mut template = Template::new("T".into(), "{{Email}}".into());
        template.merge_fields = vec![FieldSchema::text("Email")];

        let report = validate(&template, &data(&[("Email", json!("not-an-email"))]));
        assert!(!report.is_valid);

        let report = validate(&template, &data(&[("Email", json!("a@example.com"))]));
        assert!(report.is_valid);
    }

    #[test]
    fn validate_constrained_field_does_not_fall_back() {
        // Author declared their own "Email" with a length rule only; the
        // library's address pattern must not apply
        let mut template = Template::new("T".into(), "{{Email}}".into());
        let mut email = FieldSchema::text("Email");
        email.validation = Some(FieldValidation {
            max_length: Some(50),
            ..Default::default()
        });
        template.merge_fields = vec![email];

        let report = validate(&template, &data(&[("Email", json!("not-an-email"))]));
        assert!(report.is_valid);
    }
}
