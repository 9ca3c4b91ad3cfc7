//! # Merge Field Library
//!
//! Process-wide catalog of standard merge field definitions, grouped by
//! category, plus the single-field validator shared with the merge engine.
//!
//! The catalog is loaded once behind a [`Lazy`] and exposed through read-only
//! lookups; no mutation path exists after initialization. Templates may
//! declare their own [`FieldSchema`]s, but an author who lists a bare field
//! name gets the library definition of that name applied at validation time.

use crate::template::{value_to_string, FieldSchema, FieldType, FieldValidation};
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Outcome of validating one value against one schema. Never an `Err`:
/// malformed schemas degrade to "no additional constraint".
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

fn field(
    name: &str,
    description: &str,
    category: &str,
    field_type: FieldType,
    required: bool,
    validation: Option<FieldValidation>,
) -> FieldSchema {
    FieldSchema {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        field_type,
        required,
        validation,
        options: Vec::new(),
        default_value: None,
    }
}

fn length(min: usize, max: usize) -> Option<FieldValidation> {
    Some(FieldValidation {
        min_length: Some(min),
        max_length: Some(max),
        ..Default::default()
    })
}

static STANDARD_FIELDS: Lazy<Vec<FieldSchema>> = Lazy::new(|| {
    use FieldType::*;

    let mut fields = vec![
        field("FirstName", "Given name", "personal", Text, false, length(1, 100)),
        field("LastName", "Family name", "personal", Text, false, length(1, 100)),
        field("FullName", "Full display name", "personal", Text, false, length(1, 200)),
        field("Email", "Email address", "personal", Email, false, None),
        field(
            "Phone",
            "Phone number",
            "personal",
            Text,
            false,
            Some(FieldValidation {
                pattern: Some(r"^[0-9+()\s.-]{7,20}$".to_string()),
                ..Default::default()
            }),
        ),
        field("JobTitle", "Position or role", "personal", Text, false, length(1, 150)),
        field("CompanyName", "Legal company name", "company", Text, false, length(1, 200)),
        field("Department", "Department or unit", "company", Text, false, length(1, 150)),
        field("CompanyAddress", "Postal address", "company", TextArea, false, length(1, 500)),
        field(
            "CompanyPhone",
            "Company switchboard",
            "company",
            Text,
            false,
            Some(FieldValidation {
                pattern: Some(r"^[0-9+()\s.-]{7,20}$".to_string()),
                ..Default::default()
            }),
        ),
        field("CurrentDate", "Date the document is produced", "dates", Date, false, None),
        field("EffectiveDate", "Date the document takes effect", "dates", Date, false, None),
        field("ExpirationDate", "Date the document expires", "dates", Date, false, None),
        field("DocumentTitle", "Title of the document", "document", Text, false, length(1, 300)),
        field("ReferenceNumber", "External reference", "document", Text, false, length(1, 50)),
        field("Notes", "Free-form notes", "document", TextArea, false, length(0, 2000)),
    ];

    let mut classification = field(
        "Classification",
        "Sensitivity classification",
        "document",
        Dropdown,
        false,
        None,
    );
    classification.options = vec![
        "Public".to_string(),
        "Internal".to_string(),
        "Confidential".to_string(),
        "Restricted".to_string(),
    ];
    classification.default_value = Some("Internal".to_string());
    fields.push(classification);

    fields
});

pub fn all_fields() -> &'static [FieldSchema] {
    &STANDARD_FIELDS
}

pub fn fields_by_category(category: &str) -> Vec<&'static FieldSchema> {
    STANDARD_FIELDS
        .iter()
        .filter(|f| f.category.eq_ignore_ascii_case(category))
        .collect()
}

/// Case-sensitive lookup: field names are placeholder keys.
pub fn field_by_name(name: &str) -> Option<&'static FieldSchema> {
    STANDARD_FIELDS.iter().find(|f| f.name == name)
}

pub fn categories() -> Vec<&'static str> {
    let mut cats: Vec<&str> = Vec::new();
    for f in STANDARD_FIELDS.iter() {
        if !cats.contains(&f.category.as_str()) {
            cats.push(&f.category);
        }
    }
    cats
}

pub fn search(term: &str) -> Vec<&'static FieldSchema> {
    let term = term.to_lowercase();
    STANDARD_FIELDS
        .iter()
        .filter(|f| {
            f.name.to_lowercase().contains(&term)
                || f.description.to_lowercase().contains(&term)
                || f.category.to_lowercase().contains(&term)
        })
        .collect()
}

/// Validate one value against one schema.
///
/// Check order, short-circuiting between classes:
/// 1. required + empty → single error
/// 2. empty + optional → valid, nothing else applies
/// 3. type check (email/number/date)
/// 4. generic string constraints (min/max length, pattern), accumulated
pub fn validate(schema: &FieldSchema, value: Option<&serde_json::Value>) -> ValidationReport {
    let text = value.map(value_to_string).unwrap_or_default();
    let is_blank = text.trim().is_empty();

    if schema.required && is_blank {
        return ValidationReport::invalid(vec![format!(
            "Required field '{}' is missing or empty",
            schema.name
        )]);
    }
    if is_blank {
        return ValidationReport::valid();
    }

    let mut errors = Vec::new();

    match schema.field_type {
        FieldType::Email => {
            if !EMAIL_RE.is_match(text.trim()) {
                errors.push(format!(
                    "Field '{}' must be a valid email address",
                    schema.name
                ));
            }
        }
        FieldType::Number => match text.trim().parse::<f64>() {
            Ok(n) => {
                if let Some(v) = &schema.validation {
                    if let Some(min) = v.min {
                        if n < min {
                            errors.push(format!(
                                "Field '{}' must be at least {}",
                                schema.name, min
                            ));
                        }
                    }
                    if let Some(max) = v.max {
                        if n > max {
                            errors.push(format!(
                                "Field '{}' must be at most {}",
                                schema.name, max
                            ));
                        }
                    }
                }
            }
            Err(_) => {
                errors.push(format!("Field '{}' must be a number", schema.name));
            }
        },
        FieldType::Date => {
            if !is_parseable_date(text.trim()) {
                errors.push(format!("Field '{}' must be a valid date", schema.name));
            }
        }
        FieldType::Text | FieldType::TextArea | FieldType::Dropdown => {}
    }

    if let Some(v) = &schema.validation {
        if let Some(min_len) = v.min_length {
            if text.chars().count() < min_len {
                errors.push(format!(
                    "Field '{}' must be at least {} characters",
                    schema.name, min_len
                ));
            }
        }
        if let Some(max_len) = v.max_length {
            if text.chars().count() > max_len {
                errors.push(format!(
                    "Field '{}' must be at most {} characters",
                    schema.name, max_len
                ));
            }
        }
        if let Some(pattern) = &v.pattern {
            // Uncompilable patterns degrade to no constraint
            if let Ok(re) = Regex::new(pattern) {
                if !re.is_match(&text) {
                    errors.push(format!(
                        "Field '{}' does not match the expected format",
                        schema.name
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        ValidationReport::valid()
    } else {
        ValidationReport::invalid(errors)
    }
}

fn is_parseable_date(s: &str) -> bool {
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"] {
        if NaiveDate::parse_from_str(s, fmt).is_ok() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_has_expected_categories() {
        assert_eq!(categories(), vec!["personal", "company", "dates", "document"]);
        assert!(!fields_by_category("Personal").is_empty());
        assert!(fields_by_category("nope").is_empty());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(field_by_name("FirstName").is_some());
        assert!(field_by_name("firstname").is_none());
    }

    #[test]
    fn search_matches_name_description_category() {
        assert!(!search("email").is_empty());
        assert!(!search("switchboard").is_empty());
        assert!(search("dates").len() >= 3);
        assert!(search("zzzz").is_empty());
    }

    #[test]
    fn required_and_blank_short_circuits() {
        let mut schema = FieldSchema::text("Name");
        schema.required = true;
        schema.validation = Some(FieldValidation {
            min_length: Some(5),
            ..Default::default()
        });

        let report = validate(&schema, Some(&json!("   ")));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0], "Required field 'Name' is missing or empty");

        let report = validate(&schema, None);
        assert!(!report.is_valid);
    }

    #[test]
    fn optional_and_blank_is_valid() {
        let mut schema = FieldSchema::text("Notes");
        schema.field_type = FieldType::Email;
        let report = validate(&schema, Some(&json!("")));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn email_validation() {
        let schema = field_by_name("Email").unwrap();
        assert!(validate(schema, Some(&json!("a@example.com"))).is_valid);
        assert!(!validate(schema, Some(&json!("not-an-email"))).is_valid);
        assert!(!validate(schema, Some(&json!("a@b"))).is_valid);
    }

    #[test]
    fn number_validation_with_range() {
        let mut schema = FieldSchema::text("Amount");
        schema.field_type = FieldType::Number;
        schema.validation = Some(FieldValidation {
            min: Some(1.0),
            max: Some(100.0),
            ..Default::default()
        });

        assert!(validate(&schema, Some(&json!("42"))).is_valid);
        assert!(validate(&schema, Some(&json!(42))).is_valid);
        assert!(!validate(&schema, Some(&json!("abc"))).is_valid);
        assert!(!validate(&schema, Some(&json!("0"))).is_valid);
        assert!(!validate(&schema, Some(&json!("101"))).is_valid);
    }

    #[test]
    fn date_validation_accepts_common_formats() {
        let schema = field_by_name("EffectiveDate").unwrap();
        assert!(validate(schema, Some(&json!("2026-08-29"))).is_valid);
        assert!(validate(schema, Some(&json!("08/29/2026"))).is_valid);
        assert!(validate(schema, Some(&json!("2026-08-29T10:00:00Z"))).is_valid);
        assert!(!validate(schema, Some(&json!("yesterday"))).is_valid);
    }

    #[test]
    fn string_constraints_accumulate() {
        let mut schema = FieldSchema::text("Code");
        schema.validation = Some(FieldValidation {
            min_length: Some(10),
            pattern: Some(r"^[A-Z]+$".to_string()),
            ..Default::default()
        });

        let report = validate(&schema, Some(&json!("abc")));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn malformed_pattern_degrades_to_no_constraint() {
        let mut schema = FieldSchema::text("Code");
        schema.validation = Some(FieldValidation {
            pattern: Some("([unclosed".to_string()),
            ..Default::default()
        });
        assert!(validate(&schema, Some(&json!("anything"))).is_valid);
    }

    #[test]
    fn dropdown_membership_not_enforced() {
        let schema = field_by_name("Classification").unwrap();
        assert!(validate(schema, Some(&json!("NotAnOption"))).is_valid);
    }
}
