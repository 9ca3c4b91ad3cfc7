use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fields;

/// List the standard merge field catalog, optionally narrowed by category
/// or a search term.
pub fn run(category: Option<&str>, search: Option<&str>) -> Result<CmdResult> {
    let matched: Vec<_> = match (category, search) {
        (Some(cat), _) => fields::fields_by_category(cat),
        (None, Some(term)) => fields::search(term),
        (None, None) => fields::all_fields().iter().collect(),
    };

    let mut result = CmdResult::default();
    if matched.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No fields found. Categories: {}",
            fields::categories().join(", ")
        )));
    }
    Ok(result.with_fields(matched.into_iter().cloned().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_whole_catalog() {
        let result = run(None, None).unwrap();
        assert!(result.fields.len() >= 15);
    }

    #[test]
    fn filters_by_category() {
        let result = run(Some("dates"), None).unwrap();
        assert_eq!(result.fields.len(), 3);
        assert!(result.fields.iter().all(|f| f.category == "dates"));
    }

    #[test]
    fn searches_by_term() {
        let result = run(None, Some("company")).unwrap();
        assert!(!result.fields.is_empty());
    }

    #[test]
    fn unknown_category_reports_options() {
        let result = run(Some("nope"), None).unwrap();
        assert!(result.fields.is_empty());
        assert!(result.messages[0].content.contains("personal"));
    }
}
