//! Document-from-template flow: look up a template, validate the supplied
//! merge data, substitute placeholders, and persist the result as version 1
//! of a new document (inheriting the template's records metadata).
//!
//! Fails closed: a missing template or a validation failure stops the flow
//! before anything is written, and the full validation error list travels
//! back to the caller verbatim.

use crate::commands::{BatchFailure, CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::merge;
use crate::store::{DocumentStore, TemplateStore};
use crate::template::{MergeData, Template};

use super::helpers::{resolve_template, Selector};

fn merge_template(template: &Template, data: &MergeData) -> Result<String> {
    if template.content.trim().is_empty() {
        return Err(FolioError::Validation(vec![
            "Template has no content".to_string(),
        ]));
    }
    let report = merge::validate(template, data);
    if !report.is_valid {
        return Err(FolioError::Validation(report.errors));
    }
    Ok(merge::merge(&template.content, data))
}

fn default_name(template: &Template) -> String {
    format!("{} - Generated", template.name)
}

/// Generate and persist one document from a template.
pub fn run<S: DocumentStore + TemplateStore>(
    store: &mut S,
    selector: &Selector,
    data: &MergeData,
    name: Option<String>,
) -> Result<CmdResult> {
    let template = resolve_template(store, selector)?;
    let merged = merge_template(&template, data)?;

    let title = name.unwrap_or_else(|| default_name(&template));
    let document = store.create(Some(title), &merged, Some(&template))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Generated '{}' from template '{}'",
        document.metadata.title, template.name
    )));
    result.affected_documents.push(document);
    result.fields = merge::effective_fields(&template);
    result.templates.push(template);
    Ok(result)
}

/// Same pipeline as [`run`] but nothing is persisted; the merged content is
/// returned for display.
pub fn preview<S: DocumentStore + TemplateStore>(
    store: &S,
    selector: &Selector,
    data: &MergeData,
) -> Result<CmdResult> {
    let template = resolve_template(store, selector)?;
    let merged = merge_template(&template, data)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Preview of template '{}' (not saved)",
        template.name
    )));
    result.preview = Some(merged);
    result.fields = merge::effective_fields(&template);
    result.templates.push(template);
    Ok(result)
}

/// Apply the generate pipeline to each merge-data record independently.
/// One bad item never aborts the rest; failures are collected per item with
/// their position in the batch.
pub fn run_batch<S: DocumentStore + TemplateStore>(
    store: &mut S,
    selector: &Selector,
    items: &[MergeData],
    base_name: Option<String>,
) -> Result<CmdResult> {
    let template = resolve_template(store, selector)?;
    let base = base_name.unwrap_or_else(|| default_name(&template));

    let mut result = CmdResult::default();
    for (i, data) in items.iter().enumerate() {
        let outcome = merge_template(&template, data).and_then(|merged| {
            store.create(Some(format!("{} {}", base, i + 1)), &merged, Some(&template))
        });
        match outcome {
            Ok(document) => result.affected_documents.push(document),
            Err(err) => result.batch_failures.push(BatchFailure {
                index: i,
                error: err.to_string(),
            }),
        }
    }

    result.add_message(CmdMessage::info(format!(
        "Generated {} of {} document(s) from template '{}'",
        result.affected_documents.len(),
        items.len(),
        template.name
    )));
    for failure in &result.batch_failures {
        result.messages.push(CmdMessage::error(format!(
            "  item {}: {}",
            failure.index + 1,
            failure.error
        )));
    }
    result.fields = merge::effective_fields(&template);
    result.templates.push(template);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::fixtures::VaultFixture;
    use crate::store::memory::MemBackend;
    use crate::store::Vault;
    use serde_json::json;

    fn data(pairs: &[(&str, &str)]) -> MergeData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn vault_with_letter() -> Vault<MemBackend> {
        VaultFixture::new().with_letter_template().vault
    }

    #[test]
    fn generates_document_with_merged_content() {
        let mut v = vault_with_letter();
        let result = run(
            &mut v,
            &Selector::parse("Letter"),
            &data(&[("Name", "Alice"), ("Company", "Acme")]),
            None,
        )
        .unwrap();

        let doc = &result.affected_documents[0];
        assert_eq!(doc.content, "Dear Alice of Acme");
        assert_eq!(doc.metadata.title, "Letter - Generated");
        assert_eq!(doc.metadata.current_version, 1);
        // Records metadata inherited from the template
        let rm = doc.metadata.records_management.clone().unwrap();
        assert_eq!(rm.classification.as_deref(), Some("Internal"));
    }

    #[test]
    fn run_reports_template_and_its_fields() {
        let mut v = vault_with_letter();
        let result = run(
            &mut v,
            &Selector::parse("Letter"),
            &data(&[("Name", "Alice")]),
            None,
        )
        .unwrap();

        assert_eq!(result.templates.len(), 1);
        assert_eq!(result.templates[0].name, "Letter");
        let names: Vec<&str> = result.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Company"]);
    }

    #[test]
    fn explicit_name_overrides_default() {
        let mut v = vault_with_letter();
        let result = run(
            &mut v,
            &Selector::parse("Letter"),
            &data(&[("Name", "Alice")]),
            Some("Welcome Letter".into()),
        )
        .unwrap();
        assert_eq!(result.affected_documents[0].metadata.title, "Welcome Letter");
    }

    #[test]
    fn validation_failure_persists_nothing() {
        let mut v = vault_with_letter();
        let err = run(&mut v, &Selector::parse("Letter"), &MergeData::new(), None).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        match err {
            FolioError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("'Name'"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(v
            .list(&crate::model::DocumentFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_template_content_is_a_validation_error() {
        let mut v = Vault::new(MemBackend::new());
        v.create_template(Template::new("Blank".into(), "  ".into()))
            .unwrap();

        let err = run(&mut v, &Selector::parse("Blank"), &MergeData::new(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(err.to_string().contains("no content"));
    }

    #[test]
    fn missing_template_is_not_found() {
        let mut v: Vault<MemBackend> = Vault::new(MemBackend::new());
        let id = uuid::Uuid::new_v4();
        let err = run(&mut v, &Selector::Id(id), &MergeData::new(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn preview_persists_nothing() {
        let v = vault_with_letter();
        let result = preview(
            &v,
            &Selector::parse("Letter"),
            &data(&[("Name", "Alice")]),
        )
        .unwrap();

        assert_eq!(result.preview.as_deref(), Some("Dear Alice of {{Company}}"));
        assert!(v
            .list(&crate::model::DocumentFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn batch_isolates_per_item_failures() {
        let mut v = vault_with_letter();
        let items = vec![
            data(&[("Name", "Alice")]),
            MergeData::new(), // missing required Name
            data(&[("Name", "Carol")]),
        ];

        let result = run_batch(&mut v, &Selector::parse("Letter"), &items, None).unwrap();

        assert_eq!(result.affected_documents.len(), 2);
        assert_eq!(result.batch_failures.len(), 1);
        assert_eq!(result.batch_failures[0].index, 1);
        assert!(result.batch_failures[0].error.contains("'Name'"));

        assert_eq!(result.affected_documents[0].metadata.title, "Letter - Generated 1");
        assert_eq!(result.affected_documents[1].metadata.title, "Letter - Generated 3");
    }

    #[test]
    fn batch_with_base_name_numbers_items() {
        let mut v = vault_with_letter();
        let items = vec![data(&[("Name", "A")]), data(&[("Name", "B")])];

        let result = run_batch(
            &mut v,
            &Selector::parse("Letter"),
            &items,
            Some("Onboarding".into()),
        )
        .unwrap();
        assert_eq!(result.affected_documents[0].metadata.title, "Onboarding 1");
        assert_eq!(result.affected_documents[1].metadata.title, "Onboarding 2");
    }
}
