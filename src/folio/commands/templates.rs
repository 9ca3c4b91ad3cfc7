use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::merge;
use crate::model::RecordsManagement;
use crate::store::TemplateStore;
use crate::template::Template;

use super::helpers::{resolve_template, short_id, Selector};

pub struct NewTemplate {
    pub name: String,
    pub content: String,
    pub description: String,
    pub category: String,
    pub document_type: String,
    pub records_management: Option<RecordsManagement>,
}

pub fn add<S: TemplateStore>(store: &mut S, def: NewTemplate) -> Result<CmdResult> {
    let mut template = Template::new(def.name, def.content);
    template.description = def.description;
    template.category = def.category;
    template.document_type = def.document_type;
    template.records_management = def.records_management;

    let extracted = merge::extract_fields(&template.content);
    let template = store.create_template(template)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added template '{}' ({})",
        template.name,
        short_id(&template.id)
    )));
    if !extracted.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Merge fields: {}",
            extracted.join(", ")
        )));
    }
    result.templates.push(template);
    Ok(result)
}

pub fn list<S: TemplateStore>(store: &S) -> Result<CmdResult> {
    let templates = store.list_templates()?;

    let mut result = CmdResult::default();
    if templates.is_empty() {
        result.add_message(CmdMessage::info("No templates found."));
    }
    Ok(result.with_templates(templates))
}

pub fn show<S: TemplateStore>(store: &S, selector: &Selector) -> Result<CmdResult> {
    let template = resolve_template(store, selector)?;
    let extracted = merge::extract_fields(&template.content);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Fields: {}",
        if extracted.is_empty() {
            "(none)".to_string()
        } else {
            extracted.join(", ")
        }
    )));
    result.templates.push(template);
    Ok(result)
}

pub fn remove<S: TemplateStore>(store: &mut S, selector: &Selector) -> Result<CmdResult> {
    let template = resolve_template(store, selector)?;
    store.delete_template(&template.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted template '{}'",
        template.name
    )));
    Ok(result)
}
