use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

pub fn run<S: DocumentStore>(
    store: &mut S,
    selector: &Selector,
    content: &str,
    title: Option<&str>,
    comment: Option<&str>,
) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let document = store.save(&meta.id, content, title, comment)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Saved version {} of '{}'",
        document.metadata.current_version, document.metadata.title
    )));
    result.affected_documents.push(document);
    Ok(result)
}
