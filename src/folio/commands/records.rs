use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RecordsManagement;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

/// Replace a document's records-management metadata.
pub fn set<S: DocumentStore>(
    store: &mut S,
    selector: &Selector,
    rm: RecordsManagement,
) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let document = store.set_records_management(&meta.id, rm)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated records metadata for '{}'",
        document.metadata.title
    )));
    result.affected_documents.push(document);
    Ok(result)
}

/// One-way transition: the document's content and history become immutable.
pub fn finalize<S: DocumentStore>(
    store: &mut S,
    selector: &Selector,
    by: Option<String>,
    notes: Option<String>,
) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let document = store.finalize(&meta.id, by, notes)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Finalized '{}' at version {}",
        document.metadata.title, document.metadata.current_version
    )));
    result.add_message(CmdMessage::warning(
        "This document no longer accepts saves.",
    ));
    result.affected_documents.push(document);
    Ok(result)
}
