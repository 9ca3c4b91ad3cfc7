use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

pub fn run<S: DocumentStore>(store: &mut S, selector: &Selector, version: u32) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let document = store.restore(&meta.id, version)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Restored '{}' from version {} as version {}",
        document.metadata.title, version, document.metadata.current_version
    )));
    result.affected_documents.push(document);
    Ok(result)
}
