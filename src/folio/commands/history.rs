use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

pub fn run<S: DocumentStore>(store: &S, selector: &Selector) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let history = store.list_versions(&meta.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "'{}' has {} version(s), current is v{}",
        meta.title,
        history.versions.len(),
        history.current_version
    )));
    result.listed_documents.push(meta);
    Ok(result.with_history(history))
}
