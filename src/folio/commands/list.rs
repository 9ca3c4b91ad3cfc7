use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DocumentFilter;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, filter: &DocumentFilter) -> Result<CmdResult> {
    let listed = store.list(filter)?;

    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No documents found."));
    }
    Ok(result.with_listed_documents(listed))
}
