use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, short_id, Selector};

pub fn run<S: DocumentStore>(store: &mut S, selectors: &[Selector]) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for selector in selectors {
        let meta = resolve_document(store, selector)?;
        store.delete(&meta.id)?;
        result.add_message(CmdMessage::success(format!(
            "Deleted '{}' ({}) and its {} version(s)",
            meta.title,
            short_id(&meta.id),
            meta.versions.len()
        )));
    }

    Ok(result)
}
