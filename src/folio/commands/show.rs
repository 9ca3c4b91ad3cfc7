use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

pub fn run<S: DocumentStore>(
    store: &S,
    selector: &Selector,
    version: Option<u32>,
) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;

    let mut result = CmdResult::default();
    match version {
        Some(v) => {
            result.version_content = Some(store.get_version(&meta.id, v)?);
            result.listed_documents.push(meta);
        }
        None => {
            result.affected_documents.push(store.get(&meta.id)?);
        }
    }
    Ok(result)
}
