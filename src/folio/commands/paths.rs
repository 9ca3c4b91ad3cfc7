use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{resolve_document, Selector};

pub fn run<S: DocumentStore>(store: &S, selectors: &[Selector]) -> Result<CmdResult> {
    let mut paths = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let meta = resolve_document(store, selector)?;
        paths.push(store.document_path(&meta.id)?);
    }
    Ok(CmdResult::default().with_document_paths(paths))
}
