use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::short_id;

pub fn run<S: DocumentStore>(
    store: &mut S,
    title: Option<String>,
    content: &str,
) -> Result<CmdResult> {
    let document = store.create(title, content, None)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created '{}' ({})",
        document.metadata.title,
        short_id(&document.metadata.id)
    )));
    result.affected_documents.push(document);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;
    use crate::store::Vault;

    #[test]
    fn creates_document_at_version_one() {
        let mut store = Vault::new(MemBackend::new());
        let result = run(&mut store, Some("Notes".into()), "hello").unwrap();

        assert_eq!(result.affected_documents.len(), 1);
        let doc = &result.affected_documents[0];
        assert_eq!(doc.metadata.title, "Notes");
        assert_eq!(doc.metadata.current_version, 1);
        assert!(result.messages[0].content.contains("Created 'Notes'"));
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let mut store = Vault::new(MemBackend::new());
        let result = run(&mut store, None, "hello").unwrap();
        assert_eq!(result.affected_documents[0].metadata.title, "Untitled");
    }
}
