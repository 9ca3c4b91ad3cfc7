//! # API Facade
//!
//! Thin facade over the command layer; the single entry point for every
//! folio operation regardless of the UI driving it.
//!
//! The facade dispatches to command functions, normalizes inputs (raw
//! selector strings become [`Selector`]s), and returns structured
//! `Result<CmdResult>` values. It contains no business logic, performs no
//! terminal I/O, and never formats output.
//!
//! `FolioApi<S>` is generic over the store so the same facade serves
//! `Vault<FsBackend>` in production and `Vault<MemBackend>` in tests.

use crate::commands;
use crate::commands::helpers::Selector;
use crate::error::Result;
use crate::model::{DocumentFilter, RecordsManagement};
use crate::store::{DocumentStore, TemplateStore};
use crate::template::MergeData;

pub struct FolioApi<S: DocumentStore + TemplateStore> {
    store: S,
    paths: commands::FolioPaths,
}

impl<S: DocumentStore + TemplateStore> FolioApi<S> {
    pub fn new(store: S, paths: commands::FolioPaths) -> Self {
        Self { store, paths }
    }

    // --- Documents ---

    pub fn create_document(
        &mut self,
        title: Option<String>,
        content: &str,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, title, content)
    }

    pub fn save_document(
        &mut self,
        selector: &str,
        content: &str,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::save::run(
            &mut self.store,
            &Selector::parse(selector),
            content,
            title,
            comment,
        )
    }

    pub fn show_document(
        &self,
        selector: &str,
        version: Option<u32>,
    ) -> Result<commands::CmdResult> {
        commands::show::run(&self.store, &Selector::parse(selector), version)
    }

    pub fn document_history(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::history::run(&self.store, &Selector::parse(selector))
    }

    pub fn restore_version(&mut self, selector: &str, version: u32) -> Result<commands::CmdResult> {
        commands::restore::run(&mut self.store, &Selector::parse(selector), version)
    }

    pub fn list_documents(&self, filter: &DocumentFilter) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn delete_documents<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors);
        commands::delete::run(&mut self.store, &selectors)
    }

    pub fn set_records(
        &mut self,
        selector: &str,
        rm: RecordsManagement,
    ) -> Result<commands::CmdResult> {
        commands::records::set(&mut self.store, &Selector::parse(selector), rm)
    }

    pub fn finalize_document(
        &mut self,
        selector: &str,
        by: Option<String>,
        notes: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::records::finalize(&mut self.store, &Selector::parse(selector), by, notes)
    }

    pub fn document_paths<I: AsRef<str>>(&self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors);
        commands::paths::run(&self.store, &selectors)
    }

    pub fn export_document(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, &Selector::parse(selector))
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store)
    }

    // --- Templates ---

    pub fn add_template(&mut self, def: commands::templates::NewTemplate) -> Result<commands::CmdResult> {
        commands::templates::add(&mut self.store, def)
    }

    pub fn list_templates(&self) -> Result<commands::CmdResult> {
        commands::templates::list(&self.store)
    }

    pub fn show_template(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::templates::show(&self.store, &Selector::parse(selector))
    }

    pub fn remove_template(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::templates::remove(&mut self.store, &Selector::parse(selector))
    }

    // --- Generation ---

    pub fn generate(
        &mut self,
        selector: &str,
        data: &MergeData,
        name: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::generate::run(&mut self.store, &Selector::parse(selector), data, name)
    }

    pub fn preview(&self, selector: &str, data: &MergeData) -> Result<commands::CmdResult> {
        commands::generate::preview(&self.store, &Selector::parse(selector), data)
    }

    pub fn generate_batch(
        &mut self,
        selector: &str,
        items: &[MergeData],
        base_name: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::generate::run_batch(&mut self.store, &Selector::parse(selector), items, base_name)
    }

    // --- Field library ---

    pub fn fields(&self, category: Option<&str>, search: Option<&str>) -> Result<commands::CmdResult> {
        commands::fields::run(category, search)
    }

    // --- Vault management ---

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn paths(&self) -> &commands::FolioPaths {
        &self.paths
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Vec<Selector> {
    inputs.iter().map(|s| Selector::parse(s.as_ref())).collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::templates::NewTemplate;
pub use commands::{BatchFailure, CmdMessage, CmdResult, FolioPaths, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;
    use crate::store::Vault;
    use serde_json::json;
    use std::path::PathBuf;

    fn api() -> FolioApi<Vault<MemBackend>> {
        FolioApi::new(
            Vault::new(MemBackend::new()),
            FolioPaths {
                root: PathBuf::from("mem://vault"),
            },
        )
    }

    #[test]
    fn create_save_show_roundtrip() {
        let mut api = api();
        api.create_document(Some("Doc".into()), "v1").unwrap();
        api.save_document("Doc", "v2", None, None).unwrap();

        let shown = api.show_document("Doc", None).unwrap();
        assert_eq!(shown.affected_documents[0].content, "v2");

        let old = api.show_document("Doc", Some(1)).unwrap();
        assert_eq!(old.version_content.unwrap().content, "v1");
    }

    #[test]
    fn template_generate_through_facade() {
        let mut api = api();
        api.add_template(NewTemplate {
            name: "Letter".into(),
            content: "Dear {{Name}}".into(),
            description: String::new(),
            category: String::new(),
            document_type: String::new(),
            records_management: None,
        })
        .unwrap();

        let data: MergeData = [("Name".to_string(), json!("Alice"))].into_iter().collect();
        let result = api.generate("Letter", &data, None).unwrap();
        assert_eq!(result.affected_documents[0].content, "Dear Alice");
    }

    #[test]
    fn fields_listing_dispatches() {
        let api = api();
        assert!(!api.fields(None, None).unwrap().fields.is_empty());
    }
}
