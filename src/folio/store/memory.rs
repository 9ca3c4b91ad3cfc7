use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::Metadata;
use crate::template::Template;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory storage backend for testing and development.
/// Does NOT persist data. Backend methods take `&self`, so state lives
/// behind a mutex.
#[derive(Default)]
pub struct MemBackend {
    inner: Mutex<MemState>,
}

#[derive(Default)]
struct MemState {
    index: HashMap<Uuid, Metadata>,
    contents: HashMap<Uuid, String>,
    snapshots: HashMap<(Uuid, u32), String>,
    templates: HashMap<Uuid, Template>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemState>> {
        self.inner
            .lock()
            .map_err(|_| FolioError::Store("memory backend poisoned".to_string()))
    }
}

impl StorageBackend for MemBackend {
    fn load_index(&self) -> Result<HashMap<Uuid, Metadata>> {
        Ok(self.lock()?.index.clone())
    }

    fn save_index(&self, index: &HashMap<Uuid, Metadata>) -> Result<()> {
        self.lock()?.index = index.clone();
        Ok(())
    }

    fn read_content(&self, id: &Uuid) -> Result<Option<String>> {
        Ok(self.lock()?.contents.get(id).cloned())
    }

    fn write_content(&self, id: &Uuid, content: &str) -> Result<()> {
        self.lock()?.contents.insert(*id, content.to_string());
        Ok(())
    }

    fn delete_content(&self, id: &Uuid) -> Result<()> {
        self.lock()?.contents.remove(id);
        Ok(())
    }

    fn read_snapshot(&self, id: &Uuid, version: u32) -> Result<Option<String>> {
        Ok(self.lock()?.snapshots.get(&(*id, version)).cloned())
    }

    fn write_snapshot(&self, id: &Uuid, version: u32, content: &str) -> Result<()> {
        self.lock()?
            .snapshots
            .insert((*id, version), content.to_string());
        Ok(())
    }

    fn delete_snapshots(&self, id: &Uuid) -> Result<()> {
        self.lock()?.snapshots.retain(|(did, _), _| did != id);
        Ok(())
    }

    fn list_snapshot_versions(&self, id: &Uuid) -> Result<Vec<u32>> {
        let mut versions: Vec<u32> = self
            .lock()?
            .snapshots
            .keys()
            .filter(|(did, _)| did == id)
            .map(|(_, v)| *v)
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    fn list_content_ids(&self) -> Result<Vec<Uuid>> {
        Ok(self.lock()?.contents.keys().copied().collect())
    }

    fn content_path(&self, id: &Uuid) -> Result<PathBuf> {
        Ok(PathBuf::from(format!("mem://doc-{}", id)))
    }

    fn read_template(&self, id: &Uuid) -> Result<Option<Template>> {
        Ok(self.lock()?.templates.get(id).cloned())
    }

    fn write_template(&self, template: &Template) -> Result<()> {
        self.lock()?.templates.insert(template.id, template.clone());
        Ok(())
    }

    fn delete_template(&self, id: &Uuid) -> Result<()> {
        self.lock()?.templates.remove(id);
        Ok(())
    }

    fn list_templates(&self) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self.lock()?.templates.values().cloned().collect();
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(templates)
    }
}

// --- Test Fixtures ---

#[cfg(test)]
pub mod fixtures {
    use super::super::{DocumentStore, TemplateStore, Vault};
    use super::*;
    use crate::model::RecordsManagement;
    use crate::template::FieldSchema;

    /// An in-memory vault pre-seeded for tests.
    pub struct VaultFixture {
        pub vault: Vault<MemBackend>,
    }

    impl Default for VaultFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl VaultFixture {
        pub fn new() -> Self {
            Self {
                vault: Vault::new(MemBackend::new()),
            }
        }

        pub fn with_documents(mut self, count: usize) -> Self {
            for i in 0..count {
                let title = format!("Test Document {}", i + 1);
                let content = format!("Content for document {}", i + 1);
                self.vault.create(Some(title), &content, None).unwrap();
            }
            self
        }

        pub fn with_template(mut self, name: &str, content: &str) -> Self {
            let template = Template::new(name.to_string(), content.to_string());
            self.vault.create_template(template).unwrap();
            self
        }

        /// A "Letter" template with one required field, one optional field,
        /// and records metadata to inherit.
        pub fn with_letter_template(mut self) -> Self {
            let mut template = Template::new(
                "Letter".to_string(),
                "Dear {{Name}} of {{Company}}".to_string(),
            );
            let mut name = FieldSchema::text("Name");
            name.required = true;
            template.merge_fields = vec![name, FieldSchema::text("Company")];
            template.records_management = Some(RecordsManagement {
                classification: Some("Internal".into()),
                ..Default::default()
            });
            self.vault.create_template(template).unwrap();
            self
        }
    }
}
