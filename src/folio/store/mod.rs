//! # Storage Layer
//!
//! Versioned document and template persistence. Two pieces:
//!
//! - [`StorageBackend`]: raw keyed I/O (index, live content, snapshots,
//!   templates). Implementations: [`fs::FsBackend`] (production, atomic
//!   tmp+rename writes) and [`memory::MemBackend`] (testing).
//! - [`Vault`]: the versioning rules, generic over the backend. Owns
//!   document identity, the append-only version history, finalization, and
//!   reconciliation.
//!
//! ## Versioning discipline
//!
//! A document moves `NEW → SAVED(1) → SAVED(2) → …` and optionally into a
//! terminal `FINAL` state that rejects further writes. Version numbers are
//! 1-based, contiguous, and increase by exactly 1 per successful save.
//!
//! Every save is sequenced snapshot → live overwrite → index publish. The
//! index write is the commit point: a crash mid-sequence can lose only the
//! in-flight save, never an archived version, and readers observe either the
//! pre- or post-save state, never a mix. The vault re-reads the index inside
//! every call; persisted state is the sole source of truth.
//!
//! Mutating methods take `&mut self`, so a shared deployment wraps the vault
//! in a lock to serialize writers while reads stay concurrent.
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! .folio/
//! ├── documents.json                  # Metadata index
//! ├── doc-{uuid}.txt                  # Live content (current version)
//! ├── versions/doc-{uuid}.v{n}.txt    # Archived snapshots
//! ├── templates/template-{uuid}.json  # Template definitions
//! └── config.json                     # Vault configuration
//! ```
//!
//! Metadata and content are stored separately so listing documents never
//! reads content files, and the live file is kept outside the archive so
//! "get current" never touches it.

use crate::error::{FolioError, Result};
use crate::model::{
    check_content, Document, DocumentFilter, Metadata, RecordsManagement, VersionContent,
    VersionHistory, VersionRecord, DEFAULT_TITLE,
};
use crate::template::Template;
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

pub mod backend;
pub mod fs;
pub mod memory;

pub use backend::StorageBackend;

/// Report from the `doctor` reconciliation pass.
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Index entries whose live content file is gone, dropped.
    pub removed_entries: usize,
    /// Orphan live files adopted as version-1 documents.
    pub adopted_files: usize,
    /// Archived snapshots that should exist but don't. Reported, never
    /// fabricated.
    pub missing_snapshots: usize,
}

/// Document identity, metadata, and append-only version history.
pub trait DocumentStore {
    /// Create a new document at version 1. Content is written as both the
    /// live content and the v1 snapshot. When a template is given, the
    /// document inherits its records-management metadata (template wins,
    /// one-time copy).
    fn create(
        &mut self,
        title: Option<String>,
        content: &str,
        template: Option<&Template>,
    ) -> Result<Document>;

    /// Save a new version of an existing document. Fails `Finalized` if the
    /// document is final; the prior live content is archived before being
    /// overwritten.
    fn save(
        &mut self,
        id: &Uuid,
        content: &str,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Document>;

    /// Get the live (current) state of a document.
    fn get(&self, id: &Uuid) -> Result<Document>;

    /// Get the content of one version. The current version reads the live
    /// file; earlier versions read the archive; anything outside
    /// `[1, current]` is not found.
    fn get_version(&self, id: &Uuid, version: u32) -> Result<VersionContent>;

    fn list_versions(&self, id: &Uuid) -> Result<VersionHistory>;

    /// Metadata-only projection for listing UIs; content is never read.
    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Metadata>>;

    /// Remove the document, its live content, and every snapshot.
    /// Irreversible, and permitted even for finalized documents.
    fn delete(&mut self, id: &Uuid) -> Result<()>;

    /// Replace the records-management metadata. Fails once finalized.
    fn set_records_management(&mut self, id: &Uuid, rm: RecordsManagement) -> Result<Document>;

    /// One-way transition into the terminal FINAL state.
    fn finalize(
        &mut self,
        id: &Uuid,
        by: Option<String>,
        notes: Option<String>,
    ) -> Result<Document>;

    /// Save an archived version's content as a new version. All save rules
    /// apply (finalization, integrity check, monotonic numbering).
    fn restore(&mut self, id: &Uuid, version: u32) -> Result<Document>;

    /// Path of the live content file (virtual for memory backends).
    fn document_path(&self, id: &Uuid) -> Result<PathBuf>;

    /// Reconcile the index against what is actually on disk.
    fn doctor(&mut self) -> Result<DoctorReport>;
}

/// Template definition lifecycle. Templates are self-contained records; no
/// cross-template state exists.
pub trait TemplateStore {
    fn create_template(&mut self, template: Template) -> Result<Template>;
    fn get_template(&self, id: &Uuid) -> Result<Template>;
    fn update_template(&mut self, template: Template) -> Result<Template>;
    fn delete_template(&mut self, id: &Uuid) -> Result<()>;
    fn list_templates(&self) -> Result<Vec<Template>>;
}

/// The versioned document store, generic over raw storage.
pub struct Vault<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Vault<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn metadata(&self, id: &Uuid) -> Result<Metadata> {
        let index = self.backend.load_index()?;
        index
            .get(id)
            .cloned()
            .ok_or(FolioError::DocumentNotFound(*id))
    }

    fn live_content(&self, id: &Uuid) -> Result<String> {
        Ok(self.backend.read_content(id)?.unwrap_or_default())
    }
}

impl<B: StorageBackend> DocumentStore for Vault<B> {
    fn create(
        &mut self,
        title: Option<String>,
        content: &str,
        template: Option<&Template>,
    ) -> Result<Document> {
        check_content(content)?;

        let title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => DEFAULT_TITLE.to_string(),
        };
        let mut metadata = Metadata::new(title);
        if let Some(template) = template {
            metadata.template_id = Some(template.id);
            if template.records_management.is_some() {
                metadata.records_management = template.records_management.clone();
            }
        }

        // Content lands in the archive and as the live file before the index
        // publishes the document
        self.backend.write_snapshot(&metadata.id, 1, content)?;
        self.backend.write_content(&metadata.id, content)?;

        let mut index = self.backend.load_index()?;
        index.insert(metadata.id, metadata.clone());
        self.backend.save_index(&index)?;

        Ok(Document {
            metadata,
            content: content.to_string(),
        })
    }

    fn save(
        &mut self,
        id: &Uuid,
        content: &str,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Document> {
        let mut index = self.backend.load_index()?;
        let mut metadata = index
            .get(id)
            .cloned()
            .ok_or(FolioError::DocumentNotFound(*id))?;

        if metadata.is_final() {
            return Err(FolioError::Finalized(*id));
        }
        check_content(content)?;

        // 1. Archive the current live content under the pre-increment
        //    version, so the prior state survives whatever happens next
        let prior = self.live_content(id)?;
        self.backend
            .write_snapshot(id, metadata.current_version, &prior)?;

        // 2. Overwrite the live content
        self.backend.write_content(id, content)?;

        // 3. Publish: increment, append the record, commit the index
        metadata.current_version += 1;
        metadata
            .versions
            .push(VersionRecord::new(metadata.current_version, comment));
        if let Some(title) = title {
            if !title.trim().is_empty() {
                metadata.title = title.to_string();
            }
        }
        metadata.modified_at = Utc::now();

        index.insert(*id, metadata.clone());
        self.backend.save_index(&index)?;

        Ok(Document {
            metadata,
            content: content.to_string(),
        })
    }

    fn get(&self, id: &Uuid) -> Result<Document> {
        let metadata = self.metadata(id)?;
        let content = self.live_content(id)?;
        Ok(Document { metadata, content })
    }

    fn get_version(&self, id: &Uuid, version: u32) -> Result<VersionContent> {
        let metadata = self.metadata(id)?;

        if version == 0 || version > metadata.current_version {
            return Err(FolioError::VersionNotFound { id: *id, version });
        }

        let record = metadata
            .versions
            .iter()
            .find(|r| r.version == version)
            .cloned()
            .ok_or(FolioError::VersionNotFound { id: *id, version })?;

        let content = if version == metadata.current_version {
            self.live_content(id)?
        } else {
            self.backend
                .read_snapshot(id, version)?
                .ok_or(FolioError::VersionNotFound { id: *id, version })?
        };

        Ok(VersionContent { record, content })
    }

    fn list_versions(&self, id: &Uuid) -> Result<VersionHistory> {
        let metadata = self.metadata(id)?;
        Ok(VersionHistory {
            current_version: metadata.current_version,
            versions: metadata.versions,
        })
    }

    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Metadata>> {
        let index = self.backend.load_index()?;
        let mut listed: Vec<Metadata> = index.into_values().filter(|m| filter.matches(m)).collect();
        listed.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(listed)
    }

    fn delete(&mut self, id: &Uuid) -> Result<()> {
        let mut index = self.backend.load_index()?;
        if index.remove(id).is_none() {
            return Err(FolioError::DocumentNotFound(*id));
        }
        self.backend.save_index(&index)?;
        self.backend.delete_content(id)?;
        self.backend.delete_snapshots(id)?;
        Ok(())
    }

    fn set_records_management(&mut self, id: &Uuid, rm: RecordsManagement) -> Result<Document> {
        let mut index = self.backend.load_index()?;
        let mut metadata = index
            .get(id)
            .cloned()
            .ok_or(FolioError::DocumentNotFound(*id))?;

        if metadata.is_final() {
            return Err(FolioError::Finalized(*id));
        }

        metadata.records_management = Some(rm);
        metadata.modified_at = Utc::now();
        index.insert(*id, metadata.clone());
        self.backend.save_index(&index)?;

        let content = self.live_content(id)?;
        Ok(Document { metadata, content })
    }

    fn finalize(
        &mut self,
        id: &Uuid,
        by: Option<String>,
        notes: Option<String>,
    ) -> Result<Document> {
        let mut index = self.backend.load_index()?;
        let mut metadata = index
            .get(id)
            .cloned()
            .ok_or(FolioError::DocumentNotFound(*id))?;

        if metadata.is_final() {
            return Err(FolioError::Finalized(*id));
        }

        let mut rm = metadata.records_management.take().unwrap_or_default();
        rm.is_final = true;
        rm.finalized_date = Some(Utc::now());
        rm.finalized_by = by;
        rm.finalized_notes = notes;
        metadata.records_management = Some(rm);
        metadata.modified_at = Utc::now();

        index.insert(*id, metadata.clone());
        self.backend.save_index(&index)?;

        let content = self.live_content(id)?;
        Ok(Document { metadata, content })
    }

    fn restore(&mut self, id: &Uuid, version: u32) -> Result<Document> {
        let archived = self.get_version(id, version)?;
        self.save(
            id,
            &archived.content,
            None,
            Some(&format!("Restored from version {}", version)),
        )
    }

    fn document_path(&self, id: &Uuid) -> Result<PathBuf> {
        self.metadata(id)?;
        self.backend.content_path(id)
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut index = self.backend.load_index()?;
        let mut report = DoctorReport::default();

        // 1. Drop index entries whose live file is gone
        let mut gone = Vec::new();
        for id in index.keys() {
            if self.backend.read_content(id)?.is_none() {
                gone.push(*id);
            }
        }
        for id in &gone {
            index.remove(id);
            report.removed_entries += 1;
        }

        // 2. Adopt orphan live files as version-1 documents
        for id in self.backend.list_content_ids()? {
            if index.contains_key(&id) {
                continue;
            }
            let content = self.backend.read_content(&id)?.unwrap_or_default();
            let title = content
                .lines()
                .next()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(DEFAULT_TITLE)
                .chars()
                .take(80)
                .collect::<String>();
            let mut metadata = Metadata::new(title);
            metadata.id = id;
            metadata.versions[0].comment = "Recovered by doctor".to_string();
            self.backend.write_snapshot(&id, 1, &content)?;
            index.insert(id, metadata);
            report.adopted_files += 1;
        }

        // 3. Report snapshot gaps; never fabricate history
        for (id, metadata) in &index {
            let have = self.backend.list_snapshot_versions(id)?;
            for v in 1..metadata.current_version {
                if !have.contains(&v) {
                    report.missing_snapshots += 1;
                }
            }
        }

        if report.removed_entries > 0 || report.adopted_files > 0 {
            self.backend.save_index(&index)?;
        }
        Ok(report)
    }
}

impl<B: StorageBackend> TemplateStore for Vault<B> {
    fn create_template(&mut self, template: Template) -> Result<Template> {
        self.backend.write_template(&template)?;
        Ok(template)
    }

    fn get_template(&self, id: &Uuid) -> Result<Template> {
        self.backend
            .read_template(id)?
            .ok_or(FolioError::TemplateNotFound(*id))
    }

    fn update_template(&mut self, mut template: Template) -> Result<Template> {
        if self.backend.read_template(&template.id)?.is_none() {
            return Err(FolioError::TemplateNotFound(template.id));
        }
        template.updated_at = Utc::now();
        self.backend.write_template(&template)?;
        Ok(template)
    }

    fn delete_template(&mut self, id: &Uuid) -> Result<()> {
        if self.backend.read_template(id)?.is_none() {
            return Err(FolioError::TemplateNotFound(*id));
        }
        self.backend.delete_template(id)
    }

    fn list_templates(&self) -> Result<Vec<Template>> {
        self.backend.list_templates()
    }
}
