use crate::error::Result;
use crate::model::Metadata;
use crate::template::Template;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::Vault`] handles the "what" (versioning rules, finalization,
/// doctor).
pub trait StorageBackend {
    // --- Index Operations ---

    /// Load the metadata index (documents.json)
    fn load_index(&self) -> Result<HashMap<Uuid, Metadata>>;

    /// Save the metadata index. MUST be atomic (tmp + rename); this write is
    /// the commit point for every document mutation.
    fn save_index(&self, index: &HashMap<Uuid, Metadata>) -> Result<()>;

    // --- Live Content Operations ---

    /// Read the live content for a document.
    /// Returns Ok(None) if the file does not exist (useful for zombie
    /// detection). Returns Err only on actual I/O errors.
    fn read_content(&self, id: &Uuid) -> Result<Option<String>>;

    /// Write live content. MUST be atomic to avoid partial writes.
    fn write_content(&self, id: &Uuid, content: &str) -> Result<()>;

    /// Delete the live content file.
    fn delete_content(&self, id: &Uuid) -> Result<()>;

    // --- Version Archive Operations ---

    /// Read an archived snapshot, keyed by (document, version).
    fn read_snapshot(&self, id: &Uuid, version: u32) -> Result<Option<String>>;

    /// Write an archived snapshot. MUST be atomic.
    fn write_snapshot(&self, id: &Uuid, version: u32, content: &str) -> Result<()>;

    /// Delete every archived snapshot belonging to a document.
    fn delete_snapshots(&self, id: &Uuid) -> Result<()>;

    /// List the archived version numbers present for a document, ascending.
    fn list_snapshot_versions(&self, id: &Uuid) -> Result<Vec<u32>>;

    // --- Discovery & Paths ---

    /// List all document IDs with live content (for reconciliation).
    fn list_content_ids(&self) -> Result<Vec<Uuid>>;

    /// Get the "file path" for live content. For FsBackend this is the real
    /// path; for MemBackend a virtual one.
    fn content_path(&self, id: &Uuid) -> Result<PathBuf>;

    // --- Template Operations ---

    /// Read one template definition, or None if absent.
    fn read_template(&self, id: &Uuid) -> Result<Option<Template>>;

    /// Write a template definition. MUST be atomic.
    fn write_template(&self, template: &Template) -> Result<()>;

    /// Delete a template definition. Missing templates are not an error here;
    /// the vault decides whether absence matters.
    fn delete_template(&self, id: &Uuid) -> Result<()>;

    /// Load every template definition.
    fn list_templates(&self) -> Result<Vec<Template>>;
}
