use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::Metadata;
use crate::template::Template;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const INDEX_FILENAME: &str = "documents.json";
const VERSIONS_DIR: &str = "versions";
const TEMPLATES_DIR: &str = "templates";

/// File-based storage backend.
///
/// Layout under the vault root:
/// ```text
/// .folio/
/// ├── documents.json                  # Metadata index for all documents
/// ├── doc-{uuid}.txt                  # Live content, one file per document
/// ├── versions/doc-{uuid}.v{n}.txt    # Archived snapshots
/// ├── templates/template-{uuid}.json  # Template definitions
/// └── config.json                     # Vault configuration
/// ```
///
/// Every write goes through a temp file and rename so a crash never leaves a
/// partially written index, content file, or snapshot.
pub struct FsBackend {
    root: PathBuf,
    file_ext: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".txt".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_filename(&self, id: &Uuid) -> String {
        format!("doc-{}{}", id, self.file_ext)
    }

    fn snapshot_filename(&self, id: &Uuid, version: u32) -> String {
        format!("doc-{}.v{}{}", id, version, self.file_ext)
    }

    /// Find the content file for an ID, checking the configured extension
    /// with a .txt fallback for vaults created before the ext was changed.
    fn find_doc_file(&self, dir: &Path, id: &Uuid, version: Option<u32>) -> Option<PathBuf> {
        let name = match version {
            Some(v) => self.snapshot_filename(id, v),
            None => self.doc_filename(id),
        };
        let path = dir.join(name);
        if path.exists() {
            return Some(path);
        }

        if self.file_ext != ".txt" {
            let txt_name = match version {
                Some(v) => format!("doc-{}.v{}.txt", id, v),
                None => format!("doc-{}.txt", id),
            };
            let txt_path = dir.join(txt_name);
            if txt_path.exists() {
                return Some(txt_path);
            }
        }
        None
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn versions_dir(&self) -> PathBuf {
        self.root.join(VERSIONS_DIR)
    }

    fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    fn atomic_write(&self, dir: &Path, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp_path = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(FolioError::Io)?;
        fs::rename(&tmp_path, target).map_err(FolioError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_index(&self) -> Result<HashMap<Uuid, Metadata>> {
        let index_file = self.root.join(INDEX_FILENAME);
        if !index_file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(index_file).map_err(FolioError::Io)?;
        let index: HashMap<Uuid, Metadata> =
            serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(index)
    }

    fn save_index(&self, index: &HashMap<Uuid, Metadata>) -> Result<()> {
        let content = serde_json::to_string_pretty(index).map_err(FolioError::Serialization)?;
        let target = self.root.join(INDEX_FILENAME);
        self.atomic_write(&self.root, &target, &content)
    }

    fn read_content(&self, id: &Uuid) -> Result<Option<String>> {
        if let Some(path) = self.find_doc_file(&self.root, id, None) {
            let content = fs::read_to_string(path).map_err(FolioError::Io)?;
            Ok(Some(content))
        } else {
            Ok(None)
        }
    }

    fn write_content(&self, id: &Uuid, content: &str) -> Result<()> {
        let target = self.root.join(self.doc_filename(id));
        self.atomic_write(&self.root, &target, content)
    }

    fn delete_content(&self, id: &Uuid) -> Result<()> {
        if let Some(path) = self.find_doc_file(&self.root, id, None) {
            fs::remove_file(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn read_snapshot(&self, id: &Uuid, version: u32) -> Result<Option<String>> {
        let dir = self.versions_dir();
        if let Some(path) = self.find_doc_file(&dir, id, Some(version)) {
            let content = fs::read_to_string(path).map_err(FolioError::Io)?;
            Ok(Some(content))
        } else {
            Ok(None)
        }
    }

    fn write_snapshot(&self, id: &Uuid, version: u32, content: &str) -> Result<()> {
        let dir = self.versions_dir();
        let target = dir.join(self.snapshot_filename(id, version));
        self.atomic_write(&dir, &target, content)
    }

    fn delete_snapshots(&self, id: &Uuid) -> Result<()> {
        let dir = self.versions_dir();
        if !dir.exists() {
            return Ok(());
        }
        let prefix = format!("doc-{}.v", id);
        for entry in fs::read_dir(&dir).map_err(FolioError::Io)? {
            let entry = entry.map_err(FolioError::Io)?;
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if name.starts_with(&prefix) {
                    fs::remove_file(&path).map_err(FolioError::Io)?;
                }
            }
        }
        Ok(())
    }

    fn list_snapshot_versions(&self, id: &Uuid) -> Result<Vec<u32>> {
        let dir = self.versions_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("doc-{}.v", id);
        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir).map_err(FolioError::Io)? {
            let entry = entry.map_err(FolioError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if let Some(rest) = name.strip_prefix(&prefix) {
                    // "3.txt" -> 3
                    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                    if let Ok(v) = digits.parse::<u32>() {
                        versions.push(v);
                    }
                }
            }
        }
        versions.sort_unstable();
        versions.dedup();
        Ok(versions)
    }

    fn list_content_ids(&self) -> Result<Vec<Uuid>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(FolioError::Io)? {
            let entry = entry.map_err(FolioError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if name.starts_with("doc-") {
                    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
                    let uuid_part = stem.strip_prefix("doc-").unwrap_or("");
                    if let Ok(id) = Uuid::parse_str(uuid_part) {
                        ids.push(id);
                    }
                }
            }
        }
        Ok(ids)
    }

    fn content_path(&self, id: &Uuid) -> Result<PathBuf> {
        if let Some(path) = self.find_doc_file(&self.root, id, None) {
            Ok(path)
        } else {
            Ok(self.root.join(self.doc_filename(id)))
        }
    }

    fn read_template(&self, id: &Uuid) -> Result<Option<Template>> {
        let path = self.templates_dir().join(format!("template-{}.json", id));
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(FolioError::Io)?;
        let template: Template =
            serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(Some(template))
    }

    fn write_template(&self, template: &Template) -> Result<()> {
        let dir = self.templates_dir();
        let target = dir.join(format!("template-{}.json", template.id));
        let content = serde_json::to_string_pretty(template).map_err(FolioError::Serialization)?;
        self.atomic_write(&dir, &target, &content)
    }

    fn delete_template(&self, id: &Uuid) -> Result<()> {
        let path = self.templates_dir().join(format!("template-{}.json", id));
        if path.exists() {
            fs::remove_file(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn list_templates(&self) -> Result<Vec<Template>> {
        let dir = self.templates_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut templates = Vec::new();
        for entry in fs::read_dir(&dir).map_err(FolioError::Io)? {
            let entry = entry.map_err(FolioError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !name.starts_with("template-") || !name.ends_with(".json") {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(FolioError::Io)?;
            let template: Template =
                serde_json::from_str(&content).map_err(FolioError::Serialization)?;
            templates.push(template);
        }
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(templates)
    }
}
