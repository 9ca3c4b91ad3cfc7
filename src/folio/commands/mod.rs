use crate::config::FolioConfig;
use crate::model::{Document, Metadata, VersionContent, VersionHistory};
use crate::template::{FieldSchema, Template};
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod fields;
pub mod generate;
pub mod helpers;
pub mod history;
pub mod init;
pub mod list;
pub mod paths;
pub mod records;
pub mod restore;
pub mod save;
pub mod show;
pub mod templates;

/// Filesystem anchor for commands that manage the vault directory itself
/// (init, config). Everything else goes through the store.
#[derive(Debug, Clone)]
pub struct FolioPaths {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One failed item of a batch operation, reported without aborting the rest.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_documents: Vec<Document>,
    pub listed_documents: Vec<Metadata>,
    pub history: Option<VersionHistory>,
    pub version_content: Option<VersionContent>,
    pub templates: Vec<Template>,
    pub fields: Vec<FieldSchema>,
    pub document_paths: Vec<PathBuf>,
    pub config: Option<FolioConfig>,
    /// Merged output of a dry-run generate; never persisted.
    pub preview: Option<String>,
    pub batch_failures: Vec<BatchFailure>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_documents(mut self, documents: Vec<Document>) -> Self {
        self.affected_documents = documents;
        self
    }

    pub fn with_listed_documents(mut self, documents: Vec<Metadata>) -> Self {
        self.listed_documents = documents;
        self
    }

    pub fn with_history(mut self, history: VersionHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldSchema>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_document_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.document_paths = paths;
        self
    }

    pub fn with_config(mut self, config: FolioConfig) -> Self {
        self.config = Some(config);
        self
    }
}
