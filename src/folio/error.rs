use thiserror::Error;
use uuid::Uuid;

/// Stable, machine-readable failure category. UIs and batch callers can
/// branch on this without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Forbidden,
    MalformedContent,
    Internal,
}

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("Version {version} not found for document {id}")]
    VersionNotFound { id: Uuid, version: u32 },

    /// A selector query (name, substring, or id prefix) matched nothing.
    #[error("No {noun} matches '{query}'")]
    NoMatch { noun: &'static str, query: String },

    /// Carries the complete per-field error list; callers surface every
    /// problem at once, never just the first.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Document {0} is finalized and can no longer be modified")]
    Finalized(Uuid),

    #[error("Malformed content: {0}")]
    MalformedContent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl FolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FolioError::DocumentNotFound(_)
            | FolioError::TemplateNotFound(_)
            | FolioError::VersionNotFound { .. }
            | FolioError::NoMatch { .. } => ErrorKind::NotFound,
            FolioError::Validation(_) => ErrorKind::ValidationFailed,
            FolioError::Finalized(_) => ErrorKind::Forbidden,
            FolioError::MalformedContent(_) => ErrorKind::MalformedContent,
            FolioError::Io(_)
            | FolioError::Serialization(_)
            | FolioError::Store(_)
            | FolioError::Api(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        let id = Uuid::new_v4();
        assert_eq!(FolioError::DocumentNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(FolioError::TemplateNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(
            FolioError::VersionNotFound { id, version: 9 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            FolioError::NoMatch {
                noun: "document",
                query: "x".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            FolioError::Validation(vec!["x".into()]).kind(),
            ErrorKind::ValidationFailed
        );
        assert_eq!(FolioError::Finalized(id).kind(), ErrorKind::Forbidden);
        assert_eq!(
            FolioError::MalformedContent("bad".into()).kind(),
            ErrorKind::MalformedContent
        );
        assert_eq!(
            FolioError::Store("disk".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn validation_message_joins_all_errors() {
        let err = FolioError::Validation(vec!["a is missing".into(), "b is missing".into()]);
        let msg = err.to_string();
        assert!(msg.contains("a is missing"));
        assert!(msg.contains("b is missing"));
    }
}
