use crate::error::{FolioError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled";

/// One saved state of a document. Records are appended in version order and
/// never reordered or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub comment: String,
}

impl VersionRecord {
    pub fn new(version: u32, comment: Option<&str>) -> Self {
        let comment = match comment {
            Some(c) => c.to_string(),
            None => format!("Version {}", version),
        };
        Self {
            version,
            timestamp: Utc::now(),
            comment,
        }
    }
}

/// Classification/retention bookkeeping attached to a document, independent
/// of its content. Field names are camelCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordsManagement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub id: Uuid,
    // We store the title in metadata to list without reading content files
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub current_version: u32,
    pub versions: Vec<VersionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_management: Option<RecordsManagement>,
}

impl Metadata {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            created_at: now,
            modified_at: now,
            current_version: 1,
            versions: vec![VersionRecord::new(1, Some("Initial version"))],
            template_id: None,
            records_management: None,
        }
    }

    pub fn is_final(&self) -> bool {
        self.records_management
            .as_ref()
            .map(|rm| rm.is_final)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub content: String,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        Self {
            metadata: Metadata::new(title),
            content,
        }
    }
}

/// Archived snapshot content paired with its version record.
#[derive(Debug, Clone)]
pub struct VersionContent {
    pub record: VersionRecord,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct VersionHistory {
    pub current_version: u32,
    pub versions: Vec<VersionRecord>,
}

/// Metadata-only listing filter. Matching is case-insensitive; all set
/// criteria must match.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Substring match against title and records-management notes.
    pub search_term: Option<String>,
    pub document_type: Option<String>,
    pub classification: Option<String>,
    pub finalized: Option<bool>,
}

impl DocumentFilter {
    pub fn matches(&self, meta: &Metadata) -> bool {
        if let Some(term) = &self.search_term {
            let term = term.to_lowercase();
            let in_title = meta.title.to_lowercase().contains(&term);
            let in_notes = meta
                .records_management
                .as_ref()
                .and_then(|rm| rm.notes.as_ref())
                .map(|n| n.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !in_title && !in_notes {
                return false;
            }
        }
        if let Some(dt) = &self.document_type {
            let got = meta
                .records_management
                .as_ref()
                .and_then(|rm| rm.document_type.as_deref())
                .unwrap_or("");
            if !got.eq_ignore_ascii_case(dt) {
                return false;
            }
        }
        if let Some(cls) = &self.classification {
            let got = meta
                .records_management
                .as_ref()
                .and_then(|rm| rm.classification.as_deref())
                .unwrap_or("");
            if !got.eq_ignore_ascii_case(cls) {
                return false;
            }
        }
        if let Some(finalized) = self.finalized {
            if meta.is_final() != finalized {
                return false;
            }
        }
        true
    }
}

/// Integrity check applied to content before any write.
///
/// Content is opaque text, with one exception: a payload whose first
/// non-whitespace character is `{` (and not the `{{` of a merge placeholder)
/// claims to be a structured JSON document and must parse as a JSON object.
/// Everything else passes through untouched.
pub fn check_content(content: &str) -> Result<()> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') && !trimmed.starts_with("{{") {
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Object(_)) => Ok(()),
            Ok(_) => Err(FolioError::MalformedContent(
                "structured content must be a JSON object".to_string(),
            )),
            Err(e) => Err(FolioError::MalformedContent(format!(
                "content looks structured but does not parse: {}",
                e
            ))),
        }
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metadata_starts_at_version_one() {
        let meta = Metadata::new("Report".to_string());
        assert_eq!(meta.current_version, 1);
        assert_eq!(meta.versions.len(), 1);
        assert_eq!(meta.versions[0].version, 1);
        assert_eq!(meta.versions[0].comment, "Initial version");
        assert!(!meta.is_final());
    }

    #[test]
    fn version_record_default_comment() {
        let rec = VersionRecord::new(3, None);
        assert_eq!(rec.comment, "Version 3");
        let rec = VersionRecord::new(3, Some("Fixed the header"));
        assert_eq!(rec.comment, "Fixed the header");
    }

    #[test]
    fn records_management_serializes_camel_case() {
        let rm = RecordsManagement {
            classification: Some("Internal".into()),
            document_type: Some("Contract".into()),
            retention_period: Some("7y".into()),
            is_final: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&rm).unwrap();
        assert_eq!(json["documentType"], "Contract");
        assert_eq!(json["retentionPeriod"], "7y");
        assert_eq!(json["isFinal"], true);
        assert!(json.get("document_type").is_none());
    }

    #[test]
    fn check_content_accepts_plain_text() {
        assert!(check_content("Dear {{Name}},\nregards").is_ok());
        assert!(check_content("").is_ok());
        assert!(check_content("  leading spaces").is_ok());
    }

    #[test]
    fn check_content_accepts_json_object() {
        assert!(check_content(r#"{"text": "hello", "styles": []}"#).is_ok());
    }

    #[test]
    fn check_content_placeholder_at_start_is_plain_text() {
        assert!(check_content("{{Name}} wrote this").is_ok());
    }

    #[test]
    fn check_content_rejects_broken_json() {
        let err = check_content(r#"{"text": "#).unwrap_err();
        assert!(matches!(err, FolioError::MalformedContent(_)));
    }

    #[test]
    fn filter_matches_title_and_records() {
        let mut meta = Metadata::new("Quarterly Report".to_string());
        meta.records_management = Some(RecordsManagement {
            classification: Some("Confidential".into()),
            document_type: Some("Report".into()),
            notes: Some("FY26 planning".into()),
            ..Default::default()
        });

        let f = DocumentFilter {
            search_term: Some("quarterly".into()),
            ..Default::default()
        };
        assert!(f.matches(&meta));

        let f = DocumentFilter {
            search_term: Some("fy26".into()),
            ..Default::default()
        };
        assert!(f.matches(&meta));

        let f = DocumentFilter {
            document_type: Some("report".into()),
            classification: Some("confidential".into()),
            ..Default::default()
        };
        assert!(f.matches(&meta));

        let f = DocumentFilter {
            finalized: Some(true),
            ..Default::default()
        };
        assert!(!f.matches(&meta));
    }
}
