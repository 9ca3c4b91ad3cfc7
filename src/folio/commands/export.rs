use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Document, VersionContent};
use crate::store::DocumentStore;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;

use super::helpers::{resolve_document, short_id, Selector};

/// Export one document as a gzipped tar: its metadata, the live content,
/// and every archived snapshot.
pub fn run<S: DocumentStore>(store: &S, selector: &Selector) -> Result<CmdResult> {
    let meta = resolve_document(store, selector)?;
    let document = store.get(&meta.id)?;

    let mut snapshots = Vec::new();
    for record in &document.metadata.versions {
        if record.version == document.metadata.current_version {
            continue;
        }
        // Missing snapshots are skipped rather than failing the export
        if let Ok(vc) = store.get_version(&meta.id, record.version) {
            snapshots.push(vc);
        }
    }

    let filename = format!(
        "folio-{}-{}.tar.gz",
        sanitize_filename(&document.metadata.title),
        short_id(&document.metadata.id)
    );
    let file = File::create(&filename).map_err(FolioError::Io)?;
    write_archive(file, &document, &snapshots)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Exported to {}", filename)));
    Ok(result)
}

fn write_archive<W: Write>(
    writer: W,
    document: &Document,
    snapshots: &[VersionContent],
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let dir = sanitize_filename(&document.metadata.title);

    let metadata_json =
        serde_json::to_string_pretty(&document.metadata).map_err(FolioError::Serialization)?;
    append_entry(&mut tar, &format!("{}/metadata.json", dir), &metadata_json)?;

    append_entry(
        &mut tar,
        &format!("{}/v{}.txt", dir, document.metadata.current_version),
        &document.content,
    )?;
    for vc in snapshots {
        append_entry(&mut tar, &format!("{}/v{}.txt", dir, vc.record.version), &vc.content)?;
    }

    tar.finish().map_err(FolioError::Io)?;
    Ok(())
}

fn append_entry<W: Write>(
    tar: &mut tar::Builder<W>,
    name: &str,
    content: &str,
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, name, content.as_bytes())
        .map_err(FolioError::Io)?;
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, save};
    use crate::store::memory::MemBackend;
    use crate::store::Vault;

    #[test]
    fn archive_contains_gzip_data() {
        let mut store = Vault::new(MemBackend::new());
        create::run(&mut store, Some("Doc".into()), "v1").unwrap();
        save::run(&mut store, &Selector::parse("Doc"), "v2", None, None).unwrap();

        let document = store.get(&resolve_document(&store, &Selector::parse("Doc")).unwrap().id)
            .unwrap();
        let snapshots = vec![store.get_version(&document.metadata.id, 1).unwrap()];

        let mut buf = Vec::new();
        write_archive(&mut buf, &document, &snapshots).unwrap();

        assert!(!buf.is_empty());
        // Gzip header magic
        assert_eq!(buf[0], 0x1f);
        assert_eq!(buf[1], 0x8b);
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_filename("Hello World"), "Hello World");
        assert_eq!(sanitize_filename("foo/bar"), "foo_bar");
        assert_eq!(sanitize_filename("a:b?c"), "a_b_c");
    }
}
