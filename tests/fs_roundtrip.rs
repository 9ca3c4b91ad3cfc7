use folio::model::{DocumentFilter, RecordsManagement};
use folio::store::fs::FsBackend;
use folio::store::{DocumentStore, TemplateStore, Vault};
use folio::template::Template;
use tempfile::TempDir;

fn vault(root: &TempDir) -> Vault<FsBackend> {
    Vault::new(FsBackend::new(root.path().to_path_buf()))
}

#[test]
fn documents_survive_process_restart() {
    let root = TempDir::new().unwrap();

    let id = {
        let mut v = vault(&root);
        let id = v
            .create(Some("Report".into()), "v1", None)
            .unwrap()
            .metadata
            .id;
        v.save(&id, "v2", None, Some("second draft")).unwrap();
        id
    };

    // A fresh vault over the same directory sees everything
    let v = vault(&root);
    let doc = v.get(&id).unwrap();
    assert_eq!(doc.content, "v2");
    assert_eq!(doc.metadata.current_version, 2);
    assert_eq!(doc.metadata.versions.len(), 2);
    assert_eq!(doc.metadata.versions[1].comment, "second draft");

    assert_eq!(v.get_version(&id, 1).unwrap().content, "v1");
}

#[test]
fn on_disk_layout_matches_contract() {
    let root = TempDir::new().unwrap();

    let mut v = vault(&root);
    let id = v.create(Some("Doc".into()), "v1", None).unwrap().metadata.id;
    v.save(&id, "v2", None, None).unwrap();

    assert!(root.path().join("documents.json").exists());
    assert!(root.path().join(format!("doc-{}.txt", id)).exists());
    assert!(root
        .path()
        .join("versions")
        .join(format!("doc-{}.v1.txt", id))
        .exists());

    // No stray temp files once the writes are done
    let leftovers: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn snapshots_exist_for_every_prior_version() {
    let root = TempDir::new().unwrap();

    let mut v = vault(&root);
    let id = v.create(Some("Doc".into()), "v1", None).unwrap().metadata.id;
    for n in 2..=5u32 {
        v.save(&id, &format!("v{}", n), None, None).unwrap();
    }

    let v = vault(&root);
    for n in 1..5u32 {
        assert_eq!(v.get_version(&id, n).unwrap().content, format!("v{}", n));
    }
    assert_eq!(v.get(&id).unwrap().content, "v5");
}

#[test]
fn finalization_survives_restart() {
    let root = TempDir::new().unwrap();

    let id = {
        let mut v = vault(&root);
        let id = v.create(Some("Policy".into()), "v1", None).unwrap().metadata.id;
        v.finalize(&id, Some("alice".into()), None).unwrap();
        id
    };

    let mut v = vault(&root);
    assert!(v.get(&id).unwrap().metadata.is_final());
    assert!(v.save(&id, "v2", None, None).is_err());

    // Delete still works and clears the disk
    v.delete(&id).unwrap();
    assert!(!root.path().join(format!("doc-{}.txt", id)).exists());
}

#[test]
fn templates_survive_restart() {
    let root = TempDir::new().unwrap();

    let id = {
        let mut v = vault(&root);
        let mut template = Template::new("Letter".into(), "Dear {{Name}}".into());
        template.records_management = Some(RecordsManagement {
            classification: Some("Internal".into()),
            ..Default::default()
        });
        let id = template.id;
        v.create_template(template).unwrap();
        id
    };

    let v = vault(&root);
    let got = v.get_template(&id).unwrap();
    assert_eq!(got.name, "Letter");
    assert_eq!(
        got.records_management.unwrap().classification.as_deref(),
        Some("Internal")
    );
    assert!(root
        .path()
        .join("templates")
        .join(format!("template-{}.json", id))
        .exists());
}

#[test]
fn custom_file_ext_with_txt_fallback() {
    let root = TempDir::new().unwrap();

    // Created with the default extension
    let id = {
        let mut v = vault(&root);
        v.create(Some("Doc".into()), "v1", None).unwrap().metadata.id
    };

    // Reopened with .md: old .txt content is still readable, new writes
    // use the new extension
    let mut v = Vault::new(FsBackend::new(root.path().to_path_buf()).with_file_ext("md"));
    assert_eq!(v.get(&id).unwrap().content, "v1");

    let other = v.create(Some("Notes".into()), "md body", None).unwrap().metadata.id;
    assert!(root.path().join(format!("doc-{}.md", other)).exists());
}

#[test]
fn doctor_recovers_manually_dropped_files() {
    let root = TempDir::new().unwrap();

    let mut v = vault(&root);
    v.create(Some("Keep".into()), "k", None).unwrap();

    // Someone drops a file into the vault by hand
    let orphan = uuid::Uuid::new_v4();
    std::fs::write(
        root.path().join(format!("doc-{}.txt", orphan)),
        "Recovered notes\nbody",
    )
    .unwrap();

    let report = v.doctor().unwrap();
    assert_eq!(report.adopted_files, 1);

    let v = vault(&root);
    let adopted = v.get(&orphan).unwrap();
    assert_eq!(adopted.metadata.title, "Recovered notes");
    assert_eq!(
        v.list(&DocumentFilter::default()).unwrap().len(),
        2
    );
}
