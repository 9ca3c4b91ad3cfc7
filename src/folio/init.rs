use crate::api::{FolioApi, FolioPaths};
use crate::config::FolioConfig;
use crate::store::fs::FsBackend;
use crate::store::Vault;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "FOLIO_HOME";
const VAULT_DIR: &str = ".folio";

pub struct FolioContext {
    pub api: FolioApi<Vault<FsBackend>>,
    pub config: FolioConfig,
}

/// Find a vault root by walking up from cwd looking for a `.folio`
/// directory. Returns None if none is found before the filesystem root.
pub fn find_vault_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();
    loop {
        let vault_dir = current.join(VAULT_DIR);
        if vault_dir.is_dir() {
            return Some(vault_dir);
        }
        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Resolve the vault root: `FOLIO_HOME` wins, then the nearest `.folio`
/// ancestor, then the user-wide data directory.
pub fn resolve_root(cwd: &Path) -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Some(root) = find_vault_root(cwd) {
        return root;
    }
    ProjectDirs::from("com", "folio", "folio")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| cwd.join(VAULT_DIR))
}

pub fn initialize(cwd: &Path) -> FolioContext {
    let root = resolve_root(cwd);
    let config = FolioConfig::load(&root).unwrap_or_default();

    let store = Vault::new(FsBackend::new(root.clone()).with_file_ext(config.get_file_ext()));
    let api = FolioApi::new(store, FolioPaths { root });

    FolioContext { api, config }
}
