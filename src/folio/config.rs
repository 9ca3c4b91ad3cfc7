use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".txt";

/// Configuration for a folio vault, stored in its root as config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolioConfig {
    /// File extension for document content files (e.g., ".txt", ".md")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            file_ext: DEFAULT_FILE_EXT.to_string(),
        }
    }
}

impl FolioConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FolioError::Io)?;
        let config: FolioConfig =
            serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FolioError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FolioError::Serialization)?;
        fs::write(config_path, content).map_err(FolioError::Io)?;
        Ok(())
    }

    pub fn get_file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.file_ext, ".txt");
    }

    #[test]
    fn set_file_ext_normalizes_dot() {
        let mut config = FolioConfig::default();
        config.set_file_ext("md");
        assert_eq!(config.file_ext, ".md");
        config.set_file_ext(".html");
        assert_eq!(config.file_ext, ".html");
    }

    #[test]
    fn load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = FolioConfig::load(temp.path().join("nope")).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut config = FolioConfig::default();
        config.set_file_ext(".md");
        config.save(temp.path()).unwrap();

        let loaded = FolioConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.file_ext, ".md");
    }
}
