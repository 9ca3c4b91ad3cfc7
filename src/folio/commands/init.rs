use crate::commands::{CmdMessage, CmdResult, FolioPaths};
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use std::fs;

pub fn run(paths: &FolioPaths) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if paths.root.exists() {
        result.add_message(CmdMessage::info(format!(
            "Vault already initialized at {}",
            paths.root.display()
        )));
        return Ok(result);
    }

    fs::create_dir_all(&paths.root).map_err(FolioError::Io)?;
    FolioConfig::default().save(&paths.root)?;

    result.add_message(CmdMessage::success(format!(
        "Initialized empty vault at {}",
        paths.root.display()
    )));
    Ok(result)
}
