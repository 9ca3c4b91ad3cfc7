use crate::commands::{CmdMessage, CmdResult, FolioPaths};
use crate::config::FolioConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    SetFileExt(String),
}

pub fn run(paths: &FolioPaths, action: ConfigAction) -> Result<CmdResult> {
    let mut config = FolioConfig::load(&paths.root)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll | ConfigAction::ShowKey(_) => {
            result = result.with_config(config);
        }
        ConfigAction::SetFileExt(ext) => {
            config.set_file_ext(&ext);
            config.save(&paths.root)?;
            result.add_message(CmdMessage::success(format!(
                "file-ext set to {}",
                config.get_file_ext()
            )));
            result = result.with_config(config);
        }
    }

    Ok(result)
}
