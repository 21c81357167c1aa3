use crate::commands::{CmdMessage, CmdResult};
use crate::config::Config;
use crate::error::{NotesError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Works on the config file directly, no note store needed.
pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = Config::init(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => return Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| NotesError::Config(format!("Unknown config key: {}", key)))?;
            result.add_message(CmdMessage::info(value));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(config_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            result = result.with_config(config);
        }
    }
    Ok(result)
}
