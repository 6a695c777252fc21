use crate::paths;

/// Config file name looked up in the current working directory
pub const CONFIG_FILE: &str = ".statecell.toml";

/// Load config file content from CWD first, then the config directory
///
/// Searches for:
/// 1. `.statecell.toml` in the current working directory
/// 2. `config.toml` in the application config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let global_config = paths::app_config_path().ok()?;
    match std::fs::read_to_string(&global_config) {
        Ok(content) => {
            log::debug!("Loaded config from {}", global_config.display());
            Some(content)
        }
        Err(_) => None,
    }
}
