//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/src/css/   ← cwd
/// /home/user/site/assetline.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

/// Search upward from `start` for `config_name`.
pub fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // First check if config_name is an absolute path
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    // Walk up from start looking for config file
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}
