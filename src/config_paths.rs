//! Centralized paths for twinmark
//!
//! Everything lives under:
//! - Unix/macOS: `~/.config/twinmark/`
//! - Windows: `%APPDATA%\twinmark\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "twinmark";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/twinmark`
///   - Else: `~/.config/twinmark`
///
/// Windows:
///   - `%APPDATA%\twinmark`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/twinmark/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/twinmark/data/` - persisted documents and settings
pub fn data_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("data"))
}

/// `~/.config/twinmark/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

/// Ensure the logs dir exists, returning it
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(no_config_dir)?;
    ensure_dir(&logs)?;
    Ok(logs)
}

/// Ensure `dir` (or the default data dir) exists, returning it
pub fn ensure_data_dir(dir: Option<&Path>) -> std::io::Result<PathBuf> {
    let data = match dir {
        Some(dir) => dir.to_path_buf(),
        None => data_dir().ok_or_else(no_config_dir)?,
    };
    ensure_dir(&data)?;
    Ok(data)
}

fn no_config_dir() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory available")
}
