// src/infra/paths.rs — Config and token file locations
//
// All paths respect the SHARETUNES_HOME environment variable for isolation.
// When unset, everything lives under ~/.sharetunes/.

use std::path::PathBuf;

/// Returns the SHARETUNES_HOME override, if set.
fn sharetunes_home() -> Option<PathBuf> {
    std::env::var_os("SHARETUNES_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Configuration directory: $SHARETUNES_HOME/ or ~/.sharetunes/
pub fn config_dir() -> PathBuf {
    if let Some(home) = sharetunes_home() {
        return home;
    }
    dirs_home().join(".sharetunes")
}

/// Home directory, falling back to the working directory when unknown.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted session tokens (accessToken / refreshToken)
pub fn token_file_path() -> PathBuf {
    config_dir().join("tokens.json")
}
