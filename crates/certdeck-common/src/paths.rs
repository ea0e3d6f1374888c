use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "CERTDECK_DATA_DIR";

/// Root data directory for certdeck.
///
/// Holds the persisted certificate collection and `config.toml`.
/// `CERTDECK_DATA_DIR` wins when set, otherwise:
///
/// - Linux: `~/.certdeck/`
/// - macOS: `~/Library/Application Support/certdeck/`
/// - Windows: `%LOCALAPPDATA%\certdeck\`
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("certdeck");
        }
    }

    #[cfg(windows)]
    {
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(local).join("certdeck");
        }
    }

    #[cfg(not(any(target_os = "macos", windows)))]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".certdeck");
        }
    }

    // Fallback
    PathBuf::from(".certdeck")
}

/// Path to `config.toml` inside a data directory.
pub fn config_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Log directory inside a data directory.
pub fn log_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name_or_override() {
        let dir = data_dir();
        let overridden = std::env::var_os(DATA_DIR_ENV).is_some_and(|v| !v.is_empty());
        if !overridden {
            let name = dir.file_name().unwrap().to_string_lossy().to_string();
            assert!(name == ".certdeck" || name == "certdeck", "got {name}");
        }
    }

    #[test]
    fn config_and_log_paths_nest_under_data_dir() {
        let base = PathBuf::from("/tmp/certdeck-paths");
        assert_eq!(config_path(&base), base.join("config.toml"));
        assert_eq!(log_dir(&base), base.join("logs"));
    }
}
