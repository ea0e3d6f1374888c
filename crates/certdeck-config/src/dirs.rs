//! Data directory initialization.
//!
//! Makes sure the data directory exists and holds a default `config.toml`.
//! Called once at startup.

use std::path::Path;

use certdeck_common::paths;

/// Default content for a freshly created config.toml.
pub(crate) const DEFAULT_CONFIG_TOML: &str = "\
# certdeck configuration

# [store]
# key = \"certificates\"

# [view]
# default_sort = \"expiration-asc\"
";

/// Ensure `data_dir`, its `logs/` subdirectory and `config.toml` exist.
///
/// Errors are logged but not fatal. The store reports its own write
/// failures if the directory really is unusable.
pub fn ensure_data_dir(data_dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(data_dir) {
        tracing::warn!(
            path = %data_dir.display(),
            error = %e,
            "Could not create data directory"
        );
        return;
    }

    let logs = paths::log_dir(data_dir);
    if let Err(e) = std::fs::create_dir_all(&logs) {
        tracing::warn!(path = %logs.display(), error = %e, "Could not create log directory");
    }

    let config_path = paths::config_path(data_dir);
    if !config_path.exists() {
        match std::fs::write(&config_path, DEFAULT_CONFIG_TOML) {
            Ok(()) => tracing::debug!(path = %config_path.display(), "Created default config"),
            Err(e) => tracing::warn!(
                path = %config_path.display(),
                error = %e,
                "Could not write default config"
            ),
        }
    }

    tracing::debug!(path = %data_dir.display(), "Data directory ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("certdeck-dirs-{name}-{nanos}"))
    }

    #[test]
    fn default_config_is_valid_toml() {
        let parsed: Result<toml::Value, _> = DEFAULT_CONFIG_TOML.parse();
        assert!(parsed.is_ok(), "Default config.toml should be valid TOML");
    }

    #[test]
    fn creates_layout_and_default_config() {
        let dir = temp_dir("fresh").join("nested");
        ensure_data_dir(&dir);
        assert!(dir.join("logs").is_dir());
        let written = std::fs::read_to_string(dir.join("config.toml")).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TOML);
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn existing_config_is_left_alone() {
        let dir = temp_dir("existing");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[store]\nkey = \"mine\"\n").unwrap();
        ensure_data_dir(&dir);
        let kept = std::fs::read_to_string(dir.join("config.toml")).unwrap();
        assert!(kept.contains("mine"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unusable_path_does_not_panic() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("plain-file");
        std::fs::write(&file, "x").unwrap();
        ensure_data_dir(&file.join("data"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
