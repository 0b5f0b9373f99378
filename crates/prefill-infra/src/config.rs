//! Configuration loader for Prefill.
//!
//! Reads `config.toml` from the config directory (`~/.prefill/` by default)
//! and deserializes it into [`FileConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use prefill_types::config::FileConfig;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "PREFILL_CONFIG_DIR";

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the config directory.
///
/// Priority:
/// 1. `PREFILL_CONFIG_DIR` environment variable
/// 2. `~/.prefill`
/// 3. `.prefill` in the current directory
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".prefill");
    }

    PathBuf::from(".prefill")
}

/// Load configuration from `{config_dir}/config.toml`.
///
/// - If the file does not exist, returns [`FileConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(config_dir: &Path) -> FileConfig {
    let config_path = config_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return FileConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return FileConfig::default();
        }
    };

    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            FileConfig::default()
        }
    }
}
