//! Resolved settings: `config.toml` merged with command-line overrides.

use std::path::PathBuf;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use prefill_infra::config::{CONFIG_FILE, load_config, resolve_config_dir};
use prefill_infra::llm::{API_KEY_ENV, api_key_from_env};
use prefill_types::config::FileConfig;

use super::Overrides;

/// Settings after loading the config file and applying CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub file: FileConfig,
}

impl Settings {
    /// Load `config.toml` and apply the global overrides on top.
    pub async fn load(overrides: &Overrides) -> Self {
        let config_dir = overrides
            .config_dir
            .clone()
            .unwrap_or_else(resolve_config_dir);
        let file = load_config(&config_dir).await;
        Self {
            config_dir,
            file: apply_overrides(file, overrides),
        }
    }

    /// Apply the chat-only flags.
    ///
    /// Speakers given on the command line replace the configured roster. A
    /// `--prefix` replaces both the configured prefix and the roster, since
    /// a roster always wins over a static prefix.
    pub fn with_chat_flags(mut self, speakers: Vec<String>, prefix: Option<String>) -> Self {
        if !speakers.is_empty() {
            self.file.speakers = speakers;
        }
        if let Some(prefix) = prefix {
            self.file.prefix = Some(prefix);
            self.file.speakers.clear();
        }
        self
    }
}

fn apply_overrides(mut file: FileConfig, overrides: &Overrides) -> FileConfig {
    if let Some(model) = &overrides.model {
        file.model = model.clone();
    }
    if let Some(max_tokens) = overrides.max_tokens {
        file.max_tokens = max_tokens;
    }
    if let Some(temperature) = overrides.temperature {
        file.temperature = Some(temperature);
    }
    if let Some(system) = &overrides.system {
        file.system = Some(system.clone());
    }
    if let Some(base_url) = &overrides.base_url {
        file.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = overrides.timeout {
        file.request_timeout_secs = timeout;
    }
    file
}

/// Print the resolved configuration.
pub fn show_config(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let file = &settings.file;
    let config_path = settings.config_dir.join(CONFIG_FILE);
    let has_key = api_key_from_env().is_some();

    if json {
        let value = serde_json::json!({
            "config_path": config_path.display().to_string(),
            "config_found": config_path.exists(),
            "api_key_set": has_key,
            "settings": file,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    let unset = || Cell::new("(not set)").fg(Color::DarkGrey);
    let opt = |value: Option<String>| value.map(Cell::new).unwrap_or_else(unset);

    table.add_row(vec![Cell::new("model"), Cell::new(&file.model)]);
    table.add_row(vec![Cell::new("max_tokens"), Cell::new(file.max_tokens)]);
    table.add_row(vec![
        Cell::new("temperature"),
        opt(file.temperature.map(|t| t.to_string())),
    ]);
    table.add_row(vec![Cell::new("system"), opt(file.system.clone())]);
    table.add_row(vec![
        Cell::new("prefix"),
        opt(file.prefix.as_ref().map(|p| format!("{p:?}"))),
    ]);
    table.add_row(vec![
        Cell::new("speakers"),
        if file.speakers.is_empty() {
            unset()
        } else {
            Cell::new(file.speakers.join(", "))
        },
    ]);
    table.add_row(vec![Cell::new("base_url"), opt(file.base_url.clone())]);
    table.add_row(vec![
        Cell::new("request_timeout_secs"),
        Cell::new(file.request_timeout_secs),
    ]);
    table.add_row(vec![
        Cell::new(API_KEY_ENV),
        if has_key {
            Cell::new("set").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Red)
        },
    ]);

    println!();
    println!(
        "  {} {}",
        style("Config:").bold(),
        style(config_path.display()).dim()
    );
    println!("{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(file: FileConfig) -> Settings {
        Settings {
            config_dir: PathBuf::from("/tmp/prefill-test"),
            file,
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let overrides = Overrides {
            model: Some("claude-3-5-haiku-20241022".to_string()),
            max_tokens: Some(64),
            system: Some("Answer in French.".to_string()),
            timeout: Some(5),
            ..Overrides::default()
        };
        let file = apply_overrides(FileConfig::default(), &overrides);
        assert_eq!(file.model, "claude-3-5-haiku-20241022");
        assert_eq!(file.max_tokens, 64);
        assert_eq!(file.system.as_deref(), Some("Answer in French."));
        assert_eq!(file.request_timeout_secs, 5);
        assert!(file.base_url.is_none());
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let file = FileConfig {
            max_tokens: 300,
            prefix: Some("Certainly".to_string()),
            ..FileConfig::default()
        };
        let merged = apply_overrides(file, &Overrides::default());
        assert_eq!(merged.max_tokens, 300);
        assert_eq!(merged.prefix.as_deref(), Some("Certainly"));
    }

    #[test]
    fn test_cli_speakers_replace_roster() {
        let file = FileConfig {
            speakers: vec!["Marlowe".to_string()],
            ..FileConfig::default()
        };
        let s = settings(file).with_chat_flags(vec!["Hamlet".to_string()], None);
        assert_eq!(s.file.speakers, vec!["Hamlet"]);
    }

    #[test]
    fn test_cli_prefix_clears_configured_roster() {
        let file = FileConfig {
            speakers: vec!["Marlowe".to_string()],
            ..FileConfig::default()
        };
        let s = settings(file).with_chat_flags(Vec::new(), Some("Bonjour".to_string()));
        assert!(s.file.speakers.is_empty());
        assert_eq!(s.file.prefix.as_deref(), Some("Bonjour"));
    }
}
