use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub syntax_theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub line_numbers: bool,
    pub syntax_highlighting: bool,
    /// Rows kept between the cursor and the window edge before the viewport
    /// scrolls with it.
    pub scroll_margin: usize,
    /// Maximum number of undoable edit batches retained.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme {
                name: String::from("dark"),
                syntax_theme: String::from("base16-ocean.dark"),
            },
            editor: EditorConfig {
                line_numbers: true,
                syntax_highlighting: true,
                scroll_margin: 10,
                history_limit: 50,
            },
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) if content.trim().is_empty() => {
                        log::warn!("Config file is empty, recreating it");
                    }
                    Ok(content) => match serde_json::from_str::<Self>(&content) {
                        Ok(mut config) => {
                            config.validate();
                            log::info!("Loaded config from {}", config_path.display());
                            return Ok(config);
                        }
                        Err(parse_err) => {
                            log::error!("Failed to parse config file: {parse_err}");
                            // Keep the broken file around for the user.
                            let backup_path = config_path.with_extension("bak");
                            if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                log::warn!("Failed to back up broken config: {e}");
                            } else {
                                log::info!("Backed up broken config to {}", backup_path.display());
                            }
                        }
                    },
                    Err(io_err) => {
                        log::error!("Failed to read config file: {io_err}");
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        let Some(config_path) = Self::config_path() else {
            return Ok(());
        };

        let mut config_to_save = self.clone();
        config_to_save.validate();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!("failed to create config directory {}: {e}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(&config_to_save)?;
        tokio::fs::write(&config_path, content).await.map_err(|e| {
            anyhow::anyhow!("failed to write config file {}: {e}", config_path.display())
        })?;
        log::info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Replaces out-of-range or empty values with their defaults.
    pub fn validate(&mut self) {
        let defaults = Config::default();

        if self.editor.scroll_margin > 100 {
            log::warn!(
                "Invalid scroll margin: {}, using default",
                self.editor.scroll_margin
            );
            self.editor.scroll_margin = defaults.editor.scroll_margin;
        }

        if self.editor.history_limit == 0 || self.editor.history_limit > 10_000 {
            log::warn!(
                "Invalid history limit: {}, using default",
                self.editor.history_limit
            );
            self.editor.history_limit = defaults.editor.history_limit;
        }

        if self.theme.name.is_empty() {
            log::warn!("Empty theme name, using default");
            self.theme.name = defaults.theme.name;
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = defaults.theme.syntax_theme;
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STILUS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("STILUS_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "stilus", "stilus")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
