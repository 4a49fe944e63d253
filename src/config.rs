use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// On-disk client configuration, stored as YAML under `~/.mmchat/`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mmchat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Path of the persisted conversation history document.
    pub fn history_path() -> PathBuf {
        Self::config_dir().join("history.json")
    }

    /// Path of the line-editor input history.
    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, ChatError> {
        let path = Self::config_path();
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            return Ok(config);
        }

        let config = Config::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ChatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yml::to_string(self)?;
        fs::write(&path, yaml)?;
        Ok(())
    }

    /// Resolve the bearer credential: config first, then environment.
    pub fn resolve_api_key(&self) -> Result<String, ChatError> {
        let key = match &self.api_key {
            Some(key) => key.clone(),
            None => env::var("OPENROUTER_API_KEY").map_err(|_| {
                ChatError::Config(
                    "OPENROUTER_API_KEY must be set from config or environment variable"
                        .to_string(),
                )
            })?,
        };

        if key.trim().is_empty() {
            return Err(ChatError::Config(
                "OPENROUTER_API_KEY cannot be empty".to_string(),
            ));
        }
        Ok(key)
    }
}
