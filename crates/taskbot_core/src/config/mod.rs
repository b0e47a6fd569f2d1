use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOT_CONFIG_PATH";
pub const API_KEY_ENV_VAR: &str = "TASKBOT_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderProvider {
    /// Hosted chat-completion service, authenticated with an API key.
    #[default]
    Hosted,
    /// A locally served pretrained model speaking the same wire format.
    Local,
}

impl ResponderProvider {
    fn parse(raw: &str) -> Option<Self> {
        match canonical_key(raw)?.as_str() {
            "hosted" | "openai" | "api" => Some(Self::Hosted),
            "local" | "model" | "offline" => Some(Self::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    pub provider: ResponderProvider,
    pub model: String,
    pub base_url: String,
    pub api_key_file: String,
    pub max_history_messages: usize,
    pub timeout_secs: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            provider: ResponderProvider::Hosted,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_file: "config/apikey.txt".to_string(),
            max_history_messages: 20,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store_path: Option<String>,
    #[serde(default)]
    pub responder: ResponderConfig,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StorePath,
    Provider,
    Model,
    BaseUrl,
    ApiKeyFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskbot")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskbot")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

/// Parse a raw `KEY=VALUE` override such as `responder.model=gpt-4o`.
pub fn parse_config_override(raw: &str) -> Result<ConfigOverride, AppError> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| AppError::invalid_input("override must be in KEY=VALUE format"))?;

    let segments = key_raw
        .split('.')
        .map(canonical_key)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AppError::invalid_input("override key cannot be empty"))?;
    let key: Vec<&str> = segments.iter().map(String::as_str).collect();

    let target = match key.as_slice() {
        ["store_path"] | ["store"] => ConfigOverrideTarget::StorePath,
        ["responder", "provider"] | ["provider"] => ConfigOverrideTarget::Provider,
        ["responder", "model"] | ["model"] => ConfigOverrideTarget::Model,
        ["responder", "base_url"] | ["base_url"] => ConfigOverrideTarget::BaseUrl,
        ["responder", "api_key_file"] | ["api_key_file"] => ConfigOverrideTarget::ApiKeyFile,
        _ => {
            return Err(AppError::invalid_input(format!(
                "unknown config field '{}'",
                key_raw.trim()
            )));
        }
    };

    let value = value_raw.trim().to_string();
    if target == ConfigOverrideTarget::Provider && ResponderProvider::parse(&value).is_none() {
        return Err(AppError::invalid_input(format!(
            "unknown responder provider '{value}'"
        )));
    }

    Ok(ConfigOverride { target, value })
}

pub fn merge_overrides(base: &Config, overrides: &[ConfigOverride]) -> Config {
    let mut merged = base.clone();

    for item in overrides {
        let value = item.value.clone();
        match item.target {
            ConfigOverrideTarget::StorePath => merged.store_path = Some(value),
            ConfigOverrideTarget::Provider => {
                if let Some(provider) = ResponderProvider::parse(&value) {
                    merged.responder.provider = provider;
                }
            }
            ConfigOverrideTarget::Model => merged.responder.model = value,
            ConfigOverrideTarget::BaseUrl => merged.responder.base_url = value,
            ConfigOverrideTarget::ApiKeyFile => merged.responder.api_key_file = value,
        }
    }

    merged
}

pub fn load_api_key(config: &ResponderConfig) -> Result<String, AppError> {
    resolve_api_key(std::env::var(API_KEY_ENV_VAR).ok(), config)
}

pub(crate) fn resolve_api_key(env_value: Option<String>, config: &ResponderConfig) -> Result<String, AppError> {
    if let Some(key) = env_value
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    let path = Path::new(&config.api_key_file);
    let content = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => AppError::config_missing(format!(
            "API key file not found at {}; create it or set {}",
            path.display(),
            API_KEY_ENV_VAR
        )),
        _ => AppError::io(format!("failed to read API key file {}: {err}", path.display())),
    })?;

    let key = content.trim();
    if key.is_empty() {
        return Err(AppError::config_missing(format!(
            "API key file {} is empty",
            path.display()
        )));
    }

    Ok(key.to_string())
}

fn canonical_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
