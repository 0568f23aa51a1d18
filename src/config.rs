//! Application-level configuration loading, including the easy-item policy.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::models::{BingoItemEntity, ItemCategory};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ECO_BINGO_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    easy_policy: EasyItemPolicy,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        policy_version = app_config.easy_policy.version,
                        "loaded easy-item policy from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// The policy deciding which catalog items count as "easy".
    pub fn easy_policy(&self) -> &EasyItemPolicy {
        &self.easy_policy
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            easy_policy: EasyItemPolicy::default(),
        }
    }
}

/// Versioned rule set deciding which items qualify for easy auto-completion:
/// a set of qualifying categories plus a set of ease-signaling keyword
/// substrings matched case-insensitively against the item text.
#[derive(Debug, Clone)]
pub struct EasyItemPolicy {
    /// Monotonic policy revision, logged so operators can tell which rule
    /// set a deployment runs.
    pub version: u32,
    /// Categories whose items always qualify.
    pub categories: Vec<ItemCategory>,
    /// Lowercase substrings that mark an item text as easy.
    pub keywords: Vec<String>,
}

impl EasyItemPolicy {
    /// Whether an item qualifies for easy auto-completion.
    pub fn qualifies(&self, item: &BingoItemEntity) -> bool {
        if self.categories.contains(&item.category) {
            return true;
        }

        let text = item.text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }
}

impl Default for EasyItemPolicy {
    fn default() -> Self {
        Self {
            version: 1,
            categories: vec![ItemCategory::Digital, ItemCategory::Energy],
            keywords: [
                "turn off",
                "switch off",
                "unplug",
                "recycle",
                "reuse",
                "refill",
                "stairs",
                "walk",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    easy_policy: RawEasyPolicy,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            easy_policy: value.easy_policy.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the easy-item policy.
struct RawEasyPolicy {
    version: u32,
    categories: Vec<ItemCategory>,
    keywords: Vec<String>,
}

impl From<RawEasyPolicy> for EasyItemPolicy {
    fn from(value: RawEasyPolicy) -> Self {
        Self {
            version: value.version,
            categories: value.categories,
            // Keywords match case-insensitively; normalise once at load time.
            keywords: value
                .keywords
                .into_iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
