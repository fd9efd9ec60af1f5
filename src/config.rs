//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag); must exist when given
//! 2. `~/.botcreator/config.toml` (user)
//! 3. `/etc/botcreator/config.toml` (system)
//!
//! With no file in any location the defaults apply.
//!
//! ```toml
//! [rules]
//! path = "rules.txt"
//! reload_on_change = true
//! poll_interval_ms = 2000
//! invalidation = "clear_all"
//!
//! [cache]
//! ttl_secs = 300     # 0 disables caching
//! capacity = 1000
//! strict_eviction = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::reload::InvalidationPolicy;
use crate::{BotError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Rule source and reload settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule file to load. Relative paths resolve against the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Watch the rule file and reload on change (default: false).
    #[serde(default)]
    pub reload_on_change: bool,
    /// File polling interval in milliseconds (default: 2000).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// What happens to cached responses after a reload (default: clear_all).
    #[serde(default)]
    pub invalidation: InvalidationPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: None,
            reload_on_change: false,
            poll_interval_ms: default_poll_interval_ms(),
            invalidation: InvalidationPolicy::default(),
        }
    }
}

impl RulesConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    /// Entry lifetime in seconds; 0 disables caching (default: 300).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum cached prompts (default: 1000).
    #[serde(default = "default_capacity")]
    pub capacity: u64,
    /// Evict on every insert for exact LRU order (default: true).
    #[serde(default = "default_strict_eviction")]
    pub strict_eviction: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
            strict_eviction: default_strict_eviction(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_capacity() -> u64 {
    1_000
}

fn default_strict_eviction() -> bool {
    true
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        CacheConfig::new()
            .max_entries(settings.capacity)
            .ttl(Duration::from_secs(settings.ttl_secs))
            .strict_eviction(settings.strict_eviction)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.botcreator/config.toml`
    /// 3. `/etc/botcreator/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BotError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| BotError::Configuration(format!("Invalid config file {path:?}: {e}")))
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| BotError::Configuration(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.rules.reload_on_change && self.rules.poll_interval_ms == 0 {
            return Err(BotError::Configuration(
                "rules.poll_interval_ms must be greater than 0 when reload_on_change is set"
                    .to_string(),
            ));
        }
        if self.rules.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(BotError::Configuration(
                "rules.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Cache configuration derived from the `[cache]` section.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::from(&self.cache)
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(BotError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".botcreator").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/botcreator/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
