//! Builder for configuring bot instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::Bot;
use crate::cache::{CacheConfig, Clock, ResponseCache, SystemClock};
use crate::chooser::{ResponseChooser, ThreadRngChooser};
use crate::config::Config;
use crate::reload::watcher::{DEFAULT_POLL_INTERVAL, spawn_file_watcher};
use crate::reload::{InvalidationPolicy, ReloadCoordinator, change_signal};
use crate::source::{FileRuleSource, MemoryRuleSource, RuleSource};
use crate::{BotError, Result};

/// Builder for configuring bot instances.
///
/// ```rust,no_run
/// # use botcreator::{Bot, CacheConfig};
/// # use std::time::Duration;
/// # async fn run() -> botcreator::Result<()> {
/// let bot = Bot::builder()
///     .rules_file("rules.txt")
///     .cache(CacheConfig::new().ttl(Duration::from_secs(60)))
///     .reload_on_change(true)
///     .build()
///     .await?;
/// println!("{:?}", bot.lookup("hello"));
/// # Ok(())
/// # }
/// ```
pub struct BotBuilder {
    source: Option<Arc<dyn RuleSource>>,
    watch_path: Option<PathBuf>,
    cache_config: CacheConfig,
    clock: Arc<dyn Clock>,
    chooser: Arc<dyn ResponseChooser>,
    reload_on_change: bool,
    poll_interval: Duration,
    policy: InvalidationPolicy,
}

impl BotBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            watch_path: None,
            cache_config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
            chooser: Arc::new(ThreadRngChooser),
            reload_on_change: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: InvalidationPolicy::default(),
        }
    }

    /// Apply a loaded [`Config`]: rule file, cache and reload settings.
    pub fn from_config(mut self, config: &Config) -> Self {
        if let Some(ref path) = config.rules.path {
            self = self.rules_file(path);
        }
        self.cache_config = config.cache_config();
        self.reload_on_change = config.rules.reload_on_change;
        self.poll_interval = config.rules.poll_interval();
        self.policy = config.rules.invalidation;
        self
    }

    /// Load rules from a file. With [`reload_on_change`](Self::reload_on_change)
    /// the file is also polled for edits.
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.source = Some(Arc::new(FileRuleSource::new(path.clone())));
        self.watch_path = Some(path);
        self
    }

    /// Use fixed rule text held in memory.
    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(Arc::new(MemoryRuleSource::new(text)));
        self.watch_path = None;
        self
    }

    /// Use a custom rule source. Nothing is polled; fire the bot's
    /// [`notifier`](Bot::notifier) when the source changes.
    pub fn source(mut self, source: Arc<dyn RuleSource>) -> Self {
        self.source = Some(source);
        self.watch_path = None;
        self
    }

    /// Configure the response cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Turn the response cache off.
    pub fn disable_cache(mut self) -> Self {
        self.cache_config = CacheConfig::disabled();
        self
    }

    /// Time source for cache expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Randomness used to pick a response.
    pub fn chooser(mut self, chooser: Arc<dyn ResponseChooser>) -> Self {
        self.chooser = chooser;
        self
    }

    /// Subscribe to change signals and reload in the background.
    pub fn reload_on_change(mut self, enabled: bool) -> Self {
        self.reload_on_change = enabled;
        self
    }

    /// How often a rule file is polled when reloading on change.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// What happens to cached responses after a reload.
    pub fn invalidation_policy(mut self, policy: InvalidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the initial rules and start background tasks.
    ///
    /// Fails if no rule source was configured or the initial read fails.
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Bot> {
        let source = self.source.ok_or_else(|| {
            BotError::Configuration("no rule source configured".to_string())
        })?;
        if self.reload_on_change && self.poll_interval.is_zero() {
            return Err(BotError::Configuration(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        let cache = Arc::new(ResponseCache::with_clock(&self.cache_config, self.clock));
        let coordinator =
            Arc::new(ReloadCoordinator::load(source, Arc::clone(&cache), self.policy).await?);

        let mut tasks = Vec::new();
        let mut notifier = None;
        if self.reload_on_change {
            let (tx, rx) = change_signal();
            tasks.push(coordinator.spawn_listener(rx));
            if let Some(path) = self.watch_path {
                tasks.push(spawn_file_watcher(path, self.poll_interval, tx.clone()));
            }
            notifier = Some(tx);
        }

        info!(
            cache_enabled = cache.is_enabled(),
            reload_on_change = self.reload_on_change,
            "bot ready"
        );

        Ok(Bot {
            coordinator,
            cache,
            chooser: self.chooser,
            notifier,
            tasks,
        })
    }
}

impl Default for BotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
