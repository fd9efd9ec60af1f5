//! The lookup facade.

mod builder;

pub use builder::BotBuilder;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::chooser::ResponseChooser;
use crate::reload::{ChangeNotifier, ReloadCoordinator, ReloadReport};
use crate::resolver::{self, Match};
use crate::rules::RuleSet;
use crate::telemetry;
use crate::Result;

/// A rule-file chatbot: cache in front of the resolver, rules kept fresh by
/// the reload coordinator.
///
/// `Bot` is `Send + Sync`; share it behind an `Arc` to answer prompts from
/// several tasks or threads at once. Background reload tasks stop when the
/// bot is dropped.
pub struct Bot {
    coordinator: Arc<ReloadCoordinator>,
    cache: Arc<ResponseCache>,
    chooser: Arc<dyn ResponseChooser>,
    notifier: Option<ChangeNotifier>,
    tasks: Vec<JoinHandle<()>>,
}

impl Bot {
    /// Create a new builder for configuring the bot.
    pub fn builder() -> BotBuilder {
        BotBuilder::new()
    }

    /// Answer `prompt` with one randomly chosen response, or `None` when no
    /// rule matches.
    ///
    /// Never blocks on a reload: it reads whichever rule set is published.
    pub fn lookup(&self, prompt: &str) -> Option<String> {
        if let Some(responses) = self.cache.get(prompt) {
            metrics::counter!(telemetry::LOOKUPS_TOTAL, "tier" => "cached").increment(1);
            return Some(responses.choose(self.chooser.as_ref()).to_string());
        }

        let rules = self.coordinator.current_rule_set();
        let Some(found) = resolver::resolve(prompt, &rules) else {
            metrics::counter!(telemetry::LOOKUPS_TOTAL, "tier" => "none").increment(1);
            debug!(generation = rules.generation(), "no rule matched");
            return None;
        };
        metrics::counter!(telemetry::LOOKUPS_TOTAL, "tier" => found.tier.as_str()).increment(1);
        debug!(
            tier = %found.tier,
            line = found.line,
            generation = rules.generation(),
            "rule matched"
        );

        self.cache.put(prompt, found.responses.clone());
        // A reload may have published and cleared the cache while we were
        // resolving against the old rules; don't leave that answer behind.
        if self.coordinator.generation() != rules.generation() {
            self.cache.invalidate(prompt);
        }

        Some(found.responses.choose(self.chooser.as_ref()).to_string())
    }

    /// Resolve `prompt` against the active rules without touching the cache.
    pub fn resolve(&self, prompt: &str) -> Option<Match> {
        resolver::resolve(prompt, &self.coordinator.current_rule_set())
    }

    /// Reload the rules now, regardless of any change signal.
    pub async fn reload(&self) -> Result<ReloadReport> {
        self.coordinator.on_change_signal().await
    }

    /// Snapshot of the active rule set.
    pub fn rule_set(&self) -> Arc<RuleSet> {
        self.coordinator.current_rule_set()
    }

    /// Generation of the active rule set (1 after the initial load).
    pub fn generation(&self) -> u64 {
        self.coordinator.generation()
    }

    /// Signal to fire when the rules changed. `None` unless the bot was built
    /// with [`BotBuilder::reload_on_change`].
    pub fn notifier(&self) -> Option<&ChangeNotifier> {
        self.notifier.as_ref()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn coordinator(&self) -> &Arc<ReloadCoordinator> {
        &self.coordinator
    }
}

impl Drop for Bot {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
