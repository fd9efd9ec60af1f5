//! Lifecycle of the active rule set.
//!
//! [`ReloadCoordinator`] owns the published [`RuleSet`] and replaces it when
//! the rule source changes:
//!
//! ```text
//! watcher ── ChangeNotifier::notify ──> ChangeSubscription
//!                                          │  spawn_listener
//!                                          v
//!                     RuleSource::read_raw ─> rules::parse ─> publish ─> invalidate cache
//! ```
//!
//! Publishing swaps an `Arc<RuleSet>` under a write lock held only for the
//! assignment, so readers see either the old set or the new one in full.
//! A failed read leaves the old set in place.

mod signal;
pub mod watcher;

pub use signal::{ChangeNotifier, ChangeSubscription, change_signal};

use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::cache::ResponseCache;
use crate::error::FormatError;
use crate::rules::{self, RuleSet};
use crate::source::RuleSource;
use crate::telemetry;
use crate::Result;

/// What to do with cached responses after a successful reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Drop every cached entry; lookups re-resolve against the new rules.
    #[default]
    ClearAll,
    /// Keep cached entries until their TTL runs out. Only sensible with a
    /// TTL that is short compared to how often rules change.
    ExpireNaturally,
}

/// Summary of one successful (re)load.
#[derive(Debug, Clone)]
pub struct ReloadReport {
    /// Generation of the newly published rule set.
    pub generation: u64,
    pub exact_rules: usize,
    pub conditional_rules: usize,
    /// Lines the parser skipped.
    pub skipped: Vec<FormatError>,
}

/// Owns the published rule set and reloads it on demand.
pub struct ReloadCoordinator {
    source: Arc<dyn RuleSource>,
    cache: Arc<ResponseCache>,
    policy: InvalidationPolicy,
    active: RwLock<Arc<RuleSet>>,
    reload_lock: Mutex<()>,
}

impl ReloadCoordinator {
    /// Read and parse the initial rules.
    ///
    /// Fails if the source cannot be read: there is nothing to serve without
    /// an initial rule set.
    pub async fn load(
        source: Arc<dyn RuleSource>,
        cache: Arc<ResponseCache>,
        policy: InvalidationPolicy,
    ) -> Result<Self> {
        let raw = source.read_raw().await.inspect_err(|e| {
            metrics::counter!(telemetry::RELOADS_TOTAL, "status" => "error").increment(1);
            error!(source = %source.describe(), error = %e, "initial rule load failed");
        })?;

        let parsed = rules::parse(&raw);
        let rule_set = Arc::new(parsed.rule_set.with_generation(1));
        let report = report_for(&rule_set, parsed.errors);
        log_loaded(source.as_ref(), &report);

        Ok(Self {
            source,
            cache,
            policy,
            active: RwLock::new(rule_set),
            reload_lock: Mutex::new(()),
        })
    }

    /// The latest successfully published rule set.
    pub fn current_rule_set(&self) -> Arc<RuleSet> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generation of the published rule set.
    pub fn generation(&self) -> u64 {
        self.current_rule_set().generation()
    }

    pub fn policy(&self) -> InvalidationPolicy {
        self.policy
    }

    /// Re-read the source, re-parse and publish the result.
    ///
    /// Reloads are serialized. On a read error the previous rule set stays
    /// active and the error is returned after being logged.
    pub async fn on_change_signal(&self) -> Result<ReloadReport> {
        let _guard = self.reload_lock.lock().await;

        let raw = match self.source.read_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                metrics::counter!(telemetry::RELOADS_TOTAL, "status" => "error").increment(1);
                error!(
                    source = %self.source.describe(),
                    error = %e,
                    generation = self.generation(),
                    "rule reload failed, keeping previous rules"
                );
                return Err(e);
            }
        };

        let parsed = rules::parse(&raw);
        let generation = self.generation() + 1;
        let rule_set = Arc::new(parsed.rule_set.with_generation(generation));
        let report = report_for(&rule_set, parsed.errors);

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = rule_set;

        if self.policy == InvalidationPolicy::ClearAll {
            self.cache.invalidate_all();
        }

        log_loaded(self.source.as_ref(), &report);
        Ok(report)
    }

    /// Reload in the background every time `subscription` fires.
    ///
    /// Failed reloads are logged and the task keeps listening. The task ends
    /// when every notifier is dropped or the handle is aborted.
    pub fn spawn_listener(self: &Arc<Self>, mut subscription: ChangeSubscription) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while subscription.changed().await {
                // Errors are already reported by on_change_signal.
                let _ = coordinator.on_change_signal().await;
            }
            info!("change signal closed, reload listener stopping");
        })
    }
}

fn report_for(rule_set: &RuleSet, skipped: Vec<FormatError>) -> ReloadReport {
    ReloadReport {
        generation: rule_set.generation(),
        exact_rules: rule_set.exact().len(),
        conditional_rules: rule_set.conditional().len(),
        skipped,
    }
}

fn log_loaded(source: &dyn RuleSource, report: &ReloadReport) {
    for skipped in &report.skipped {
        warn!(
            source = %source.describe(),
            line = skipped.line,
            content = %skipped.content,
            reason = %skipped.kind,
            "skipping malformed rule line"
        );
    }
    metrics::counter!(telemetry::SKIPPED_LINES_TOTAL).increment(report.skipped.len() as u64);
    metrics::counter!(telemetry::RELOADS_TOTAL, "status" => "ok").increment(1);
    metrics::gauge!(telemetry::ACTIVE_RULES, "kind" => "exact").set(report.exact_rules as f64);
    metrics::gauge!(telemetry::ACTIVE_RULES, "kind" => "conditional")
        .set(report.conditional_rules as f64);
    info!(
        source = %source.describe(),
        generation = report.generation,
        exact = report.exact_rules,
        conditional = report.conditional_rules,
        skipped = report.skipped.len(),
        "rules loaded"
    );
}
