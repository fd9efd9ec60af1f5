//! Tests for metrics emitted by lookups, the response cache and reloads.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use botcreator::source::MemoryRuleSource;
use botcreator::{Bot, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Counter value for `name` restricted to entries carrying `label = value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_gauge(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Gauge && key.key().name() == name)
}

/// Run `f` against a fresh local recorder and return what it captured.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
fn record<F, Fut>(f: F) -> SnapshotVec
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(f()))
    });
    snapshotter.snapshot().into_vec()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn lookups_are_counted_per_tier() {
    let snapshot = record(|| async {
        let bot = Bot::builder()
            .rules_text("hello/Hi\nweather&today/Sunny\nbye/Later")
            .build()
            .await
            .unwrap();
        bot.lookup("hello");
        bot.lookup("weather today");
        bot.lookup("goodbye now");
        bot.lookup("nothing here");
    });

    assert_eq!(counter_total(&snapshot, telemetry::LOOKUPS_TOTAL), 4);
    for tier in ["exact", "conditional", "partial", "none"] {
        assert_eq!(
            counter_with_label(&snapshot, telemetry::LOOKUPS_TOTAL, "tier", tier),
            1,
            "expected one {tier} lookup"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let snapshot = record(|| async {
        let bot = Bot::builder().rules_text("hello/Hi").build().await.unwrap();
        bot.lookup("hello");
        bot.lookup("hello");
        bot.lookup("hello");
    });

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::LOOKUPS_TOTAL, "tier", "cached"),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn reloads_and_skipped_lines_are_counted() {
    let snapshot = record(|| async {
        let source = Arc::new(MemoryRuleSource::new("hello/Hi\nbroken/a/b"));
        let bot = Bot::builder().source(source.clone()).build().await.unwrap();
        source.set("hello/Hi\nempty/\nalso/bad/line");
        bot.reload().await.unwrap();
    });

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RELOADS_TOTAL, "status", "ok"),
        2
    );
    assert_eq!(counter_total(&snapshot, telemetry::SKIPPED_LINES_TOTAL), 3);
    assert!(has_gauge(&snapshot, telemetry::ACTIVE_RULES));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_initial_load_is_counted() {
    let snapshot = record(|| async {
        let result = Bot::builder()
            .rules_file("/nonexistent/botcreator/rules.txt")
            .build()
            .await;
        assert!(result.is_err());
    });

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RELOADS_TOTAL, "status", "error"),
        1
    );
}
