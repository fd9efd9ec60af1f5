//! Telemetry metric name constants.
//!
//! Centralised metric names for botcreator operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `botcreator_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `tier`: resolution tier: "exact", "conditional", "partial", "none", or
//!   "cached" when the answer came from the response cache
//! - `status`: outcome: "ok" or "error"
//! - `kind`: rule kind: "exact" or "conditional"

/// Total lookups answered, including cache hits.
///
/// Labels: `tier`.
pub const LOOKUPS_TOTAL: &str = "botcreator_lookups_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "botcreator_cache_hits_total";

/// Total response cache misses (disabled cache counts as a miss).
pub const CACHE_MISSES_TOTAL: &str = "botcreator_cache_misses_total";

/// Total rule reloads attempted, including the initial load.
///
/// Labels: `status` ("ok" | "error").
pub const RELOADS_TOTAL: &str = "botcreator_reloads_total";

/// Total malformed rule lines skipped by the parser.
pub const SKIPPED_LINES_TOTAL: &str = "botcreator_skipped_lines_total";

/// Number of rules in the active rule set.
///
/// Labels: `kind`.
pub const ACTIVE_RULES: &str = "botcreator_active_rules";
