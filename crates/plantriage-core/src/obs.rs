//! Structured observability hooks for triage runs.
//!
//! Events are emitted at `info!` level; errors at `warn!`. Filtering follows
//! `RUST_LOG`, see [`crate::telemetry::init_tracing`].

use tracing::info;

use crate::domain::{Constraints, Verdict};

/// RAII guard that enters a span tagged with the analysis source for the
/// duration of one triage run.
///
/// ```ignore
/// let _span = TriageSpan::enter("plans/q17.json");
/// // every event below carries source = "plans/q17.json"
/// ```
pub struct TriageSpan {
    _span: tracing::span::EnteredSpan,
}

impl TriageSpan {
    pub fn enter(source: &str) -> Self {
        let span = tracing::info_span!("plantriage.run", source = %source);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: triage started for an analysis with `bottleneck_count` entries.
pub fn emit_triage_started(source: &str, bottleneck_count: usize) {
    info!(
        event = "triage.started",
        source = %source,
        bottleneck_count = bottleneck_count,
    );
}

/// Emit event: verdict produced.
pub fn emit_triage_evaluated(verdict: &Verdict, total_cost: f64, constraints: &Constraints) {
    info!(
        event = "triage.evaluated",
        status = %verdict.status,
        priority = %verdict.priority,
        total_cost = total_cost,
        max_cost = ?constraints.max_cost,
    );
}

/// Emit event: triage aborted (warning level).
pub fn emit_triage_error(error: &dyn std::fmt::Display) {
    tracing::warn!(event = "triage.error", error = %error);
}
