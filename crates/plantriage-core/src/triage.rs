//! Triage rules engine.
//!
//! Evaluates an [`Analysis`] against [`Constraints`] to produce a [`Verdict`]:
//! the pass/warning/fail decision surfaced to users or handed to a richer
//! explanation layer. Pure and deterministic, so it doubles as the reference
//! path in CI where model output is unwanted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    render_cost, Analysis, Constraints, Priority, Result, Verdict, VerdictStatus,
};

/// Suggestion attached to every passing verdict.
pub const NO_OPTIMIZATION_NEEDED: &str = "No optimization needed.";

/// Reason attached to every warning verdict.
pub const POTENTIAL_OPTIMIZATIONS: &str =
    "Query meets constraints but has potential optimizations.";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The rule that decided a verdict, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageRule {
    /// Cost exceeds the limit and a `HIGH` bottleneck explains it.
    ConstraintViolation,
    /// Nothing to optimize.
    WithinLimit,
    /// Bottlenecks exist but none justified a failure.
    Fallback,
}

impl TriageRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConstraintViolation => "constraint_violation",
            Self::WithinLimit => "within_limit",
            Self::Fallback => "fallback",
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Evaluate an [`Analysis`] against [`Constraints`], returning a [`Verdict`].
///
/// Rules run in order and the first match wins:
///
/// 1. cost strictly above the limit with a `HIGH` bottleneck → `fail`, using the
///    first such bottleneck. Without one, this rule does not fire.
/// 2. no bottlenecks → `pass`.
/// 3. otherwise → `warning`, suggesting the first bottleneck's remedy.
///
/// A cost above the limit with only `MEDIUM`/`LOW` bottlenecks therefore yields
/// `warning`, not `fail`.
///
/// # Errors
///
/// [`TriageError::MissingField`](crate::TriageError::MissingField) when a
/// bottleneck the chosen rule reads lacks its `reason` or `suggestion`.
pub fn evaluate(analysis: &Analysis, constraints: &Constraints) -> Result<Verdict> {
    evaluate_with_rule(analysis, constraints).map(|(_, verdict)| verdict)
}

/// Like [`evaluate`], also reporting which rule decided.
pub fn evaluate_with_rule(
    analysis: &Analysis,
    constraints: &Constraints,
) -> Result<(TriageRule, Verdict)> {
    let (rule, verdict) = decide(analysis, constraints)?;
    debug!(
        event = "triage.rule_matched",
        rule = rule.as_str(),
        status = %verdict.status,
        bottlenecks = analysis.bottlenecks.len(),
    );
    Ok((rule, verdict))
}

fn decide(analysis: &Analysis, constraints: &Constraints) -> Result<(TriageRule, Verdict)> {
    let total_cost = analysis.total_cost;

    if constraints.is_exceeded_by(total_cost) {
        if let Some((index, bottleneck)) = analysis.first_high_severity() {
            let reason = bottleneck.require_reason(index)?;
            let suggestion = bottleneck.require_suggestion(index)?;
            return Ok((
                TriageRule::ConstraintViolation,
                Verdict {
                    status: VerdictStatus::Fail,
                    reason: format!(
                        "Query cost ({}) exceeds limit ({}). {}",
                        render_cost(total_cost),
                        constraints.render_limit(),
                        reason,
                    ),
                    suggestion: suggestion.to_string(),
                    priority: Priority::High,
                },
            ));
        }
    }

    let Some(first) = analysis.bottlenecks.first() else {
        return Ok((
            TriageRule::WithinLimit,
            Verdict {
                status: VerdictStatus::Pass,
                reason: format!(
                    "Query cost ({}) is within limit ({}).",
                    render_cost(total_cost),
                    constraints.render_limit(),
                ),
                suggestion: NO_OPTIMIZATION_NEEDED.to_string(),
                priority: Priority::Low,
            },
        ));
    };

    Ok((
        TriageRule::Fallback,
        Verdict {
            status: VerdictStatus::Warning,
            reason: POTENTIAL_OPTIMIZATIONS.to_string(),
            suggestion: first.require_suggestion(0)?.to_string(),
            priority: Priority::Medium,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bottleneck, Severity, TriageError};

    fn high(reason: &str, suggestion: &str) -> Bottleneck {
        Bottleneck::new(Severity::High, reason, suggestion)
    }

    #[test]
    fn test_violation_with_high_fails() {
        let analysis = Analysis::new(150.0).with_bottleneck(high("R1", "S1"));
        let (rule, v) =
            evaluate_with_rule(&analysis, &Constraints::with_max_cost(100.0)).unwrap();
        assert_eq!(rule, TriageRule::ConstraintViolation);
        assert_eq!(v.status, VerdictStatus::Fail);
        assert_eq!(v.reason, "Query cost (150) exceeds limit (100). R1");
    }

    #[test]
    fn test_empty_passes_even_over_limit() {
        let (rule, v) =
            evaluate_with_rule(&Analysis::new(150.0), &Constraints::with_max_cost(100.0))
                .unwrap();
        assert_eq!(rule, TriageRule::WithinLimit);
        assert_eq!(v.status, VerdictStatus::Pass);
    }

    #[test]
    fn test_unbounded_pass_reason() {
        let v = evaluate(&Analysis::new(42.0), &Constraints::unbounded()).unwrap();
        assert_eq!(v.reason, "Query cost (42) is within limit (unbounded).");
    }

    #[test]
    fn test_fallback_needs_first_suggestion() {
        let analysis = Analysis::new(10.0).with_bottleneck(Bottleneck {
            severity: Some(Severity::Low),
            reason: Some("r".to_string()),
            suggestion: None,
        });
        let err = evaluate(&analysis, &Constraints::with_max_cost(100.0)).unwrap_err();
        assert!(matches!(
            err,
            TriageError::MissingField {
                index: 0,
                field: "suggestion"
            }
        ));
    }
}
