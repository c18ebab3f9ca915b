//! Caller-supplied cost constraints.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TriageError};

/// Limits an analysis is judged against.
///
/// An absent `max_cost` means the cost is unbounded. This is an explicit
/// `None`, never a floating-point infinity. Unknown keys are rejected: a
/// misspelled `max_cost` must not silently lift the limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
}

impl Constraints {
    pub fn unbounded() -> Self {
        Self { max_cost: None }
    }

    pub fn with_max_cost(max_cost: f64) -> Self {
        Self {
            max_cost: Some(max_cost),
        }
    }

    /// Whether `cost` strictly exceeds the limit. Equality is not a violation.
    pub fn is_exceeded_by(&self, cost: f64) -> bool {
        match self.max_cost {
            Some(max_cost) => cost > max_cost,
            None => false,
        }
    }

    /// Limit as shown in verdict reasons: rounded to an integer, or `unbounded`.
    pub fn render_limit(&self) -> String {
        match self.max_cost {
            Some(max_cost) => render_cost(max_cost),
            None => "unbounded".to_string(),
        }
    }

    /// Reject limits the engine has no defined behavior for.
    ///
    /// The engine never calls this itself; callers validate before evaluating.
    pub fn validate(&self) -> Result<()> {
        match self.max_cost {
            Some(max_cost) if max_cost.is_nan() => Err(TriageError::InvalidConstraint(
                "max_cost must be a number".to_string(),
            )),
            Some(max_cost) if max_cost.is_infinite() => Err(TriageError::InvalidConstraint(
                "max_cost must be finite; omit it for an unbounded limit".to_string(),
            )),
            Some(max_cost) if max_cost < 0.0 => Err(TriageError::InvalidConstraint(format!(
                "max_cost must not be negative, got {max_cost}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Render a cost rounded to the nearest integer.
pub fn render_cost(cost: f64) -> String {
    format!("{cost:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_not_a_violation() {
        let c = Constraints::with_max_cost(100.0);
        assert!(!c.is_exceeded_by(100.0));
        assert!(c.is_exceeded_by(100.0001));
        assert!(!c.is_exceeded_by(99.9));
    }

    #[test]
    fn test_unbounded_is_never_exceeded() {
        let c = Constraints::unbounded();
        assert!(!c.is_exceeded_by(f64::MAX));
        assert_eq!(c.render_limit(), "unbounded");
    }

    #[test]
    fn test_render_cost_rounds() {
        assert_eq!(render_cost(149.6), "150");
        assert_eq!(render_cost(100.0), "100");
        assert_eq!(render_cost(0.4), "0");
    }

    #[test]
    fn test_absent_max_cost_deserializes_unbounded() {
        let c: Constraints = serde_json::from_str("{}").unwrap();
        assert_eq!(c, Constraints::unbounded());
    }

    #[test]
    fn test_misspelled_max_cost_rejected() {
        let err = serde_json::from_str::<Constraints>(r#"{"max_csot": 100.0}"#).unwrap_err();
        assert!(err.to_string().contains("max_csot"));
    }

    #[test]
    fn test_validate_rejects_negative_and_non_finite() {
        assert!(Constraints::with_max_cost(-1.0).validate().is_err());
        assert!(Constraints::with_max_cost(f64::NAN).validate().is_err());
        assert!(Constraints::with_max_cost(f64::INFINITY).validate().is_err());
        assert!(Constraints::with_max_cost(0.0).validate().is_ok());
        assert!(Constraints::unbounded().validate().is_ok());
    }
}
