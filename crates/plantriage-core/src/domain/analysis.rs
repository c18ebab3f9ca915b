//! Plan analysis input: total cost plus the analyzer's ordered bottlenecks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TriageError};

/// Bottleneck severity as labelled by the upstream analyzer.
///
/// The label set is open-ended. Anything other than `HIGH`, `MEDIUM` or `LOW`
/// is kept verbatim in [`Severity::Other`] so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        // Labels match exactly; "high" is not HIGH.
        match label.as_str() {
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            "LOW" => Self::Low,
            _ => Self::Other(label),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A performance issue detected in a query plan.
///
/// Every field is optional at the type level: a missing `severity` simply never
/// matches, while a missing `reason` or `suggestion` is reported as
/// [`TriageError::MissingField`] only when the engine actually reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Bottleneck {
    /// Create a fully populated bottleneck.
    pub fn new(
        severity: Severity,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            severity: Some(severity),
            reason: Some(reason.into()),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self.severity, Some(Severity::High))
    }

    /// `reason`, or `MissingField` carrying this bottleneck's position.
    pub fn require_reason(&self, index: usize) -> Result<&str> {
        self.reason
            .as_deref()
            .ok_or(TriageError::MissingField {
                index,
                field: "reason",
            })
    }

    /// `suggestion`, or `MissingField` carrying this bottleneck's position.
    pub fn require_suggestion(&self, index: usize) -> Result<&str> {
        self.suggestion
            .as_deref()
            .ok_or(TriageError::MissingField {
                index,
                field: "suggestion",
            })
    }
}

/// Structural analysis of one query plan, produced upstream.
///
/// # Invariants
///
/// `bottlenecks` is ordered by the analyzer, most significant first. Nothing in
/// this crate re-sorts or filters it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Estimated total cost. Defaults to 0 when absent.
    #[serde(default)]
    pub total_cost: f64,
    /// Detected bottlenecks. Defaults to empty when absent.
    #[serde(default)]
    pub bottlenecks: Vec<Bottleneck>,
}

impl Analysis {
    pub fn new(total_cost: f64) -> Self {
        Self {
            total_cost,
            bottlenecks: Vec::new(),
        }
    }

    /// Append a bottleneck (builder pattern).
    pub fn with_bottleneck(mut self, bottleneck: Bottleneck) -> Self {
        self.bottlenecks.push(bottleneck);
        self
    }

    /// First bottleneck, in analyzer order, whose severity is exactly `HIGH`.
    pub fn first_high_severity(&self) -> Option<(usize, &Bottleneck)> {
        self.bottlenecks.iter().enumerate().find(|(_, b)| b.is_high())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_labels_are_exact() {
        assert_eq!(Severity::from("HIGH".to_string()), Severity::High);
        assert_eq!(
            Severity::from("high".to_string()),
            Severity::Other("high".to_string())
        );
        assert_eq!(
            Severity::from("CRITICAL".to_string()),
            Severity::Other("CRITICAL".to_string())
        );
    }

    #[test]
    fn test_unknown_severity_survives_serde() {
        let b: Bottleneck =
            serde_json::from_value(json!({"severity": "CRITICAL", "suggestion": "s"})).unwrap();
        assert_eq!(b.severity, Some(Severity::Other("CRITICAL".to_string())));
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["severity"], "CRITICAL");
    }

    #[test]
    fn test_analysis_defaults_when_keys_absent() {
        let a: Analysis = serde_json::from_value(json!({})).unwrap();
        assert_eq!(a.total_cost, 0.0);
        assert!(a.bottlenecks.is_empty());
    }

    #[test]
    fn test_analyzer_extra_keys_are_ignored() {
        let a: Analysis = serde_json::from_value(json!({
            "total_cost": 12.5,
            "node_count": 7,
            "bottlenecks": [
                {"severity": "LOW", "node_type": "Sort", "reason": "r", "suggestion": "s"}
            ]
        }))
        .unwrap();
        assert_eq!(a.bottlenecks.len(), 1);
        assert_eq!(a.bottlenecks[0].severity, Some(Severity::Low));
    }

    #[test]
    fn test_first_high_severity_skips_non_high() {
        let a = Analysis::new(1.0)
            .with_bottleneck(Bottleneck::new(Severity::Medium, "m", "sm"))
            .with_bottleneck(Bottleneck::default())
            .with_bottleneck(Bottleneck::new(Severity::High, "h1", "sh1"))
            .with_bottleneck(Bottleneck::new(Severity::High, "h2", "sh2"));

        let (index, b) = a.first_high_severity().expect("high bottleneck");
        assert_eq!(index, 2);
        assert_eq!(b.reason.as_deref(), Some("h1"));
    }

    #[test]
    fn test_require_suggestion_reports_index() {
        let b = Bottleneck {
            severity: Some(Severity::Low),
            reason: Some("r".to_string()),
            suggestion: None,
        };
        let err = b.require_suggestion(4).unwrap_err();
        assert!(matches!(
            err,
            TriageError::MissingField {
                index: 4,
                field: "suggestion"
            }
        ));
    }
}
