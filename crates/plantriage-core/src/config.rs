//! TOML configuration for triage runs.
//!
//! ```toml
//! [constraints]
//! max_cost = 1000.0
//!
//! [gate]
//! fail_on = "warning"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Constraints, Result, TriageError, VerdictStatus};

/// Lowest verdict status that should make a gating caller exit non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailOn {
    #[default]
    Fail,
    Warning,
    Never,
}

impl FailOn {
    /// Whether a verdict with `status` trips this threshold.
    pub fn is_tripped_by(self, status: VerdictStatus) -> bool {
        match self {
            Self::Fail => status == VerdictStatus::Fail,
            Self::Warning => status >= VerdictStatus::Warning,
            Self::Never => false,
        }
    }
}

impl std::str::FromStr for FailOn {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "warning" => Ok(Self::Warning),
            "never" => Ok(Self::Never),
            other => Err(TriageError::InvalidConfig(format!(
                "unknown fail_on value '{other}' (expected fail, warning or never)"
            ))),
        }
    }
}

/// Gate behavior for CI callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default)]
    pub fail_on: FailOn,
}

/// Top-level triage configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub gate: GateConfig,
}

impl TriageConfig {
    /// Parse from TOML text and validate.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.constraints.validate()
    }

    /// Override the configured limit, e.g. from a CLI flag or env var.
    pub fn with_max_cost_override(mut self, max_cost: Option<f64>) -> Self {
        if max_cost.is_some() {
            self.constraints.max_cost = max_cost;
        }
        self
    }
}
