//! Plan Triage Core Library
//!
//! Deterministic pass/warning/fail verdicts for pre-computed query-plan
//! analyses, plus the configuration, reporting and logging around them.

pub mod config;
pub mod domain;
pub mod obs;
pub mod reporting;
pub mod telemetry;
pub mod triage;

pub use domain::{
    render_cost, Analysis, Bottleneck, Constraints, Priority, Result, Severity, TriageError,
    Verdict, VerdictStatus,
};

pub use config::{FailOn, GateConfig, TriageConfig};
pub use obs::{emit_triage_error, emit_triage_evaluated, emit_triage_started, TriageSpan};
pub use reporting::{
    digest_json, read_triage_artifact, render_verdict_md, render_verdict_text,
    write_triage_artifact, TriageArtifact,
};
pub use telemetry::init_tracing;
pub use triage::{evaluate, evaluate_with_rule, TriageRule};

/// Plan triage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
