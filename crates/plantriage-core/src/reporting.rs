//! Verdict rendering and persisted triage artifacts.
//!
//! - `render_verdict_text`: terminal summary
//! - `render_verdict_md`: Markdown for PR comments / CI check output
//! - `TriageArtifact`: `<dir>/<run_id>/triage.json` plus a `triage.digest`
//!   integrity file

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{render_cost, Analysis, Constraints, Result, TriageError, Verdict};

/// Schema version written into every artifact.
pub const ARTIFACT_SCHEMA_VERSION: &str = "1";

/// Auditable record of one triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageArtifact {
    pub schema_version: String,
    pub run_id: String,
    pub recorded_at: DateTime<Utc>,
    /// SHA-256 of the serialized analysis the verdict was computed from.
    pub analysis_digest: String,
    pub total_cost: f64,
    pub bottleneck_count: usize,
    pub constraints: Constraints,
    pub verdict: Verdict,
}

impl TriageArtifact {
    pub fn new(
        run_id: impl Into<String>,
        analysis: &Analysis,
        constraints: &Constraints,
        verdict: Verdict,
    ) -> Result<Self> {
        Ok(Self {
            schema_version: ARTIFACT_SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            recorded_at: Utc::now(),
            analysis_digest: digest_json(analysis)?,
            total_cost: analysis.total_cost,
            bottleneck_count: analysis.bottlenecks.len(),
            constraints: *constraints,
            verdict,
        })
    }
}

/// SHA-256 hex digest of `value` serialized as compact JSON.
///
/// Struct field order is fixed by the type, so equal values hash equally.
pub fn digest_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(digest_bytes(&bytes))
}

fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// `<dir>/<run_id>`, rejecting ids that would escape `dir`.
fn run_dir(dir: &Path, run_id: &str) -> Result<PathBuf> {
    let single_segment = !run_id.is_empty()
        && run_id != "."
        && !run_id.contains("..")
        && !run_id.contains(['/', '\\'])
        && !Path::new(run_id).is_absolute();
    if !single_segment {
        return Err(TriageError::InvalidRunId(run_id.to_string()));
    }
    Ok(dir.join(run_id))
}

/// Persist `<dir>/<run_id>/triage.json` and `<dir>/<run_id>/triage.digest`.
pub fn write_triage_artifact(artifact: &TriageArtifact, dir: &Path) -> Result<PathBuf> {
    let run_dir = run_dir(dir, &artifact.run_id)?;
    std::fs::create_dir_all(&run_dir)?;

    let path = run_dir.join("triage.json");
    let digest_path = run_dir.join("triage.digest");
    let json = serde_json::to_vec_pretty(artifact)?;
    let digest = digest_bytes(&json);

    std::fs::write(&path, &json)?;
    std::fs::write(&digest_path, digest.as_bytes())?;

    tracing::debug!(event = "triage.artifact_written", path = %path.display());
    Ok(path)
}

/// Read `<dir>/<run_id>/triage.json` and verify it against its digest.
pub fn read_triage_artifact(run_id: &str, dir: &Path) -> Result<TriageArtifact> {
    let run_dir = run_dir(dir, run_id)?;
    let json = std::fs::read(run_dir.join("triage.json"))?;
    let expected = std::fs::read_to_string(run_dir.join("triage.digest"))?;
    let actual = digest_bytes(&json);
    if expected.trim() != actual {
        return Err(TriageError::DigestMismatch {
            expected: expected.trim().to_string(),
            actual,
        });
    }
    Ok(serde_json::from_slice(&json)?)
}

/// Render a verdict for terminal output.
pub fn render_verdict_text(verdict: &Verdict) -> String {
    format!(
        "Triage Verdict\n==============\nstatus: {}\npriority: {}\nreason: {}\nsuggestion: {}",
        verdict.status.as_str().to_uppercase(),
        verdict.priority,
        verdict.reason,
        verdict.suggestion,
    )
}

/// Render an artifact as Markdown for PR comments and check summaries.
pub fn render_verdict_md(artifact: &TriageArtifact) -> String {
    let verdict = &artifact.verdict;
    let mut out = String::new();
    out.push_str(&format!(
        "# Query Triage: {}\n\n",
        verdict.status.as_str().to_uppercase()
    ));
    out.push_str("| Field | Value |\n|---|---|\n");
    out.push_str(&format!("| Run | `{}` |\n", artifact.run_id));
    out.push_str(&format!("| Priority | {} |\n", verdict.priority));
    out.push_str(&format!(
        "| Total cost | {} |\n",
        render_cost(artifact.total_cost)
    ));
    out.push_str(&format!(
        "| Cost limit | {} |\n",
        artifact.constraints.render_limit()
    ));
    out.push_str(&format!("| Bottlenecks | {} |\n", artifact.bottleneck_count));
    out.push_str(&format!(
        "| Analysis digest | `{}` |\n",
        &artifact.analysis_digest[..artifact.analysis_digest.len().min(12)]
    ));
    out.push_str(&format!("\n**Reason:** {}\n", verdict.reason));
    out.push_str(&format!("\n**Suggestion:** {}\n", verdict.suggestion));
    out
}
