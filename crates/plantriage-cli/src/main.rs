//! Plan Triage CLI
//!
//! The `plantriage` command turns a query-plan analysis JSON document into a
//! pass/warning/fail verdict.
//!
//! ## Commands
//!
//! - `evaluate`: Triage an analysis against a cost limit (CI-gateable exit code)
//! - `check-config`: Validate a TOML config and print the effective settings
//!
//! Exit codes: 0 clear, 1 error, 2 verdict met the `--fail-on` threshold.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plantriage_core::{
    emit_triage_error, emit_triage_evaluated, emit_triage_started, evaluate_with_rule,
    render_verdict_md, render_verdict_text, write_triage_artifact, Analysis, FailOn,
    TriageArtifact, TriageConfig, TriageSpan, Verdict,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn, Level};

/// Exit status when the verdict trips `--fail-on`. Errors (unreadable input,
/// missing bottleneck fields, bad config) exit with 1 via `anyhow`.
const GATE_TRIPPED_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "plantriage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic triage verdicts for query-plan analyses", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage an analysis document against a cost limit
    Evaluate {
        /// Analysis JSON file produced by the plan analyzer ("-" reads stdin)
        #[arg(short, long)]
        analysis: PathBuf,

        /// Maximum acceptable total cost (unbounded if neither this nor the config sets it)
        #[arg(long, env = "PLANTRIAGE_MAX_COST")]
        max_cost: Option<f64>,

        /// TOML config file with [constraints] and [gate] sections
        #[arg(short, long, env = "PLANTRIAGE_CONFIG")]
        config: Option<PathBuf>,

        /// Output format for the verdict
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Lowest verdict that exits non-zero: fail, warning or never (overrides config)
        #[arg(long)]
        fail_on: Option<FailOn>,

        /// Persist <dir>/<run-id>/triage.json with a digest file
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,

        /// Run identifier for the artifact (default: random UUID)
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Validate a config file and print the effective settings
    CheckConfig {
        /// TOML config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Result of applying the fail-on threshold to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateOutcome {
    Clear,
    Tripped,
}

impl GateOutcome {
    fn exit_status(self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Tripped => GATE_TRIPPED_EXIT,
        }
    }
}

impl From<GateOutcome> for ExitCode {
    fn from(outcome: GateOutcome) -> Self {
        ExitCode::from(outcome.exit_status())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    plantriage_core::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Evaluate {
            analysis,
            max_cost,
            config,
            format,
            fail_on,
            artifacts_dir,
            run_id,
        } => cmd_evaluate(
            &analysis,
            max_cost,
            config.as_deref(),
            format,
            fail_on,
            artifacts_dir.as_deref(),
            run_id,
        )
        .map(ExitCode::from),
        Commands::CheckConfig { config } => {
            cmd_check_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Triage one analysis document and print the verdict.
///
/// `Err` means the triage could not run; a verdict that trips the threshold is
/// `Ok(GateOutcome::Tripped)`.
fn cmd_evaluate(
    analysis_path: &Path,
    max_cost: Option<f64>,
    config_path: Option<&Path>,
    format: OutputFormat,
    fail_on: Option<FailOn>,
    artifacts_dir: Option<&Path>,
    run_id: Option<String>,
) -> Result<GateOutcome> {
    let source = analysis_path.display().to_string();
    let _span = TriageSpan::enter(&source);

    let config = resolve_config(config_path, max_cost)?;
    let analysis = read_analysis(analysis_path)?;
    emit_triage_started(&source, analysis.bottlenecks.len());

    let (rule, verdict) = match evaluate_with_rule(&analysis, &config.constraints) {
        Ok(decided) => decided,
        Err(e) => {
            emit_triage_error(&e);
            return Err(e).context(format!("Failed to triage analysis {}", source));
        }
    };
    emit_triage_evaluated(&verdict, analysis.total_cost, &config.constraints);
    info!(rule = rule.as_str(), "verdict decided");

    let run_id = run_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let artifact = TriageArtifact::new(run_id, &analysis, &config.constraints, verdict)
        .context("Failed to build triage artifact")?;

    if let Some(dir) = artifacts_dir {
        let path = write_triage_artifact(&artifact, dir)
            .with_context(|| format!("Failed to write triage artifact under {:?}", dir))?;
        info!("Wrote triage artifact to {:?}", path);
    }

    println!("{}", render_output(format, &artifact)?);

    let fail_on = fail_on.unwrap_or(config.gate.fail_on);
    Ok(gate(&artifact.verdict, fail_on))
}

/// Validate a config file and print the effective settings as JSON.
fn cmd_check_config(path: &Path) -> Result<()> {
    let config = TriageConfig::from_file(path)
        .with_context(|| format!("Invalid triage config: {:?}", path))?;
    // stdout carries only the JSON document; status goes to the log on stderr.
    println!("{}", render_config(&config)?);
    info!("Config OK: {:?}", path);
    Ok(())
}

fn render_config(config: &TriageConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Merge the optional config file with the `--max-cost` override and validate.
fn resolve_config(config_path: Option<&Path>, max_cost: Option<f64>) -> Result<TriageConfig> {
    let config = match config_path {
        Some(path) => TriageConfig::from_file(path)
            .with_context(|| format!("Invalid triage config: {:?}", path))?,
        None => TriageConfig::default(),
    }
    .with_max_cost_override(max_cost);

    config
        .validate()
        .context("Constraints rejected before evaluation")?;
    Ok(config)
}

fn read_analysis(path: &Path) -> Result<Analysis> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read analysis from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis file: {:?}", path))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid analysis JSON in {:?}", path))
}

fn render_output(format: OutputFormat, artifact: &TriageArtifact) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_verdict_text(&artifact.verdict),
        OutputFormat::Json => serde_json::to_string_pretty(&artifact.verdict)?,
        OutputFormat::Markdown => render_verdict_md(artifact),
    })
}

/// Apply the fail-on threshold to a verdict.
fn gate(verdict: &Verdict, fail_on: FailOn) -> GateOutcome {
    if fail_on.is_tripped_by(verdict.status) {
        warn!(
            status = %verdict.status,
            priority = %verdict.priority,
            "Triage verdict meets --fail-on threshold: {}",
            verdict.reason
        );
        GateOutcome::Tripped
    } else {
        GateOutcome::Clear
    }
}
