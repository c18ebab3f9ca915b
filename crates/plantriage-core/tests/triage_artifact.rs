use plantriage_core::{
    digest_json, evaluate, read_triage_artifact, write_triage_artifact, Analysis, Bottleneck,
    Constraints, Severity, TriageArtifact, TriageError, VerdictStatus,
};

fn sample_run() -> (Analysis, Constraints, TriageArtifact) {
    let analysis = Analysis::new(820.0)
        .with_bottleneck(Bottleneck::new(
            Severity::High,
            "Sequential scan on lineitem",
            "Create an index on lineitem(l_orderkey)",
        ))
        .with_bottleneck(Bottleneck::new(
            Severity::Low,
            "Small sort",
            "None required",
        ));
    let constraints = Constraints::with_max_cost(500.0);
    let verdict = evaluate(&analysis, &constraints).expect("evaluate");
    let artifact =
        TriageArtifact::new("run-0001", &analysis, &constraints, verdict).expect("artifact");
    (analysis, constraints, artifact)
}

#[test]
fn artifact_write_then_read_verifies_digest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (analysis, constraints, artifact) = sample_run();

    let path = write_triage_artifact(&artifact, dir.path()).expect("write");
    assert!(path.ends_with("run-0001/triage.json"));
    assert!(dir.path().join("run-0001/triage.digest").exists());

    let loaded = read_triage_artifact("run-0001", dir.path()).expect("read");
    assert_eq!(loaded, artifact);
    assert_eq!(loaded.verdict.status, VerdictStatus::Fail);
    assert_eq!(loaded.constraints, constraints);
    assert_eq!(loaded.bottleneck_count, 2);
    assert_eq!(loaded.analysis_digest, digest_json(&analysis).unwrap());
}

#[test]
fn tampered_artifact_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (_, _, artifact) = sample_run();
    let path = write_triage_artifact(&artifact, dir.path()).expect("write");

    let content = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, content.replace("\"fail\"", "\"pass\"")).unwrap();

    let err = read_triage_artifact("run-0001", dir.path()).unwrap_err();
    assert!(matches!(err, TriageError::DigestMismatch { .. }));
}

#[test]
fn missing_artifact_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_triage_artifact("nope", dir.path()).unwrap_err();
    assert!(matches!(err, TriageError::Io(_)));
}

#[test]
fn run_id_cannot_escape_artifacts_dir() {
    let root = tempfile::tempdir().expect("tempdir");
    let artifacts = root.path().join("artifacts");
    let (analysis, constraints, artifact) = sample_run();
    let escaping = TriageArtifact {
        run_id: "../outside".to_string(),
        ..artifact
    };

    let err = write_triage_artifact(&escaping, &artifacts).unwrap_err();
    assert!(matches!(err, TriageError::InvalidRunId(_)));
    assert!(!root.path().join("outside").exists());

    let err = read_triage_artifact("../outside", &artifacts).unwrap_err();
    assert!(matches!(err, TriageError::InvalidRunId(_)));

    // Same inputs under a plain id still land inside the directory.
    let verdict = evaluate(&analysis, &constraints).unwrap();
    let ok = TriageArtifact::new("inside", &analysis, &constraints, verdict).unwrap();
    let path = write_triage_artifact(&ok, &artifacts).unwrap();
    assert!(path.starts_with(&artifacts));
}

#[test]
fn same_analysis_same_digest() {
    let (a, _, first) = sample_run();
    let (_, _, second) = sample_run();
    assert_eq!(first.analysis_digest, second.analysis_digest);
    assert_eq!(first.verdict, second.verdict);
    assert_ne!(
        first.analysis_digest,
        digest_json(&Analysis::new(a.total_cost + 1.0)).unwrap()
    );
}
