use assert_cmd::Command;
use std::path::Path;

fn deskfit() -> Command {
    let mut cmd = Command::cargo_bin("deskfit").unwrap();
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("SERPAPI_API_KEY")
        .env("RUST_LOG", "off");
    cmd
}

fn failure_stderr(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().clone();
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn with_keys(cmd: &mut Command) -> &mut Command {
    cmd.args(["--openai-api-key", "sk-test", "--serp-api-key", "serp-test"])
}

#[test]
fn help_lists_form_fields() {
    let output = deskfit().arg("--help").assert().success().get_output().clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--image", "--focus", "--goal", "--html"] {
        assert!(stdout.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn missing_model_key_is_reported() {
    let stderr = failure_stderr(deskfit().args(["--focus", "posture", "--goal", "reduce-strain"]));
    assert!(stderr.contains("please provide your OpenAI API key"), "{stderr}");
}

#[test]
fn missing_search_key_is_reported() {
    let stderr = failure_stderr(deskfit().args(["--openai-api-key", "sk-test"]));
    assert!(stderr.contains("please provide your SerpAPI API key"), "{stderr}");
}

#[test]
fn missing_image_is_reported_without_writing_a_report() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = deskfit();
    with_keys(&mut cmd)
        .args(["--focus", "posture", "--goal", "reduce back pain"])
        .arg("--out-dir")
        .arg(out.path());

    let stderr = failure_stderr(&mut cmd);
    assert!(stderr.contains("please upload a workspace photo"), "{stderr}");
    assert!(!out.path().join("workspace_optimization_report.md").exists());
}

#[test]
fn missing_goal_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());
    let mut cmd = deskfit();
    with_keys(&mut cmd).arg("--image").arg(&photo).args(["--focus", "organization"]);

    let stderr = failure_stderr(&mut cmd);
    assert!(stderr.contains("improvement goal"), "{stderr}");
}

#[test]
fn unreadable_photo_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = deskfit();
    with_keys(&mut cmd)
        .arg("--image")
        .arg(dir.path().join("missing.jpg"))
        .args(["--focus", "posture", "--goal", "reduce-strain"]);

    let stderr = failure_stderr(&mut cmd);
    assert!(stderr.contains("reading workspace photo"), "{stderr}");
}

#[test]
fn unknown_focus_area_is_rejected() {
    let stderr = failure_stderr(deskfit().args(["--focus", "lighting"]));
    assert!(stderr.contains("unknown focus area"), "{stderr}");
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("deskfit.toml");
    std::fs::write(&config, "results_per_query = 0\n").unwrap();

    let stderr = failure_stderr(deskfit().arg("--config").arg(&config));
    assert!(stderr.contains("results_per_query must be at least 1"), "{stderr}");
}

fn write_photo(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("desk.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).unwrap();
    path
}
