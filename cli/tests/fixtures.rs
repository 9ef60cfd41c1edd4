use std::path::PathBuf;
use std::process::Command;

fn cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../tests/cases")
}

fn mdflow() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdflow"))
}

#[test]
fn fixture_suite_passes() {
    let output = mdflow()
        .args(["--no-color", "test"])
        .arg(cases_dir())
        .output()
        .expect("failed to run mdflow");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "fixture suite failed:\n{}", stderr);
    assert!(stderr.contains("0 failed"), "unexpected summary:\n{}", stderr);
}

#[test]
fn single_category_runs_alone() {
    let output = mdflow()
        .args(["--no-color", "test", "--category", "escapes"])
        .arg(cases_dir())
        .output()
        .expect("failed to run mdflow");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{}", stderr);
    assert!(stderr.contains("escapes"));
    assert!(!stderr.contains("interactions"));
}

#[test]
fn check_reports_link_error() {
    let output = mdflow()
        .args(["--no-color", "check"])
        .arg(cases_dir().join("interactions/markdown-link.test.md"))
        .output()
        .expect("failed to run mdflow");

    // The frontmatter is parsed as content too, but the link block still fails the check.
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Markdown link"));
}
