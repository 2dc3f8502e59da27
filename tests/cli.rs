use assert_cmd::Command;
use predicates::prelude::*;

fn ads_pubs(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ads-pubs").expect("binary built");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ADS_API_URL");
    cmd
}

#[test]
fn help_lists_options() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    ads_pubs(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--metrics-only").and(predicate::str::contains("--delta-year")));
    Ok(())
}

#[test]
fn missing_token_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("empty.toml"), "")?;

    let output = ads_pubs(dir.path())
        .env_remove("ADS_DEV_KEY")
        .arg("--config")
        .arg(dir.path().join("empty.toml"))
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(
        stderr.contains("ADS_DEV_KEY is not set in environment."),
        "stderr=\n{stderr}"
    );
    assert!(!dir.path().join("_data").exists());
    Ok(())
}

#[test]
fn metrics_only_needs_records_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("ads-pubs.toml"), "[api]\ntoken = \"dummy\"\n")?;
    ads_pubs(dir.path())
        .arg("--metrics-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "_data/papers_all.yml not found; run without --metrics-only first.",
        ));
    Ok(())
}

#[test]
fn unreadable_config_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("ads-pubs.toml"), "[owner\nmax_authors = 3\n")?;
    ads_pubs(dir.path())
        .env("ADS_DEV_KEY", "dummy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
    Ok(())
}
