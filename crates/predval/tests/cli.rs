use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Result;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../predval-parser/tests/data")
        .join(name)
}

fn scratch_dir(test: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("predval-cli-{}-{test}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn predval(args: &[&Path]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_predval"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

#[test]
fn writes_one_line_per_window() -> Result<()> {
    let dir = scratch_dir("fixture")?;
    let output_path = dir.join("comparison.txt");

    let output = predval(&[
        &fixture_path("actual.txt"),
        &fixture_path("predicted.txt"),
        &fixture_path("window.txt"),
        &output_path,
    ])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&output_path)?,
        fs::read_to_string(fixture_path("expected_window3.txt"))?
    );
    Ok(())
}

#[test]
fn oversized_window_warns_and_still_succeeds() -> Result<()> {
    let dir = scratch_dir("clamp")?;
    let window_path = dir.join("window.txt");
    let output_path = dir.join("comparison.txt");
    fs::write(&window_path, "25\n")?;

    let output = predval(&[
        &fixture_path("actual.txt"),
        &fixture_path("predicted.txt"),
        &window_path,
        &output_path,
    ])?;

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&output_path)?, "1|6|0.31\n");
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Window size is bigger than observation period"));
    Ok(())
}

#[test]
fn invalid_window_file_fails_without_output() -> Result<()> {
    let dir = scratch_dir("bad-window")?;
    let window_path = dir.join("window.txt");
    let output_path = dir.join("comparison.txt");
    fs::write(&window_path, "three\n")?;

    let output = predval(&[
        &fixture_path("actual.txt"),
        &fixture_path("predicted.txt"),
        &window_path,
        &output_path,
    ])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must contain a single positive integer"));
    Ok(())
}

#[test]
fn missing_input_file_is_reported() -> Result<()> {
    let dir = scratch_dir("missing")?;
    let output_path = dir.join("comparison.txt");

    let output = predval(&[
        &dir.join("does-not-exist.txt"),
        &fixture_path("predicted.txt"),
        &fixture_path("window.txt"),
        &output_path,
    ])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not read file"));
    Ok(())
}

#[test]
fn empty_input_file_is_reported() -> Result<()> {
    let dir = scratch_dir("empty")?;
    let empty_path = dir.join("predicted.txt");
    let output_path = dir.join("comparison.txt");
    fs::write(&empty_path, "")?;

    let output = predval(&[
        &fixture_path("actual.txt"),
        &empty_path,
        &fixture_path("window.txt"),
        &output_path,
    ])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not parse data from file"));
    Ok(())
}

#[test]
fn unwritable_output_is_reported() -> Result<()> {
    let dir = scratch_dir("unwritable")?;
    let output_path = dir.join("no-such-dir").join("comparison.txt");

    let output = predval(&[
        &fixture_path("actual.txt"),
        &fixture_path("predicted.txt"),
        &fixture_path("window.txt"),
        &output_path,
    ])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not write results to file"));
    Ok(())
}

#[test]
fn sparse_wide_span_writes_a_single_line() -> Result<()> {
    let dir = scratch_dir("wide-span")?;
    let actual_path = dir.join("actual.txt");
    let predicted_path = dir.join("predicted.txt");
    let window_path = dir.join("window.txt");
    let output_path = dir.join("comparison.txt");
    fs::write(&actual_path, "0|A|1.25\n1099511627776|A|3.0\n")?;
    fs::write(&predicted_path, "0|A|1.0\n")?;
    fs::write(&window_path, "1099511627777\n")?;

    let output = predval(&[&actual_path, &predicted_path, &window_path, &output_path])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&output_path)?, "0|1099511627776|0.25\n");
    Ok(())
}
